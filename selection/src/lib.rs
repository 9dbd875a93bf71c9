//! Selection action bar for conversation lists
//!
//! Tracks the conversations selected in a list, keeps a contextual toolbar in
//! sync with what the selection allows, and dispatches bulk actions (delete,
//! archive, mute, spam, star, read, importance, folder changes) with an undo
//! record for the ones that remove conversations from the list.
//!
//! ## Module Organization
//!
//! - `types/`: Conversations, folders, accounts, actions, undo records, errors
//! - `config/`: User preferences
//! - `state/`: The shared selection set
//! - `dispatch/`: UI event dispatcher and handler interfaces
//! - `ports/`: Collaborator traits (storage, presentation, undo, dialogs)
//! - `services/`: Visibility rules and the action bar controller

pub mod config;
pub mod dispatch;
pub mod ports;
pub mod services;
pub mod state;
pub mod types;

pub use services::{ControllerState, SelectionActionController};
pub use state::{SelectionSet, SharedSelection};
pub use types::{Result, SelectionError};

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber for the process.
///
/// `RUST_LOG` takes precedence. Debug builds default to debug logs for this
/// crate, release builds to info. Does nothing if a subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new("selection=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
    }
}
