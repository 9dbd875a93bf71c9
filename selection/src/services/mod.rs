//! Selection action logic (UI-agnostic)

pub mod controller;
pub mod menu;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{
    confirmation_message, selected_title, ControllerState, SelectionActionController,
};
pub use menu::{ActionContext, MenuVisibility};
