//! Undo records handed to the undo collaborator

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::action::ActionKind;

/// A completed bulk action that the user may still undo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoRecord {
    pub id: Uuid,
    /// Number of conversations affected
    pub count: usize,
    pub action: ActionKind,
    /// The action removed the conversations from the visible list
    pub destructive: bool,
    pub created_at: DateTime<Utc>,
    /// Undo is no longer offered from this instant on
    pub expires_at: DateTime<Utc>,
}

impl UndoRecord {
    /// Create a record offered for `window` from now
    pub fn new(count: usize, action: ActionKind, destructive: bool, window: Duration) -> Self {
        let created_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            count,
            action,
            destructive,
            created_at,
            expires_at: created_at + window,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
