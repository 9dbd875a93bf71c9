//! Conversation selection set
//!
//! Holds the conversations checked in the list. The set is shared between the
//! list (which toggles rows) and the action bar controller, so it lives behind
//! `Rc<RefCell<_>>`. Mutations report the `SelectionEvent` they caused; the
//! caller posts it to the dispatcher so observers run from the UI loop.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::types::{Conversation, ConversationId};

/// Shared handle to a selection set
pub type SharedSelection = Rc<RefCell<SelectionSet>>;

/// Change notifications produced by the selection set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// The set went from empty to non-empty
    Populated,
    /// The set changed and is non-empty
    Changed,
    /// The set became empty
    Emptied,
}

#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    conversations: BTreeMap<ConversationId, Conversation>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSelection {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.conversations.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    /// Snapshot of the selected conversations
    pub fn values(&self) -> Vec<Conversation> {
        self.conversations.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conversation> {
        self.conversations.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Conversation> {
        self.conversations.values_mut()
    }

    /// Add a conversation, replacing a stale copy with the same id
    pub fn insert(&mut self, conversation: Conversation) -> SelectionEvent {
        let was_empty = self.is_empty();
        self.conversations
            .insert(conversation.id.clone(), conversation);
        if was_empty {
            SelectionEvent::Populated
        } else {
            SelectionEvent::Changed
        }
    }

    /// Remove a conversation. Returns `None` when it was not selected.
    pub fn remove(&mut self, id: &str) -> Option<SelectionEvent> {
        self.conversations.remove(id)?;
        Some(if self.is_empty() {
            SelectionEvent::Emptied
        } else {
            SelectionEvent::Changed
        })
    }

    /// Select the conversation if unselected, unselect it otherwise
    pub fn toggle(&mut self, conversation: Conversation) -> SelectionEvent {
        match self.remove(&conversation.id) {
            Some(event) => event,
            None => self.insert(conversation),
        }
    }

    /// Empty the set. Returns `None` when it was already empty.
    pub fn clear(&mut self) -> Option<SelectionEvent> {
        if self.is_empty() {
            return None;
        }
        self.conversations.clear();
        Some(SelectionEvent::Emptied)
    }
}
