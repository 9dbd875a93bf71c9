//! Recording collaborators for tests

use std::cell::RefCell;
use std::rc::Rc;

use crate::ports::{
    Collaborators, Completion, ConfirmationPort, FolderPicker, Mutation, MutationPort,
    PendingAction, PresentationPort, UndoPort,
};
use crate::types::{Account, ActionKind, Conversation, UndoRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Remove(Completion),
    Archive(Completion),
    Apply {
        conversations: Vec<Conversation>,
        mutation: Mutation,
    },
    ShowToolbar(String),
    HideToolbar,
    SetTitle(String),
    SetVisible(ActionKind, bool),
    SetEnabled(ActionKind, bool),
    RefreshList,
    ActionCompleted,
    Undo(UndoRecord),
    Confirm {
        message: String,
        pending: PendingAction,
    },
    ChooseFolders(Vec<String>),
}

/// Implements every port and appends each call to a shared log
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl Recorder {
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            mutation: Box::new(self.clone()),
            presentation: Box::new(self.clone()),
            undo: Box::new(self.clone()),
            confirmation: Box::new(self.clone()),
            folder_picker: Box::new(self.clone()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(*c)).count()
    }

    /// Completions handed to `remove` or `archive`, oldest first
    pub fn completions(&self) -> Vec<Completion> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Remove(c) | Call::Archive(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn confirmations(&self) -> Vec<PendingAction> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Confirm { pending, .. } => Some(pending.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Apply { mutation, .. } => Some(mutation.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn undo_records(&self) -> Vec<UndoRecord> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Undo(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    /// Most recent visibility pushed for `action`
    pub fn visible(&self, action: ActionKind) -> Option<bool> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            Call::SetVisible(a, visible) if *a == action => Some(*visible),
            _ => None,
        })
    }
}

impl MutationPort for Recorder {
    fn remove(&mut self, _conversations: &[Conversation], completion: Completion) {
        self.push(Call::Remove(completion));
    }

    fn archive(&mut self, _conversations: &[Conversation], completion: Completion) {
        self.push(Call::Archive(completion));
    }

    fn apply(&mut self, conversations: &[Conversation], mutation: Mutation) {
        self.push(Call::Apply {
            conversations: conversations.to_vec(),
            mutation,
        });
    }
}

impl PresentationPort for Recorder {
    fn show_toolbar(&mut self, title: &str) {
        self.push(Call::ShowToolbar(title.to_string()));
    }

    fn hide_toolbar(&mut self) {
        self.push(Call::HideToolbar);
    }

    fn set_title(&mut self, title: &str) {
        self.push(Call::SetTitle(title.to_string()));
    }

    fn set_item_visible(&mut self, action: ActionKind, visible: bool) {
        self.push(Call::SetVisible(action, visible));
    }

    fn set_item_enabled(&mut self, action: ActionKind, enabled: bool) {
        self.push(Call::SetEnabled(action, enabled));
    }

    fn refresh_list(&mut self) {
        self.push(Call::RefreshList);
    }

    fn action_completed(&mut self) {
        self.push(Call::ActionCompleted);
    }
}

impl UndoPort for Recorder {
    fn on_undo_available(&mut self, record: UndoRecord) {
        self.push(Call::Undo(record));
    }
}

impl ConfirmationPort for Recorder {
    fn confirm(&mut self, message: &str, pending: PendingAction) {
        self.push(Call::Confirm {
            message: message.to_string(),
            pending,
        });
    }
}

impl FolderPicker for Recorder {
    fn choose_folders(&mut self, _account: &Account, conversations: &[Conversation]) {
        self.push(Call::ChooseFolders(
            conversations.iter().map(|c| c.id.clone()).collect(),
        ));
    }
}
