//! Collaborator interfaces
//!
//! The action bar does not render anything or touch storage itself. It talks
//! to the outside through these traits. Work that finishes later (animated
//! removal, a confirmation dialog) is expressed as a continuation value the
//! collaborator holds on to and hands back to the controller.

use serde::{Deserialize, Serialize};

use crate::types::{Account, ActionKind, Conversation, Folder, Priority, UndoRecord};

/// A mutation applied to a batch of conversations in the backing store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mutation {
    Delete,
    Archive,
    Mute,
    ReportSpam,
    Starred { value: bool },
    Read { value: bool },
    Priority { value: Priority },
    /// Replace folder membership
    Folders {
        folder_list: String,
        raw_folders: String,
    },
}

impl Mutation {
    /// Get the mutation type string for logging
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Archive => "archive",
            Self::Mute => "mute",
            Self::ReportSpam => "report_spam",
            Self::Starred { .. } => "starred",
            Self::Read { .. } => "read",
            Self::Priority { .. } => "priority",
            Self::Folders { .. } => "folders",
        }
    }
}

/// Folder reassignment captured when the user commits the folder choice
#[derive(Debug, Clone, PartialEq)]
pub struct FolderChange {
    /// Folders the conversations now belong to
    pub folders: Vec<Folder>,
    pub conversations: Vec<Conversation>,
    /// The conversations left the current folder and are removed from its list
    pub destructive: bool,
}

/// Continuation run by the controller once a removal finished
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Destructive {
        action: ActionKind,
        conversations: Vec<Conversation>,
    },
    FolderChange(FolderChange),
}

impl Completion {
    pub fn conversations(&self) -> &[Conversation] {
        match self {
            Self::Destructive { conversations, .. } => conversations,
            Self::FolderChange(change) => &change.conversations,
        }
    }
}

/// A destructive action waiting for the user's confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub action: ActionKind,
    pub conversations: Vec<Conversation>,
}

/// Storage side of bulk actions
pub trait MutationPort {
    /// Remove the conversations from the visible list, then hand `completion`
    /// back through `SelectionActionController::on_action_complete`.
    fn remove(&mut self, conversations: &[Conversation], completion: Completion);

    /// Same as `remove`, using the archive animation.
    fn archive(&mut self, conversations: &[Conversation], completion: Completion);

    /// Apply a mutation to the backing store. No completion is reported.
    fn apply(&mut self, conversations: &[Conversation], mutation: Mutation);
}

/// Toolbar and list presentation
pub trait PresentationPort {
    fn show_toolbar(&mut self, title: &str);
    fn hide_toolbar(&mut self);
    fn set_title(&mut self, title: &str);
    fn set_item_visible(&mut self, action: ActionKind, visible: bool);
    fn set_item_enabled(&mut self, action: ActionKind, enabled: bool);
    /// Redraw the conversation list
    fn refresh_list(&mut self);
    /// A bulk action finished
    fn action_completed(&mut self);
}

pub trait UndoPort {
    fn on_undo_available(&mut self, record: UndoRecord);
}

pub trait ConfirmationPort {
    /// Ask the user to confirm. On accept, the owner passes `pending` to
    /// `SelectionActionController::on_confirm_accepted`; on dismiss it is dropped.
    fn confirm(&mut self, message: &str, pending: PendingAction);
}

pub trait FolderPicker {
    /// Let the user pick folders. The choice comes back as
    /// `UiEvent::FolderChangesCommitted`.
    fn choose_folders(&mut self, account: &Account, conversations: &[Conversation]);
}

/// Every collaborator the controller needs
pub struct Collaborators {
    pub mutation: Box<dyn MutationPort>,
    pub presentation: Box<dyn PresentationPort>,
    pub undo: Box<dyn UndoPort>,
    pub confirmation: Box<dyn ConfirmationPort>,
    pub folder_picker: Box<dyn FolderPicker>,
}
