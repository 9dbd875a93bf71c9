pub mod action;
pub mod error;
pub mod undo;

pub use action::ActionKind;
pub use error::{Result, SelectionError};
pub use undo::UndoRecord;

use serde::{Deserialize, Serialize};

/// Unique identifier of a conversation in the backing store
pub type ConversationId = String;

/// Conversation priority as stored by the backing store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    High,
}

/// A conversation row as seen by the selection list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub priority: Priority,
    /// Comma separated folder ids
    #[serde(default)]
    pub folder_list: String,
    /// Serialized folders the conversation belongs to
    #[serde(default)]
    pub raw_folders: String,
    /// Drop the row locally once the store reports the update
    #[serde(default)]
    pub local_delete_on_update: bool,
}

impl Conversation {
    pub fn new(id: impl Into<ConversationId>) -> Self {
        Self {
            id: id.into(),
            subject: String::new(),
            read: false,
            starred: false,
            priority: Priority::Low,
            folder_list: String::new(),
            raw_folders: String::new(),
            local_delete_on_update: false,
        }
    }

    pub fn is_important(&self) -> bool {
        self.priority == Priority::High
    }
}

/// Kind of folder, used where an action's effect depends on the folder shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderType {
    #[default]
    Default,
    Inbox,
    Starred,
    Important,
    Trash,
    Spam,
    Sent,
    Draft,
    Other,
}

/// Bulk actions a folder supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FolderCapabilities {
    #[serde(default)]
    pub archive: bool,
    #[serde(default)]
    pub report_spam: bool,
    /// Muting removes the conversation from this folder
    #[serde(default)]
    pub destructive_mute: bool,
    /// Folder lists important conversations only
    #[serde(default)]
    pub only_important: bool,
}

/// Represents a folder/label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub folder_type: FolderType,
    #[serde(default)]
    pub capabilities: FolderCapabilities,
}

impl Folder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            folder_type: FolderType::Default,
            capabilities: FolderCapabilities::default(),
        }
    }

    pub fn with_type(mut self, folder_type: FolderType) -> Self {
        self.folder_type = folder_type;
        self
    }

    pub fn with_capabilities(mut self, capabilities: FolderCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Comma separated ids, the format stored in `Conversation::folder_list`
    pub fn join_ids(folders: &[Folder]) -> String {
        folders
            .iter()
            .map(|f| f.id.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Serialize the folder list stored in `Conversation::raw_folders`
    pub fn serialize_folders(folders: &[Folder]) -> Result<String> {
        Ok(serde_json::to_string(folders)?)
    }
}

/// Bulk actions an account supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountCapabilities {
    #[serde(default)]
    pub archive: bool,
    #[serde(default)]
    pub report_spam: bool,
    #[serde(default)]
    pub mute: bool,
    #[serde(default)]
    pub mark_important: bool,
}

/// Represents an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    #[serde(default)]
    pub capabilities: AccountCapabilities,
}

impl Account {
    pub fn new(name: impl Into<String>, capabilities: AccountCapabilities) -> Self {
        Self {
            name: name.into(),
            capabilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_ids() {
        let folders = vec![Folder::new("F1", "Inbox"), Folder::new("F2", "Work")];
        assert_eq!(Folder::join_ids(&folders), "F1,F2");
        assert_eq!(Folder::join_ids(&[]), "");
    }

    #[test]
    fn test_serialize_folders() {
        let folders = vec![Folder::new("F2", "Work").with_type(FolderType::Other)];
        let raw = Folder::serialize_folders(&folders).unwrap();
        let parsed: Vec<Folder> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, folders);
    }

    #[test]
    fn test_conversation_defaults() {
        let conv: Conversation = serde_json::from_str(r#"{"id":"c1","read":true}"#).unwrap();
        assert!(conv.read);
        assert!(!conv.starred);
        assert!(!conv.is_important());
    }
}
