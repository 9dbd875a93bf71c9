//! Bulk actions offered by the selection action bar

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SelectionError;

/// Actions that can be invoked on the selected conversations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Delete,
    Archive,
    Mute,
    ReportSpam,
    Read,
    Unread,
    Star,
    RemoveStar,
    ChangeFolder,
    MarkImportant,
    MarkNotImportant,
}

impl ActionKind {
    /// Every action, in toolbar order
    pub const ALL: [ActionKind; 11] = [
        Self::Delete,
        Self::Archive,
        Self::Mute,
        Self::ReportSpam,
        Self::Read,
        Self::Unread,
        Self::Star,
        Self::RemoveStar,
        Self::ChangeFolder,
        Self::MarkImportant,
        Self::MarkNotImportant,
    ];

    /// Stable identifier used for menu items
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Archive => "archive",
            Self::Mute => "mute",
            Self::ReportSpam => "report_spam",
            Self::Read => "read",
            Self::Unread => "unread",
            Self::Star => "star",
            Self::RemoveStar => "remove_star",
            Self::ChangeFolder => "change_folder",
            Self::MarkImportant => "mark_important",
            Self::MarkNotImportant => "mark_not_important",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_str())
    }
}

impl FromStr for ActionKind {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|action| action.type_str() == s)
            .ok_or_else(|| SelectionError::Parse(format!("unknown action: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_str_parses_back() {
        for action in ActionKind::ALL {
            assert_eq!(action.type_str().parse::<ActionKind>().unwrap(), action);
        }
    }

    #[test]
    fn test_unknown_action() {
        assert!(matches!(
            "snooze".parse::<ActionKind>(),
            Err(SelectionError::Parse(_))
        ));
    }

    #[test]
    fn test_serde_matches_type_str() {
        let json = serde_json::to_string(&ActionKind::MarkNotImportant).unwrap();
        assert_eq!(json, "\"mark_not_important\"");
    }
}
