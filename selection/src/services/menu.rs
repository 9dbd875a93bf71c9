//! Toolbar item visibility
//!
//! Each item is visible when the account and folder support it and, for the
//! toggling pairs, when at least one selected conversation would change.

use crate::types::{AccountCapabilities, ActionKind, Conversation, FolderCapabilities};

/// Snapshot of everything visibility depends on. Built fresh for every recompute.
#[derive(Debug, Clone)]
pub struct ActionContext {
    conversations: Vec<Conversation>,
    folder: FolderCapabilities,
    account: AccountCapabilities,
}

/// Which selected-item facts hold for at least one conversation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ItemScan {
    any_unstarred: bool,
    any_read: bool,
    any_unimportant: bool,
    /// Conversations looked at before the scan stopped
    examined: usize,
}

impl ItemScan {
    fn resolved(&self) -> bool {
        self.any_unstarred && self.any_read && self.any_unimportant
    }
}

/// Computed visibility for every toolbar item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuVisibility {
    pub delete: bool,
    pub archive: bool,
    pub mute: bool,
    pub report_spam: bool,
    pub read: bool,
    pub unread: bool,
    pub star: bool,
    pub remove_star: bool,
    pub change_folder: bool,
    pub mark_important: bool,
    pub mark_not_important: bool,
}

impl MenuVisibility {
    pub fn is_visible(&self, action: ActionKind) -> bool {
        match action {
            ActionKind::Delete => self.delete,
            ActionKind::Archive => self.archive,
            ActionKind::Mute => self.mute,
            ActionKind::ReportSpam => self.report_spam,
            ActionKind::Read => self.read,
            ActionKind::Unread => self.unread,
            ActionKind::Star => self.star,
            ActionKind::RemoveStar => self.remove_star,
            ActionKind::ChangeFolder => self.change_folder,
            ActionKind::MarkImportant => self.mark_important,
            ActionKind::MarkNotImportant => self.mark_not_important,
        }
    }

    /// (action, visible) pairs in toolbar order
    pub fn items(&self) -> impl Iterator<Item = (ActionKind, bool)> + '_ {
        ActionKind::ALL
            .into_iter()
            .map(move |action| (action, self.is_visible(action)))
    }
}

impl ActionContext {
    pub fn new(
        conversations: Vec<Conversation>,
        folder: FolderCapabilities,
        account: AccountCapabilities,
    ) -> Self {
        Self {
            conversations,
            folder,
            account,
        }
    }

    fn scan(&self) -> ItemScan {
        let mut scan = ItemScan::default();
        for conversation in &self.conversations {
            scan.examined += 1;
            scan.any_unstarred |= !conversation.starred;
            scan.any_read |= conversation.read;
            scan.any_unimportant |= !conversation.is_important();
            if scan.resolved() {
                break;
            }
        }
        scan
    }

    /// Spam is gated on the folder's own `report_spam` capability. Older
    /// clients reused the folder's archive capability for it; a folder that
    /// can archive but not take spam reports no longer offers the item.
    pub fn visibility(&self) -> MenuVisibility {
        let scan = self.scan();
        let account = &self.account;
        let folder = &self.folder;

        MenuVisibility {
            delete: true,
            archive: account.archive && folder.archive,
            mute: account.mute,
            report_spam: account.report_spam && folder.report_spam,
            read: !scan.any_read,
            unread: scan.any_read,
            star: scan.any_unstarred,
            remove_star: !scan.any_unstarred,
            change_folder: true,
            mark_important: scan.any_unimportant && account.mark_important,
            mark_not_important: !scan.any_unimportant && account.mark_important,
        }
    }
}
