//! Selection action controller
//!
//! Drives the contextual toolbar shown while conversations are selected:
//! shows and hides it, keeps item visibility in sync with the selection, and
//! turns toolbar clicks into bulk mutations with an undo record.
//!
//! Destructive actions remove the conversations from the list first. The
//! removal is handed a `Completion` that carries everything the finishing
//! step needs; the mutation collaborator gives it back through
//! `on_action_complete` once the removal finished.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, error, info, warn, Span};

use crate::config::Settings;
use crate::dispatch::{
    ActionModeLifecycle, EventDispatcher, FolderChangeListener, Handler, HandlerId,
    SelectionObserver, UiEvent,
};
use crate::ports::{Collaborators, Completion, FolderChange, Mutation, PendingAction};
use crate::services::menu::{ActionContext, MenuVisibility};
use crate::state::SharedSelection;
use crate::types::{
    Account, ActionKind, Conversation, Folder, FolderType, Priority, Result, SelectionError,
    UndoRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Inactive,
    Active,
}

/// Toolbar title for `count` selected conversations
pub fn selected_title(count: usize) -> String {
    format!("{} selected", count)
}

/// Confirmation prompt for a destructive action on `count` conversations
pub fn confirmation_message(action: ActionKind, count: usize) -> String {
    let one = count == 1;
    match action {
        ActionKind::Delete if one => "Delete this conversation?".to_string(),
        ActionKind::Delete => format!("Delete {} conversations?", count),
        ActionKind::RemoveStar if one => "Remove the star from this conversation?".to_string(),
        ActionKind::RemoveStar => format!("Remove the star from {} conversations?", count),
        ActionKind::MarkNotImportant if one => {
            "Mark this conversation as not important?".to_string()
        }
        ActionKind::MarkNotImportant => {
            format!("Mark {} conversations as not important?", count)
        }
        _ if one => "Archive this conversation?".to_string(),
        _ => format!("Archive {} conversations?", count),
    }
}

/// Backing mutation applied when a destructive removal completes
fn destructive_mutation(action: ActionKind) -> Option<Mutation> {
    match action {
        ActionKind::Delete => Some(Mutation::Delete),
        ActionKind::Archive => Some(Mutation::Archive),
        ActionKind::Mute => Some(Mutation::Mute),
        ActionKind::ReportSpam => Some(Mutation::ReportSpam),
        ActionKind::RemoveStar => Some(Mutation::Starred { value: false }),
        ActionKind::MarkNotImportant => Some(Mutation::Priority {
            value: Priority::Low,
        }),
        _ => None,
    }
}

pub struct SelectionActionController {
    selection: SharedSelection,
    dispatcher: Rc<EventDispatcher>,
    ports: Collaborators,
    account: Account,
    folder: Folder,
    settings: Settings,
    span: Span,
    state: ControllerState,
    /// The toolbar is currently presented
    toolbar_shown: bool,
    registrations: Vec<HandlerId>,
    this: Weak<RefCell<SelectionActionController>>,
}

impl SelectionActionController {
    /// Create a controller for the conversations shown in `folder`.
    ///
    /// `span` is the logging scope owned by the caller; everything the
    /// controller logs is recorded inside it.
    pub fn new(
        selection: SharedSelection,
        dispatcher: Rc<EventDispatcher>,
        ports: Collaborators,
        account: Account,
        folder: Folder,
        settings: Settings,
        span: Span,
    ) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|this| {
            RefCell::new(Self {
                selection,
                dispatcher,
                ports,
                account,
                folder,
                settings,
                span,
                state: ControllerState::Inactive,
                toolbar_shown: false,
                registrations: Vec::new(),
                this: this.clone(),
            })
        })
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_activated(&self) -> bool {
        self.state == ControllerState::Active
    }

    pub fn is_toolbar_shown(&self) -> bool {
        self.toolbar_shown
    }

    pub fn selection(&self) -> SharedSelection {
        self.selection.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Show the toolbar if anything is selected
    pub fn activate(&mut self) {
        let span = self.span.clone();
        let _enter = span.enter();

        let count = self.selection.borrow().len();
        if count == 0 {
            debug!("Nothing selected, not activating");
            return;
        }

        self.state = ControllerState::Active;
        if self.toolbar_shown {
            return;
        }

        info!("Activating selection toolbar for {} conversations", count);
        self.register_handlers();
        self.toolbar_shown = true;
        self.ports.presentation.show_toolbar(&selected_title(count));
        self.recompute_visibility();
    }

    /// Hide the toolbar, keeping the selection
    pub fn deactivate(&mut self) {
        if !self.toolbar_shown {
            return;
        }
        debug!(parent: &self.span, "Deactivating selection toolbar");
        self.state = ControllerState::Inactive;
        self.toolbar_shown = false;
        self.ports.presentation.hide_toolbar();
    }

    /// Tear down: hide the toolbar, stop observing, clear the selection.
    pub fn destroy(&mut self) {
        self.deactivate();
        self.state = ControllerState::Inactive;
        self.unregister_handlers();
        self.clear_selection();
        self.ports.presentation.refresh_list();
    }

    fn register_handlers(&mut self) {
        if !self.registrations.is_empty() {
            return;
        }
        let lifecycle: Weak<RefCell<dyn ActionModeLifecycle>> = self.this.clone();
        let observer: Weak<RefCell<dyn SelectionObserver>> = self.this.clone();
        let folders: Weak<RefCell<dyn FolderChangeListener>> = self.this.clone();

        self.registrations = vec![
            self.dispatcher.register(Handler::ActionMode(lifecycle)),
            self.dispatcher.register(Handler::Selection(observer)),
            self.dispatcher.register(Handler::FolderChange(folders)),
        ];
    }

    fn unregister_handlers(&mut self) {
        for id in self.registrations.drain(..) {
            self.dispatcher.unregister(id);
        }
    }

    /// Empty the selection and let observers know
    fn clear_selection(&mut self) {
        let event = self.selection.borrow_mut().clear();
        if let Some(event) = event {
            self.dispatcher.post(UiEvent::Selection(event));
        }
    }

    /// Redraw the list and resync item visibility without showing or hiding the toolbar
    fn update_selection(&mut self) {
        self.ports.presentation.refresh_list();
        if self.toolbar_shown {
            self.recompute_visibility();
        }
    }

    fn ensure_actionable(&self) -> Result<()> {
        if self.selection.borrow().is_empty() {
            return Err(SelectionError::NoSelection);
        }
        if self.state != ControllerState::Active {
            return Err(SelectionError::InvalidState);
        }
        Ok(())
    }

    /// Recompute and push visibility for every toolbar item
    pub fn recompute_visibility(&mut self) -> MenuVisibility {
        let context = ActionContext::new(
            self.selection.borrow().values(),
            self.folder.capabilities,
            self.account.capabilities,
        );
        let visibility = context.visibility();
        for (action, visible) in visibility.items() {
            self.ports.presentation.set_item_visible(action, visible);
        }
        visibility
    }

    /// Enable or disable a toolbar item while the toolbar is active
    pub fn set_command_enabled(&mut self, action: ActionKind, enabled: bool) {
        if self.state == ControllerState::Active {
            self.ports.presentation.set_item_enabled(action, enabled);
        }
    }

    /// Run the action picked from the toolbar
    pub fn on_action_invoked(&mut self, action: ActionKind) -> Result<()> {
        let span = self.span.clone();
        let _enter = span.enter();

        self.ensure_actionable()?;
        debug!("Action invoked: {}", action);

        let capabilities = self.folder.capabilities;
        match action {
            ActionKind::Delete | ActionKind::Archive | ActionKind::ReportSpam => {
                self.perform_destructive(action)
            }
            ActionKind::Mute if capabilities.destructive_mute => self.perform_destructive(action),
            ActionKind::Mute => self.apply_to_selection(Mutation::Mute, |_| {}),
            ActionKind::Read => self.mark_read(true),
            ActionKind::Unread => self.mark_read(false),
            ActionKind::Star => self.star(true),
            ActionKind::RemoveStar if self.folder.folder_type == FolderType::Starred => {
                debug!("In a starred folder, removing the star");
                self.perform_destructive(action)
            }
            ActionKind::RemoveStar => self.star(false),
            ActionKind::ChangeFolder => {
                let conversations = self.selection.borrow().values();
                self.ports
                    .folder_picker
                    .choose_folders(&self.account, &conversations);
            }
            ActionKind::MarkImportant => self.mark_important(true),
            ActionKind::MarkNotImportant if capabilities.only_important => {
                self.perform_destructive(action)
            }
            ActionKind::MarkNotImportant => self.mark_important(false),
        }
        Ok(())
    }

    fn needs_confirmation(&self, action: ActionKind) -> bool {
        match action {
            ActionKind::Delete => self.settings.confirm_delete,
            ActionKind::Archive | ActionKind::RemoveStar | ActionKind::MarkNotImportant => {
                self.settings.confirm_archive
            }
            _ => false,
        }
    }

    fn perform_destructive(&mut self, action: ActionKind) {
        let conversations = self.selection.borrow().values();
        if self.needs_confirmation(action) {
            let message = confirmation_message(action, conversations.len());
            debug!("Asking for confirmation: {}", message);
            self.ports.confirmation.confirm(
                &message,
                PendingAction {
                    action,
                    conversations,
                },
            );
        } else {
            self.start_removal(action, conversations);
        }
    }

    /// The user accepted a confirmation prompt
    pub fn on_confirm_accepted(&mut self, pending: PendingAction) -> Result<()> {
        if pending.conversations.is_empty() {
            return Err(SelectionError::NoSelection);
        }
        info!(
            parent: &self.span,
            "Confirmed {} on {} conversations",
            pending.action,
            pending.conversations.len()
        );
        self.start_removal(pending.action, pending.conversations);
        Ok(())
    }

    fn start_removal(&mut self, action: ActionKind, conversations: Vec<Conversation>) {
        let items = conversations.clone();
        let completion = Completion::Destructive {
            action,
            conversations,
        };
        if action == ActionKind::Archive {
            self.ports.mutation.archive(&items, completion);
        } else {
            self.ports.mutation.remove(&items, completion);
        }
    }

    /// Run the continuation of a removal that finished
    pub fn on_action_complete(&mut self, completion: Completion) -> Result<()> {
        let span = self.span.clone();
        let _enter = span.enter();

        match completion {
            Completion::Destructive {
                action,
                conversations,
            } => self.complete_destructive(action, conversations),
            Completion::FolderChange(change) => self.complete_folder_change(change),
        }
    }

    fn complete_destructive(
        &mut self,
        action: ActionKind,
        mut conversations: Vec<Conversation>,
    ) -> Result<()> {
        let Some(mutation) = destructive_mutation(action) else {
            warn!("{} is not a destructive action", action);
            return Err(SelectionError::InvalidState);
        };

        if action == ActionKind::Mute && self.folder.capabilities.destructive_mute {
            for conversation in &mut conversations {
                conversation.local_delete_on_update = true;
            }
        }

        info!(
            "Completed {} on {} conversations",
            action,
            conversations.len()
        );
        self.ports.presentation.action_completed();
        self.ports
            .undo
            .on_undo_available(UndoRecord::new(
                conversations.len(),
                action,
                true,
                self.settings.undo_window(),
            ));
        self.ports.mutation.apply(&conversations, mutation);
        self.clear_selection();
        Ok(())
    }

    /// Apply the folders picked for the selection.
    ///
    /// When the current folder is no longer among them, the conversations
    /// leave this list: they are marked for local removal and go through the
    /// destructive path before the new folders are persisted.
    pub fn on_folder_reassignment(&mut self, folders: Vec<Folder>) -> Result<()> {
        let span = self.span.clone();
        let _enter = span.enter();

        self.ensure_actionable()?;

        let keeps_current = folders.iter().any(|f| f.id == self.folder.id);
        let conversations = if keeps_current {
            self.selection.borrow().values()
        } else {
            let mut selection = self.selection.borrow_mut();
            for conversation in selection.iter_mut() {
                conversation.local_delete_on_update = true;
            }
            selection.values()
        };

        debug!(
            "Folder change to [{}] for {} conversations, leaves current folder: {}",
            Folder::join_ids(&folders),
            conversations.len(),
            !keeps_current
        );

        let change = FolderChange {
            folders,
            conversations,
            destructive: !keeps_current,
        };

        if change.destructive {
            let items = change.conversations.clone();
            self.ports
                .mutation
                .remove(&items, Completion::FolderChange(change));
            Ok(())
        } else {
            self.complete_folder_change(change)
        }
    }

    fn complete_folder_change(&mut self, change: FolderChange) -> Result<()> {
        let folder_list = Folder::join_ids(&change.folders);
        let raw_folders = Folder::serialize_folders(&change.folders)?;

        self.ports.presentation.action_completed();
        // Only a change that took the conversations off this list is undoable,
        // and the record is flagged so the undo restores them to the list
        if change.destructive {
            self.ports.undo.on_undo_available(UndoRecord::new(
                change.conversations.len(),
                ActionKind::ChangeFolder,
                true,
                self.settings.undo_window(),
            ));
        }

        self.ports.mutation.apply(
            &change.conversations,
            Mutation::Folders {
                folder_list,
                raw_folders,
            },
        );
        self.clear_selection();
        if change.destructive {
            self.ports.presentation.refresh_list();
        }
        Ok(())
    }

    /// Update the selected conversations in place and return a snapshot
    fn update_selected(&mut self, update: impl FnMut(&mut Conversation)) -> Vec<Conversation> {
        let mut selection = self.selection.borrow_mut();
        selection.iter_mut().for_each(update);
        selection.values()
    }

    fn apply_to_selection(&mut self, mutation: Mutation, update: impl FnMut(&mut Conversation)) {
        let conversations = self.update_selected(update);
        debug!(
            "Applying {} to {} conversations",
            mutation.type_str(),
            conversations.len()
        );
        self.ports.mutation.apply(&conversations, mutation);
        self.update_selection();
    }

    fn mark_read(&mut self, read: bool) {
        self.apply_to_selection(Mutation::Read { value: read }, |c| c.read = read);
    }

    fn star(&mut self, starred: bool) {
        self.apply_to_selection(Mutation::Starred { value: starred }, |c| {
            c.starred = starred
        });
    }

    fn mark_important(&mut self, important: bool) {
        let priority = if important {
            Priority::High
        } else {
            Priority::Low
        };
        self.apply_to_selection(Mutation::Priority { value: priority }, |c| {
            c.priority = priority
        });
    }
}

impl ActionModeLifecycle for SelectionActionController {
    fn on_action_item_clicked(&mut self, action: ActionKind) -> bool {
        match self.on_action_invoked(action) {
            Ok(()) => true,
            Err(e) => {
                debug!(parent: &self.span, "Ignoring {}: {}", action, e);
                false
            }
        }
    }

    fn on_destroy_action_mode(&mut self) {
        self.toolbar_shown = false;
        // Dismissed while active means the user is done with the selection
        if self.state == ControllerState::Active {
            self.destroy();
        }
    }
}

impl SelectionObserver for SelectionActionController {
    fn on_set_populated(&mut self) {}

    fn on_set_changed(&mut self) {
        // Leave the items alone right before the toolbar goes away
        let count = self.selection.borrow().len();
        if count == 0 {
            return;
        }
        if self.toolbar_shown {
            self.ports.presentation.set_title(&selected_title(count));
            self.recompute_visibility();
        }
    }

    fn on_set_empty(&mut self) {
        debug!(parent: &self.span, "Selection emptied");
        self.destroy();
    }
}

impl FolderChangeListener for SelectionActionController {
    fn on_folder_changes_commit(&mut self, folders: Vec<Folder>) {
        if let Err(e) = self.on_folder_reassignment(folders) {
            if e.is_guard() {
                debug!(parent: &self.span, "Ignoring folder change: {}", e);
            } else {
                error!(parent: &self.span, "Folder change failed: {}", e);
            }
        }
    }
}
