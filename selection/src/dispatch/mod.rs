//! UI event dispatcher
//!
//! Lifecycle callbacks from the toolbar, the selection set and the folder
//! picker are delivered to tagged handlers. Events are sent on a channel by
//! `post` (or any `sender()` clone) and drained by `run_pending`, which the
//! owner calls from the top of its UI loop. Handlers are held weakly; a
//! dropped handler is pruned on the next delivery.

use flume::{Receiver, Sender, TryRecvError};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

use crate::state::SelectionEvent;
use crate::types::{ActionKind, Folder};

/// Toolbar lifecycle callbacks
pub trait ActionModeLifecycle {
    /// Returns whether the action was handled
    fn on_action_item_clicked(&mut self, action: ActionKind) -> bool;
    /// The toolbar was dismissed by the user or the framework
    fn on_destroy_action_mode(&mut self);
}

/// Selection set callbacks
pub trait SelectionObserver {
    fn on_set_populated(&mut self);
    fn on_set_changed(&mut self);
    fn on_set_empty(&mut self);
}

pub trait FolderChangeListener {
    fn on_folder_changes_commit(&mut self, folders: Vec<Folder>);
}

/// Which capability interface an event is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    ActionModeLifecycle,
    SelectionObserver,
    FolderChangeListener,
}

/// A registered handler, tagged by the interface it implements
#[derive(Clone)]
pub enum Handler {
    ActionMode(Weak<RefCell<dyn ActionModeLifecycle>>),
    Selection(Weak<RefCell<dyn SelectionObserver>>),
    FolderChange(Weak<RefCell<dyn FolderChangeListener>>),
}

impl Handler {
    pub fn kind(&self) -> HandlerKind {
        match self {
            Self::ActionMode(_) => HandlerKind::ActionModeLifecycle,
            Self::Selection(_) => HandlerKind::SelectionObserver,
            Self::FolderChange(_) => HandlerKind::FolderChangeListener,
        }
    }

    fn is_alive(&self) -> bool {
        match self {
            Self::ActionMode(h) => h.strong_count() > 0,
            Self::Selection(h) => h.strong_count() > 0,
            Self::FolderChange(h) => h.strong_count() > 0,
        }
    }
}

/// Events delivered to handlers
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ActionItemClicked(ActionKind),
    ActionModeDestroyed,
    Selection(SelectionEvent),
    FolderChangesCommitted(Vec<Folder>),
}

impl UiEvent {
    pub fn handler_kind(&self) -> HandlerKind {
        match self {
            Self::ActionItemClicked(_) | Self::ActionModeDestroyed => {
                HandlerKind::ActionModeLifecycle
            }
            Self::Selection(_) => HandlerKind::SelectionObserver,
            Self::FolderChangesCommitted(_) => HandlerKind::FolderChangeListener,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

pub struct EventDispatcher {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(HandlerId, Handler)>>,
    tx: Sender<UiEvent>,
    rx: Receiver<UiEvent>,
}

impl Default for EventDispatcher {
    fn default() -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            next_id: Cell::new(0),
            handlers: RefCell::new(Vec::new()),
            tx,
            rx,
        }
    }
}

impl EventDispatcher {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Sending half of the event channel, for producers that outlive a borrow
    pub fn sender(&self) -> Sender<UiEvent> {
        self.tx.clone()
    }

    pub fn register(&self, handler: Handler) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        debug!("Registering {:?} handler {:?}", handler.kind(), id);
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    /// Returns false when the handler was not registered
    pub fn unregister(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(registered, _)| *registered != id);
        handlers.len() != before
    }

    pub fn is_registered(&self, id: HandlerId) -> bool {
        self.handlers.borrow().iter().any(|(registered, _)| *registered == id)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn post(&self, event: UiEvent) {
        // The dispatcher owns the receiver, so the channel cannot be closed here
        if let Err(e) = self.tx.send(event) {
            warn!("Event channel closed, dropping {:?}", e.into_inner());
        }
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Deliver queued events, including events posted while delivering.
    /// Returns the number of events delivered.
    pub fn run_pending(&self) -> usize {
        let mut delivered = 0;
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    self.deliver(&event);
                    delivered += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("Event channel disconnected");
                    break;
                }
            }
        }
        delivered
    }

    fn deliver(&self, event: &UiEvent) {
        let kind = event.handler_kind();
        let targets: Vec<(HandlerId, Handler)> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(_, handler)| handler.kind() == kind)
            .cloned()
            .collect();

        debug!("Delivering {:?} to {} handler(s)", event, targets.len());

        for (id, handler) in targets {
            // An earlier handler may have unregistered this one
            if !self.is_registered(id) {
                continue;
            }
            Self::invoke(id, &handler, event);
        }

        self.handlers.borrow_mut().retain(|(_, handler)| handler.is_alive());
    }

    fn invoke(id: HandlerId, handler: &Handler, event: &UiEvent) {
        match (handler, event) {
            (Handler::ActionMode(weak), UiEvent::ActionItemClicked(action)) => {
                if let Some(rc) = weak.upgrade() {
                    match rc.try_borrow_mut() {
                        Ok(mut h) => {
                            if !h.on_action_item_clicked(*action) {
                                debug!("Action {} not handled by {:?}", action, id);
                            }
                        }
                        Err(_) => warn!("Handler {:?} busy, dropping {:?}", id, event),
                    }
                }
            }
            (Handler::ActionMode(weak), UiEvent::ActionModeDestroyed) => {
                if let Some(rc) = weak.upgrade() {
                    match rc.try_borrow_mut() {
                        Ok(mut h) => h.on_destroy_action_mode(),
                        Err(_) => warn!("Handler {:?} busy, dropping {:?}", id, event),
                    }
                }
            }
            (Handler::Selection(weak), UiEvent::Selection(change)) => {
                if let Some(rc) = weak.upgrade() {
                    match rc.try_borrow_mut() {
                        Ok(mut h) => match change {
                            SelectionEvent::Populated => h.on_set_populated(),
                            SelectionEvent::Changed => h.on_set_changed(),
                            SelectionEvent::Emptied => h.on_set_empty(),
                        },
                        Err(_) => warn!("Handler {:?} busy, dropping {:?}", id, event),
                    }
                }
            }
            (Handler::FolderChange(weak), UiEvent::FolderChangesCommitted(folders)) => {
                if let Some(rc) = weak.upgrade() {
                    match rc.try_borrow_mut() {
                        Ok(mut h) => h.on_folder_changes_commit(folders.clone()),
                        Err(_) => warn!("Handler {:?} busy, dropping {:?}", id, event),
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl SelectionObserver for Recorder {
        fn on_set_populated(&mut self) {
            self.calls.push("populated".into());
        }
        fn on_set_changed(&mut self) {
            self.calls.push("changed".into());
        }
        fn on_set_empty(&mut self) {
            self.calls.push("empty".into());
        }
    }

    impl FolderChangeListener for Recorder {
        fn on_folder_changes_commit(&mut self, folders: Vec<Folder>) {
            self.calls.push(format!("folders:{}", Folder::join_ids(&folders)));
        }
    }

    fn selection_handler(rc: &Rc<RefCell<Recorder>>) -> Handler {
        let observer: Rc<RefCell<dyn SelectionObserver>> = rc.clone();
        Handler::Selection(Rc::downgrade(&observer))
    }

    #[test]
    fn test_events_routed_by_kind() {
        let dispatcher = EventDispatcher::new();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        dispatcher.register(selection_handler(&recorder));

        dispatcher.post(UiEvent::Selection(SelectionEvent::Populated));
        dispatcher.post(UiEvent::FolderChangesCommitted(vec![Folder::new("F1", "A")]));
        dispatcher.post(UiEvent::Selection(SelectionEvent::Emptied));

        assert_eq!(dispatcher.run_pending(), 3);
        assert_eq!(recorder.borrow().calls, vec!["populated", "empty"]);
        assert_eq!(dispatcher.pending(), 0);
    }

    #[test]
    fn test_multiple_interfaces_on_one_object() {
        let dispatcher = EventDispatcher::new();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let listener: Rc<RefCell<dyn FolderChangeListener>> = recorder.clone();
        dispatcher.register(selection_handler(&recorder));
        dispatcher.register(Handler::FolderChange(Rc::downgrade(&listener)));

        dispatcher.post(UiEvent::FolderChangesCommitted(vec![
            Folder::new("F1", "A"),
            Folder::new("F2", "B"),
        ]));
        dispatcher.run_pending();

        assert_eq!(recorder.borrow().calls, vec!["folders:F1,F2"]);
    }

    #[test]
    fn test_unregister() {
        let dispatcher = EventDispatcher::new();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let id = dispatcher.register(selection_handler(&recorder));

        assert!(dispatcher.unregister(id));
        assert!(!dispatcher.unregister(id));

        dispatcher.post(UiEvent::Selection(SelectionEvent::Changed));
        dispatcher.run_pending();
        assert!(recorder.borrow().calls.is_empty());
    }

    #[test]
    fn test_sender_clone_feeds_dispatcher() {
        let dispatcher = EventDispatcher::new();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        dispatcher.register(selection_handler(&recorder));

        let tx = dispatcher.sender();
        tx.send(UiEvent::Selection(SelectionEvent::Changed)).unwrap();
        dispatcher.post(UiEvent::Selection(SelectionEvent::Emptied));
        assert_eq!(dispatcher.pending(), 2);

        assert_eq!(dispatcher.run_pending(), 2);
        assert_eq!(recorder.borrow().calls, vec!["changed", "empty"]);
        assert_eq!(dispatcher.run_pending(), 0);
    }

    #[test]
    fn test_dropped_handlers_are_pruned() {
        let dispatcher = EventDispatcher::new();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        dispatcher.register(selection_handler(&recorder));
        drop(recorder);

        dispatcher.post(UiEvent::Selection(SelectionEvent::Changed));
        dispatcher.run_pending();
        assert_eq!(dispatcher.handler_count(), 0);
    }
}
