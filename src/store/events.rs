//! Synchronous event bus for store mutations.
//!
//! Collaborators subscribe narrowly (one event kind) or broadly
//! (`DataChanged`, fired alongside every mutation). Fan-out is synchronous
//! and single-threaded: `emit` invokes every registered handler for the
//! event's kind immediately, in registration order, on the caller's stack.
//! Each handler call is isolated; a panicking handler is logged and does
//! not stop the remaining handlers or the emitting operation.

use std::collections::HashMap;
use std::fmt;

use crate::models::{Notification, Project, Settings, Task};
use crate::store::snapshot::Snapshot;

/// The kinds of events the store emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Initialized,
    ProjectCreated,
    ProjectUpdated,
    ProjectDeleted,
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    NotificationAdded,
    TimerStarted,
    TimerStopped,
    SettingsChanged,
    DataImported,
    DataCleared,
    DataChanged,
}

impl EventKind {
    /// Collaborator-facing event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Initialized => "initialized",
            EventKind::ProjectCreated => "projectCreated",
            EventKind::ProjectUpdated => "projectUpdated",
            EventKind::ProjectDeleted => "projectDeleted",
            EventKind::TaskCreated => "taskCreated",
            EventKind::TaskUpdated => "taskUpdated",
            EventKind::TaskDeleted => "taskDeleted",
            EventKind::NotificationAdded => "notificationAdded",
            EventKind::TimerStarted => "timerStarted",
            EventKind::TimerStopped => "timerStopped",
            EventKind::SettingsChanged => "settingsChanged",
            EventKind::DataImported => "dataImported",
            EventKind::DataCleared => "dataCleared",
            EventKind::DataChanged => "dataChanged",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An emitted event together with its payload.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    Initialized(Snapshot),
    ProjectCreated(Project),
    ProjectUpdated(Project),
    ProjectDeleted { id: String, name: String },
    TaskCreated(Task),
    TaskUpdated(Task),
    TaskDeleted { id: String, title: String },
    NotificationAdded(Notification),
    TimerStarted { task_id: String },
    TimerStopped { task_id: String },
    SettingsChanged(Settings),
    DataImported(Snapshot),
    DataCleared,
    DataChanged,
}

impl StoreEvent {
    /// The kind this payload belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            StoreEvent::Initialized(_) => EventKind::Initialized,
            StoreEvent::ProjectCreated(_) => EventKind::ProjectCreated,
            StoreEvent::ProjectUpdated(_) => EventKind::ProjectUpdated,
            StoreEvent::ProjectDeleted { .. } => EventKind::ProjectDeleted,
            StoreEvent::TaskCreated(_) => EventKind::TaskCreated,
            StoreEvent::TaskUpdated(_) => EventKind::TaskUpdated,
            StoreEvent::TaskDeleted { .. } => EventKind::TaskDeleted,
            StoreEvent::NotificationAdded(_) => EventKind::NotificationAdded,
            StoreEvent::TimerStarted { .. } => EventKind::TimerStarted,
            StoreEvent::TimerStopped { .. } => EventKind::TimerStopped,
            StoreEvent::SettingsChanged(_) => EventKind::SettingsChanged,
            StoreEvent::DataImported(_) => EventKind::DataImported,
            StoreEvent::DataCleared => EventKind::DataCleared,
            StoreEvent::DataChanged => EventKind::DataChanged,
        }
    }
}

type Handler = Box<dyn Fn(&StoreEvent)>;

/// Token returned by `on`, consumed by `off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    kind: EventKind,
    id: u64,
}

/// Registry of event handlers keyed by kind.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<(u64, Handler)>>,
    next_id: u64,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind.
    pub fn on(&mut self, kind: EventKind, handler: impl Fn(&StoreEvent) + 'static) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        Subscription { kind, id }
    }

    /// Remove a previously registered handler. Returns false if the
    /// subscription was already removed.
    pub fn off(&mut self, subscription: Subscription) -> bool {
        let Some(handlers) = self.handlers.get_mut(&subscription.kind) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != subscription.id);
        handlers.len() < before
    }

    /// Fan an event out to its handlers in registration order.
    pub fn emit(&self, event: &StoreEvent) {
        let Some(handlers) = self.handlers.get(&event.kind()) else {
            return;
        };
        tracing::debug!("Emitting {} to {} handler(s)", event.kind(), handlers.len());
        for (id, handler) in handlers {
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(event);
            }));
            if outcome.is_err() {
                tracing::error!("Handler {} panicked on {}", id, event.kind());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_handlers_run_in_registration_order() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for marker in [1, 2, 3] {
            let seen = Rc::clone(&seen);
            bus.on(EventKind::DataChanged, move |_| {
                seen.borrow_mut().push(marker);
            });
        }

        bus.emit(&StoreEvent::DataChanged);
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_emit_only_reaches_matching_kind() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&hits);
        bus.on(EventKind::DataCleared, move |_| {
            *counter.borrow_mut() += 1;
        });

        bus.emit(&StoreEvent::DataChanged);
        assert_eq!(*hits.borrow(), 0);
        bus.emit(&StoreEvent::DataCleared);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_panicking_handler_does_not_stop_siblings() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        bus.on(EventKind::DataChanged, move |_| {
            first.borrow_mut().push("first");
        });
        bus.on(EventKind::DataChanged, |_| {
            panic!("handler failure");
        });
        let last = Rc::clone(&seen);
        bus.on(EventKind::DataChanged, move |_| {
            last.borrow_mut().push("last");
        });

        bus.emit(&StoreEvent::DataChanged);
        assert_eq!(*seen.borrow(), vec!["first", "last"]);
    }

    #[test]
    fn test_off_removes_handler() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&hits);
        let subscription = bus.on(EventKind::DataChanged, move |_| {
            *counter.borrow_mut() += 1;
        });

        bus.emit(&StoreEvent::DataChanged);
        assert!(bus.off(subscription));
        bus.emit(&StoreEvent::DataChanged);
        assert_eq!(*hits.borrow(), 1);

        // Second removal is a no-op
        assert!(!bus.off(subscription));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(EventKind::ProjectCreated.as_str(), "projectCreated");
        assert_eq!(EventKind::NotificationAdded.as_str(), "notificationAdded");
        assert_eq!(EventKind::DataChanged.as_str(), "dataChanged");
        assert_eq!(
            StoreEvent::TimerStarted {
                task_id: "task-1".to_string()
            }
            .kind(),
            EventKind::TimerStarted
        );
    }
}
