//! UI events and the document-level listener registry.
//!
//! [§ 2.2 Interface Event](https://dom.spec.whatwg.org/#interface-event)
//!
//! Only the handful of UI events that affect selector state are modelled.
//! Listeners are registered on the document and receive every dispatched
//! event; the returned [`ListenerGuard`] removes the listener when dropped.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use strum_macros::{Display, IntoStaticStr};

use crate::NodeId;

/// Pointer button bitmask value for the primary button.
///
/// [UI Events § MouseEvent.buttons](https://w3c.github.io/uievents/#dom-mouseevent-buttons)
pub const PRIMARY_BUTTON: u16 = 1;

/// The event types dispatched through [`EventListeners`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum EventKind {
    /// `mouseover`
    MouseOver,
    /// `mouseout`
    MouseOut,
    /// `mousedown`
    MouseDown,
    /// `mouseup`
    MouseUp,
    /// `focus`
    Focus,
    /// `blur`
    Blur,
    /// `keydown`
    KeyDown,
    /// `keyup`
    KeyUp,
}

/// A dispatched UI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// "type" of the event.
    pub kind: EventKind,
    /// "target" of the event.
    pub target: NodeId,
    /// Pressed pointer buttons as a bitmask (`MouseEvent.buttons`).
    pub buttons: u16,
    /// Key value for keyboard events (`KeyboardEvent.key`), e.g. `"Tab"`.
    pub key: Option<String>,
    /// "The `isTrusted` attribute must return the value it was initialized to."
    pub is_trusted: bool,
}

impl Event {
    /// Create a trusted event with no buttons and no key.
    #[must_use]
    pub const fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            buttons: 0,
            key: None,
            is_trusted: true,
        }
    }

    /// Set the pressed-buttons bitmask.
    #[must_use]
    pub const fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = buttons;
        self
    }

    /// Set the key value.
    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// Mark the event as synthetic (script-dispatched).
    #[must_use]
    pub const fn untrusted(mut self) -> Self {
        self.is_trusted = false;
        self
    }

    /// The DOM event type string, e.g. `"mousedown"`.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.kind.into()
    }
}

/// A registered event callback.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Listener registry shared between a [`DomTree`](crate::DomTree) and the
/// guards handed out to subscribers.
#[derive(Default)]
pub struct EventListeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Listener)>>,
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("count", &self.len())
            .finish()
    }
}

impl EventListeners {
    /// Register a listener; it stays registered for as long as the returned
    /// guard is alive.
    #[must_use = "dropping the guard unregisters the listener"]
    pub fn add(self: &Rc<Self>, listener: Listener) -> ListenerGuard {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, listener));
        ListenerGuard {
            registry: Rc::downgrade(self),
            id,
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Invoke every registered listener with `event`.
    pub fn dispatch(&self, event: &Event) {
        // Snapshot so listeners may add or drop guards while running.
        let listeners: Vec<Listener> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
    }
}

/// Scoped registration returned by [`EventListeners::add`].
#[derive(Debug)]
pub struct ListenerGuard {
    registry: Weak<EventListeners>,
    id: u64,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}
