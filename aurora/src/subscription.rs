//! Handler registration with RAII unsubscription
//!
//! A [`Registry`] owns a set of handlers ordered by priority. Registering
//! returns a [`Subscription`] token; dropping the token (or calling
//! [`Subscription::unsubscribe`]) removes the handler. Delivery is
//! single-threaded and follows priority, then registration order.
//!
//! Handlers may unsubscribe, or register new handlers, while a delivery is
//! in progress. A removed handler is skipped for the rest of that delivery
//! and never called again; a new handler first runs on the next delivery.
//! A delivery started from inside a handler reaches every other registered
//! handler, but never re-enters one that is still running.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Order in which handlers run; higher priorities run first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Built-in editor behavior
    Editor,
    Low,
    #[default]
    Normal,
    High,
    /// Runs before everything else
    Critical,
}

/// Shared so a delivery can keep running a handler that unsubscribes itself
type Slot<H> = Rc<RefCell<Box<H>>>;

struct Entry<H: ?Sized> {
    id: u64,
    priority: Priority,
    handler: Slot<H>,
}

struct Inner<H: ?Sized> {
    next_id: u64,
    entries: Vec<Entry<H>>,
}

impl<H: ?Sized> Inner<H> {
    fn insert(&mut self, entry: Entry<H>) {
        let position = self
            .entries
            .iter()
            .position(|e| e.priority < entry.priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, entry);
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|e| e.id != id);
    }

    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

/// Priority-ordered set of handlers of type `H`
pub struct Registry<H: ?Sized> {
    inner: Rc<RefCell<Inner<H>>>,
}

impl<H: ?Sized + 'static> Registry<H> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                next_id: 1,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a handler at the default priority
    pub fn register(&self, handler: Box<H>) -> Subscription {
        self.register_with_priority(Priority::Normal, handler)
    }

    /// Register a handler at the given priority
    pub fn register_with_priority(&self, priority: Priority, handler: Box<H>) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.insert(Entry {
                id,
                priority,
                handler: Rc::new(RefCell::new(handler)),
            });
            id
        };

        let registry: Weak<RefCell<Inner<H>>> = Rc::downgrade(&self.inner);
        Subscription::new(id, move || {
            if let Some(inner) = registry.upgrade() {
                inner.borrow_mut().remove(id);
            }
        })
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Check if no handler is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `visit` over the handlers in order until it returns `true`
    ///
    /// The handler list is captured when the delivery starts. Handlers
    /// unsubscribed since then are skipped.
    ///
    /// # Returns
    /// * `true` if some handler reported the delivery as handled
    pub fn visit(&self, mut visit: impl FnMut(&mut H) -> bool) -> bool {
        let handlers: Vec<(u64, Slot<H>)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|e| (e.id, Rc::clone(&e.handler)))
            .collect();

        for (id, slot) in handlers {
            if !self.inner.borrow().contains(id) {
                continue;
            }
            // Already running further up the stack
            let Ok(mut handler) = slot.try_borrow_mut() else {
                continue;
            };
            if visit(&mut **handler) {
                return true;
            }
        }
        false
    }

    /// Deliver to every handler regardless of what they return
    pub fn for_each(&self, mut visit: impl FnMut(&mut H)) {
        self.visit(|handler| {
            visit(handler);
            false
        });
    }
}

impl<H: ?Sized + 'static> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("handlers", &self.inner.borrow().entries.len())
            .finish()
    }
}

/// Token for a registered handler
///
/// Dropping the token unsubscribes the handler.
#[must_use = "dropping a Subscription unsubscribes its handler"]
pub struct Subscription {
    id: u64,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(id: u64, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Identifier of the registration, unique within its registry
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the handler now
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
