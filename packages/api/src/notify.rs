//! # Ordered, single-threaded change notification
//!
//! [`Listeners`] is the fan-out primitive behind both the session store and the
//! profile context. It runs on the UI thread (`Rc`/`RefCell`, no `Send` bounds) and
//! gives every subscriber three guarantees:
//!
//! - events are delivered in the order they were dispatched;
//! - a handler is never invoked re-entrantly: an event dispatched from inside a
//!   handler is queued and delivered once the current event has reached everyone;
//! - once [`Subscription::cancel`] returns (or the subscription is dropped) the
//!   handler is never invoked again, even for an event already being delivered.
//!
//! Subscribers added while an event is being delivered start with the next event.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type Handler<E> = RefCell<Box<dyn FnMut(&E)>>;

struct Slot<E> {
    id: u64,
    active: Cell<bool>,
    handler: Handler<E>,
}

struct Shared<E> {
    slots: RefCell<Vec<Rc<Slot<E>>>>,
    queue: RefCell<VecDeque<E>>,
    dispatching: Cell<bool>,
    next_id: Cell<u64>,
}

impl<E> Shared<E> {
    fn remove(&self, id: u64) {
        let mut slots = self.slots.borrow_mut();
        if let Some(pos) = slots.iter().position(|slot| slot.id == id) {
            slots[pos].active.set(false);
            slots.remove(pos);
        }
    }
}

/// A list of handlers receiving events of type `E`.
pub struct Listeners<E> {
    shared: Rc<Shared<E>>,
}

impl<E> Clone for Listeners<E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            shared: Rc::new(Shared {
                slots: RefCell::new(Vec::new()),
                queue: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
                next_id: Cell::new(0),
            }),
        }
    }
}

impl<E: 'static> Listeners<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. It stays registered until the returned
    /// [`Subscription`] is cancelled or dropped.
    pub fn subscribe(&self, handler: impl FnMut(&E) + 'static) -> Subscription {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);
        self.shared.slots.borrow_mut().push(Rc::new(Slot {
            id,
            active: Cell::new(true),
            handler: RefCell::new(Box::new(handler)),
        }));

        let shared: Weak<Shared<E>> = Rc::downgrade(&self.shared);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(shared) = shared.upgrade() {
                    shared.remove(id);
                }
            })),
        }
    }

    /// Deliver `event` to every active handler.
    ///
    /// When called from inside a handler the event is queued and delivered after the
    /// event currently in flight, by the outermost `dispatch` call.
    pub fn dispatch(&self, event: E) {
        self.shared.queue.borrow_mut().push_back(event);
        if self.shared.dispatching.replace(true) {
            return;
        }
        let _guard = DispatchGuard(&self.shared.dispatching);

        loop {
            let Some(event) = self.shared.queue.borrow_mut().pop_front() else {
                break;
            };
            let slots: Vec<Rc<Slot<E>>> = self.shared.slots.borrow().clone();
            for slot in slots {
                if !slot.active.get() {
                    continue;
                }
                let mut handler = slot.handler.borrow_mut();
                (*handler)(&event);
            }
        }
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.shared.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release every handler and drop queued events.
    pub fn clear(&self) {
        let slots = std::mem::take(&mut *self.shared.slots.borrow_mut());
        for slot in slots {
            slot.active.set(false);
        }
        self.shared.queue.borrow_mut().clear();
    }
}

struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Handle to a registered handler. Cancelling or dropping it unregisters the handler.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unregister the handler. No invocation starts after this returns.
    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
