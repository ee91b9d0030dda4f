//! Scroll event delivery
//!
//! Listeners are attached with [`ScrollBus::subscribe`] and stay attached for
//! exactly as long as the returned [`Subscription`] lives.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::layout::SectionLayout;

/// A scroll position change, with the geometry current at delivery time
#[derive(Clone, Copy)]
pub struct ScrollEvent<'a> {
    pub offset: u32,
    pub layout: &'a dyn SectionLayout,
}

impl std::fmt::Debug for ScrollEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollEvent").field("offset", &self.offset).finish_non_exhaustive()
    }
}

type Listener = Rc<RefCell<dyn FnMut(&ScrollEvent<'_>)>>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: BTreeMap<u64, Listener>,
}

/// Single-threaded scroll event hub
#[derive(Clone, Default)]
pub struct ScrollBus {
    listeners: Rc<RefCell<Listeners>>,
}

impl ScrollBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener; it is detached when the subscription drops
    #[must_use = "dropping the subscription detaches the listener immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&ScrollEvent<'_>) + 'static,
    {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.insert(id, Rc::new(RefCell::new(listener)));

        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Deliver an event to every attached listener, in subscription order.
    ///
    /// A listener detached by an earlier listener during the same emission is
    /// not called. A listener that is already running (re-entrant emit) is
    /// skipped for the nested event.
    pub fn emit(&self, event: &ScrollEvent<'_>) {
        let snapshot: Vec<(u64, Listener)> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            if !self.listeners.borrow().entries.contains_key(&id) {
                continue;
            }
            if let Ok(mut callback) = listener.try_borrow_mut() {
                (&mut *callback)(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }
}

impl std::fmt::Debug for ScrollBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle keeping a listener attached to its bus
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Subscription {
    /// Detach now instead of at drop
    pub fn unsubscribe(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        self.listeners
            .upgrade()
            .is_some_and(|listeners| listeners.borrow().entries.contains_key(&self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            // the removed closure is dropped after the borrow ends
            let removed = listeners.borrow_mut().entries.remove(&self.id);
            drop(removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PageLayout;
    use std::cell::Cell;

    fn event(offset: u32, layout: &PageLayout) -> ScrollEvent<'_> {
        ScrollEvent { offset, layout }
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let bus = ScrollBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let log = Rc::clone(&log);
            bus.subscribe(move |e| log.borrow_mut().push(("first", e.offset)))
        };
        let second = {
            let log = Rc::clone(&log);
            bus.subscribe(move |e| log.borrow_mut().push(("second", e.offset)))
        };

        let layout = PageLayout::new();
        bus.emit(&event(7, &layout));

        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
        drop((first, second));
    }

    #[test]
    fn test_drop_detaches() {
        let bus = ScrollBus::new();
        let calls = Rc::new(Cell::new(0));
        let subscription = {
            let calls = Rc::clone(&calls);
            bus.subscribe(move |_| calls.set(calls.get() + 1))
        };
        let layout = PageLayout::new();

        bus.emit(&event(1, &layout));
        assert!(subscription.is_active());
        drop(subscription);
        bus.emit(&event(2, &layout));

        assert_eq!(calls.get(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_listener_detached_mid_emit_is_skipped() {
        let bus = ScrollBus::new();
        let victim_calls = Rc::new(Cell::new(0));
        let victim_slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let _killer = {
            let slot = Rc::clone(&victim_slot);
            bus.subscribe(move |_| {
                slot.borrow_mut().take();
            })
        };
        let victim = {
            let calls = Rc::clone(&victim_calls);
            bus.subscribe(move |_| calls.set(calls.get() + 1))
        };
        *victim_slot.borrow_mut() = Some(victim);

        let layout = PageLayout::new();
        bus.emit(&event(3, &layout));

        assert_eq!(victim_calls.get(), 0);
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn test_subscription_outliving_bus() {
        let bus = ScrollBus::new();
        let subscription = bus.subscribe(|_| {});
        drop(bus);
        assert!(!subscription.is_active());
        drop(subscription);
    }
}
