//! Frame scheduling with cancellable requests
//!
//! A [`FrameClock`] collects one-shot frame callbacks and runs them when the
//! host delivers a frame through [`FrameClock::tick`]. Each request returns a
//! [`FrameHandle`]; dropping the handle cancels the request, so a component
//! that owns its handle can never be called back after it is gone.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

type FrameCallback = Box<dyn FnOnce(Duration)>;

#[derive(Default)]
struct FrameQueue {
    next_id: u64,
    pending: BTreeMap<u64, FrameCallback>,
    frames_delivered: u64,
}

/// Source of animation frames for a single UI thread
#[derive(Clone, Default)]
pub struct FrameClock {
    queue: Rc<RefCell<FrameQueue>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for the next frame.
    ///
    /// The callback receives the frame timestamp. It runs at most once, and
    /// never if the returned handle is dropped or cancelled first.
    #[must_use = "dropping the handle cancels the frame request"]
    pub fn request_frame<F>(&self, callback: F) -> FrameHandle
    where
        F: FnOnce(Duration) + 'static,
    {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        queue.pending.insert(id, Box::new(callback));

        FrameHandle {
            id,
            queue: Rc::downgrade(&self.queue),
        }
    }

    /// Deliver a frame at `now`; returns how many callbacks ran.
    ///
    /// Only requests pending when the tick starts are run, in request order.
    /// Requests made by those callbacks wait for the next tick, and a request
    /// cancelled by an earlier callback in the same tick is skipped.
    pub fn tick(&self, now: Duration) -> usize {
        let due: Vec<u64> = {
            let mut queue = self.queue.borrow_mut();
            queue.frames_delivered += 1;
            queue.pending.keys().copied().collect()
        };

        let mut ran = 0;
        for id in due {
            let callback = self.queue.borrow_mut().pending.remove(&id);
            if let Some(callback) = callback {
                callback(now);
                ran += 1;
            }
        }
        ran
    }

    /// Outstanding requests
    pub fn pending(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    /// Ticks delivered so far
    pub fn frames_delivered(&self) -> u64 {
        self.queue.borrow().frames_delivered
    }

    /// Weak reference for use inside frame callbacks
    pub fn downgrade(&self) -> WeakFrameClock {
        WeakFrameClock {
            queue: Rc::downgrade(&self.queue),
        }
    }
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameClock")
            .field("pending", &self.pending())
            .field("frames_delivered", &self.frames_delivered())
            .finish()
    }
}

/// Non-owning clock reference; callbacks capture this so a pending request
/// does not keep its clock alive
#[derive(Clone, Debug)]
pub struct WeakFrameClock {
    queue: Weak<RefCell<FrameQueue>>,
}

impl WeakFrameClock {
    pub fn upgrade(&self) -> Option<FrameClock> {
        self.queue.upgrade().map(|queue| FrameClock { queue })
    }
}

/// Cancellation token for one frame request
#[derive(Debug)]
pub struct FrameHandle {
    id: u64,
    queue: Weak<RefCell<FrameQueue>>,
}

impl FrameHandle {
    /// Cancel the request; a no-op if it already ran
    pub fn cancel(self) {
        drop(self);
    }

    /// Whether the callback is still waiting for a frame
    pub fn is_pending(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|queue| queue.borrow().pending.contains_key(&self.id))
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            // the callback may own other handles, so drop it outside the borrow
            let removed = queue.borrow_mut().pending.remove(&self.id);
            drop(removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_request_runs_once_with_timestamp() {
        let clock = FrameClock::new();
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        let handle = clock.request_frame(move |now| sink.set(Some(now)));

        assert!(handle.is_pending());
        assert_eq!(clock.tick(ms(16)), 1);
        assert_eq!(seen.get(), Some(ms(16)));
        assert!(!handle.is_pending());
        assert_eq!(clock.tick(ms(32)), 0);
    }

    #[test]
    fn test_dropped_handle_cancels() {
        let clock = FrameClock::new();
        let fired = Rc::new(Cell::new(false));
        let sink = Rc::clone(&fired);
        let handle = clock.request_frame(move |_| sink.set(true));

        drop(handle);
        assert_eq!(clock.pending(), 0);
        clock.tick(ms(16));
        assert!(!fired.get());
    }

    #[test]
    fn test_requests_made_during_tick_wait_for_next_frame() {
        let clock = FrameClock::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let inner_handle: Rc<RefCell<Option<FrameHandle>>> = Rc::new(RefCell::new(None));

        let _outer = {
            let order = Rc::clone(&order);
            let slot = Rc::clone(&inner_handle);
            let weak = clock.downgrade();
            clock.request_frame(move |now| {
                order.borrow_mut().push(("outer", now));
                if let Some(clock) = weak.upgrade() {
                    let order = Rc::clone(&order);
                    *slot.borrow_mut() =
                        Some(clock.request_frame(move |now| order.borrow_mut().push(("inner", now))));
                }
            })
        };

        assert_eq!(clock.tick(ms(1)), 1);
        assert_eq!(clock.pending(), 1);
        assert_eq!(clock.tick(ms(2)), 1);
        assert_eq!(*order.borrow(), vec![("outer", ms(1)), ("inner", ms(2))]);
    }

    #[test]
    fn test_cancel_during_tick_skips_later_request() {
        let clock = FrameClock::new();
        let victim_ran = Rc::new(Cell::new(false));
        let slot: Rc<RefCell<Option<FrameHandle>>> = Rc::new(RefCell::new(None));

        let _killer = {
            let slot = Rc::clone(&slot);
            clock.request_frame(move |_| {
                slot.borrow_mut().take();
            })
        };
        let victim = {
            let ran = Rc::clone(&victim_ran);
            clock.request_frame(move |_| ran.set(true))
        };
        *slot.borrow_mut() = Some(victim);

        assert_eq!(clock.tick(ms(16)), 1);
        assert!(!victim_ran.get());
    }

    #[test]
    fn test_handle_outliving_clock() {
        let clock = FrameClock::new();
        let handle = clock.request_frame(|_| {});
        let weak = clock.downgrade();
        drop(clock);

        assert!(weak.upgrade().is_none());
        assert!(!handle.is_pending());
        handle.cancel();
    }

    #[test]
    fn test_frames_delivered_counts_ticks() {
        let clock = FrameClock::new();
        clock.tick(ms(0));
        clock.tick(ms(16));
        assert_eq!(clock.frames_delivered(), 2);
    }
}
