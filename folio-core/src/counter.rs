//! Animated numeric counter
//!
//! Counts from 0 up to a target over a fixed duration, one frame at a time.
//! The start time is the timestamp of the first frame after (re)activation;
//! each frame sets the value to `floor(progress * target)` with
//! `progress = min(elapsed / duration, 1)`. The final frame lands exactly on
//! the target and no further frame is requested.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::debug;

use crate::frame::{FrameClock, FrameHandle, WeakFrameClock};

/// Animation length used when none is given
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

/// Fraction of the animation completed after `elapsed`, clamped to `[0, 1]`.
///
/// A zero duration is complete immediately.
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

/// Value shown at a given progress; exactly `target` once progress reaches 1
pub fn displayed_value(target: u64, progress: f64) -> u64 {
    if progress >= 1.0 {
        target
    } else if progress <= 0.0 || progress.is_nan() {
        0
    } else {
        ((progress * target as f64).floor() as u64).min(target)
    }
}

/// What to count to, how fast, and what to print after the number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSpec {
    pub target: u64,
    pub duration: Duration,
    pub suffix: String,
}

impl CounterSpec {
    pub const fn new(target: u64) -> Self {
        Self {
            target,
            duration: DEFAULT_DURATION,
            suffix: String::new(),
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

/// Lifecycle of one counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterPhase {
    /// Frame requested, start time not yet recorded
    Waiting,
    Running,
    Complete,
}

#[derive(Debug)]
struct CounterState {
    spec: CounterSpec,
    value: u64,
    started_at: Option<Duration>,
    phase: CounterPhase,
    frame: Option<FrameHandle>,
}

impl CounterState {
    /// Apply one frame; returns whether another frame is needed
    fn advance(&mut self, now: Duration) -> bool {
        let start = *self.started_at.get_or_insert(now);
        let elapsed = now.saturating_sub(start);
        let progress = progress(elapsed, self.spec.duration);

        self.value = self.value.max(displayed_value(self.spec.target, progress));

        if progress >= 1.0 {
            self.value = self.spec.target;
            self.phase = CounterPhase::Complete;
            debug!(target_value = self.spec.target, ?elapsed, "counter complete");
            false
        } else {
            self.phase = CounterPhase::Running;
            true
        }
    }
}

/// A counter animating on a [`FrameClock`].
///
/// The counter owns its pending frame request; dropping the counter (or
/// calling [`AnimatedCounter::dispose`]) cancels it, and the frame callback
/// only holds a weak reference to the counter state.
#[derive(Debug)]
pub struct AnimatedCounter {
    state: Rc<RefCell<CounterState>>,
    clock: WeakFrameClock,
}

impl AnimatedCounter {
    /// Create and activate a counter; the first frame is requested immediately
    pub fn new(clock: &FrameClock, spec: CounterSpec) -> Self {
        let counter = Self {
            state: Rc::new(RefCell::new(CounterState {
                spec,
                value: 0,
                started_at: None,
                phase: CounterPhase::Waiting,
                frame: None,
            })),
            clock: clock.downgrade(),
        };
        schedule(&counter.state, &counter.clock);
        counter
    }

    pub fn value(&self) -> u64 {
        self.state.borrow().value
    }

    pub fn phase(&self) -> CounterPhase {
        self.state.borrow().phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == CounterPhase::Complete
    }

    pub fn spec(&self) -> CounterSpec {
        self.state.borrow().spec.clone()
    }

    /// Displayed value followed by the suffix
    pub fn text(&self) -> String {
        let state = self.state.borrow();
        format!("{}{}", state.value, state.spec.suffix)
    }

    /// Start over from 0 with a fresh start time
    pub fn restart(&mut self) {
        let previous = {
            let mut state = self.state.borrow_mut();
            state.value = 0;
            state.started_at = None;
            state.phase = CounterPhase::Waiting;
            state.frame.take()
        };
        drop(previous);
        schedule(&self.state, &self.clock);
    }

    /// Change target and duration; any change restarts the animation
    pub fn retarget(&mut self, target: u64, duration: Duration) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = state.spec.target != target || state.spec.duration != duration;
            state.spec.target = target;
            state.spec.duration = duration;
            changed
        };
        if changed {
            self.restart();
        }
    }

    /// Suffix is display-only and never restarts the animation
    pub fn set_suffix(&mut self, suffix: impl Into<String>) {
        self.state.borrow_mut().spec.suffix = suffix.into();
    }

    /// Tear down the counter, cancelling any pending frame
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for AnimatedCounter {
    fn drop(&mut self) {
        let pending = self
            .state
            .try_borrow_mut()
            .ok()
            .and_then(|mut state| state.frame.take());
        drop(pending);
    }
}

fn schedule(state: &Rc<RefCell<CounterState>>, clock: &WeakFrameClock) {
    let Some(frame_clock) = clock.upgrade() else {
        return;
    };
    let weak_state = Rc::downgrade(state);
    let weak_clock = clock.clone();
    let handle = frame_clock.request_frame(move |now| on_frame(&weak_state, &weak_clock, now));
    state.borrow_mut().frame = Some(handle);
}

fn on_frame(state: &Weak<RefCell<CounterState>>, clock: &WeakFrameClock, now: Duration) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let needs_frame = {
        let mut current = state.borrow_mut();
        // the request that brought us here has been consumed
        current.frame = None;
        current.advance(now)
    };
    if needs_frame {
        schedule(&state, clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_half_way_with_suffix() {
        let clock = FrameClock::new();
        let counter = AnimatedCounter::new(
            &clock,
            CounterSpec::new(100).with_duration(ms(1000)).with_suffix("%"),
        );

        clock.tick(ms(10_000));
        assert_eq!(counter.value(), 0);
        clock.tick(ms(10_500));
        assert_eq!(counter.value(), 50);
        assert_eq!(counter.text(), "50%");
    }

    #[test]
    fn test_completes_exactly_and_stops_requesting() {
        let clock = FrameClock::new();
        let counter = AnimatedCounter::new(&clock, CounterSpec::new(15).with_suffix("+"));

        clock.tick(ms(0));
        clock.tick(ms(1999));
        assert!(counter.value() < 15);
        assert_eq!(clock.pending(), 1);

        clock.tick(ms(2000));
        assert_eq!(counter.value(), 15);
        assert!(counter.is_complete());
        assert_eq!(counter.text(), "15+");
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_zero_duration_completes_on_first_frame() {
        let clock = FrameClock::new();
        let counter = AnimatedCounter::new(&clock, CounterSpec::new(12).with_duration(Duration::ZERO));

        assert_eq!(counter.phase(), CounterPhase::Waiting);
        clock.tick(ms(5));
        assert_eq!(counter.value(), 12);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_dispose_cancels_pending_frame() {
        let clock = FrameClock::new();
        let counter = AnimatedCounter::new(&clock, CounterSpec::new(100).with_duration(ms(1000)));
        clock.tick(ms(0));
        clock.tick(ms(300));
        let state = Rc::downgrade(&counter.state);

        counter.dispose();

        assert_eq!(clock.pending(), 0);
        assert!(state.upgrade().is_none());
        assert_eq!(clock.tick(ms(600)), 0);
    }

    #[test]
    fn test_restart_counts_from_zero_relative_to_new_start() {
        let clock = FrameClock::new();
        let mut counter = AnimatedCounter::new(&clock, CounterSpec::new(100).with_duration(ms(1000)));
        clock.tick(ms(0));
        clock.tick(ms(800));
        assert_eq!(counter.value(), 80);

        counter.retarget(200, ms(1000));
        assert_eq!(counter.value(), 0);
        assert_eq!(clock.pending(), 1);

        clock.tick(ms(900));
        assert_eq!(counter.value(), 0);
        clock.tick(ms(1150));
        assert_eq!(counter.value(), 50);
    }

    #[test]
    fn test_retarget_same_values_does_not_restart() {
        let clock = FrameClock::new();
        let mut counter = AnimatedCounter::new(&clock, CounterSpec::new(10).with_duration(ms(100)));
        clock.tick(ms(0));
        clock.tick(ms(50));

        counter.retarget(10, ms(100));
        assert_eq!(counter.value(), 5);
        counter.set_suffix("+");
        assert_eq!(counter.text(), "5+");
    }

    #[test]
    fn test_counter_without_clock_stays_idle() {
        let clock = FrameClock::new();
        let weak_only = {
            let temporary = FrameClock::new();
            AnimatedCounter::new(&temporary, CounterSpec::new(3))
        };
        assert_eq!(weak_only.value(), 0);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_pure_helpers() {
        assert!((progress(ms(250), ms(1000)) - 0.25).abs() < f64::EPSILON);
        assert!((progress(ms(5000), ms(1000)) - 1.0).abs() < f64::EPSILON);
        assert!((progress(ms(0), Duration::ZERO) - 1.0).abs() < f64::EPSILON);
        assert_eq!(displayed_value(100, 0.999), 99);
        assert_eq!(displayed_value(u64::MAX, 1.0), u64::MAX);
        assert_eq!(displayed_value(7, 0.0), 0);
    }
}
