//! Smooth scrolling towards a target offset

use std::time::Duration;

use crate::counter::progress;

pub const DEFAULT_SMOOTH_DURATION: Duration = Duration::from_millis(300);

/// Quadratic ease-in-out on `[0, 1]`
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0f64).mul_add(t, 2.0).powi(2) / 2.0
    }
}

/// An in-flight scroll animation, sampled once per frame by the host
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothScroll {
    from: u32,
    to: u32,
    duration: Duration,
    started_at: Option<Duration>,
}

impl SmoothScroll {
    pub const fn new(from: u32, to: u32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            started_at: None,
        }
    }

    pub const fn target(&self) -> u32 {
        self.to
    }

    /// Offset for the frame at `now`, and whether the animation is finished.
    ///
    /// The first sample fixes the start time; the last one is exactly the
    /// target.
    pub fn sample(&mut self, now: Duration) -> (u32, bool) {
        let start = *self.started_at.get_or_insert(now);
        let t = progress(now.saturating_sub(start), self.duration);
        if t >= 1.0 {
            return (self.to, true);
        }

        let eased = ease_in_out(t);
        let from = f64::from(self.from);
        let distance = f64::from(self.to) - from;
        let offset = eased.mul_add(distance, from).round().clamp(0.0, f64::from(u32::MAX));
        (offset as u32, false)
    }
}
