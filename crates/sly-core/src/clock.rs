#![forbid(unsafe_code)]

//! Monotonic clock abstraction.
//!
//! Nothing in the sly crates calls `Instant::now()` directly: deadlines are
//! computed from whatever [`MonotonicClock`] the host injects. Native hosts use
//! [`SystemClock`]; tests and replaying hosts drive a [`ManualClock`].

use core::time::Duration;
use std::cell::Cell;
use std::rc::Rc;

use web_time::Instant;

/// Monotonic time source.
pub trait MonotonicClock {
    /// Returns elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for &C {
    fn now_mono(&self) -> Duration {
        (**self).now_mono()
    }
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for Rc<C> {
    fn now_mono(&self) -> Duration {
        (**self).now_mono()
    }
}

/// Wall-clock monotonic time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Create a clock whose epoch is "now".
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Host-driven monotonic clock.
///
/// Clones share the same time cell, so a test can keep one handle and
/// advance it while a controller owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set current monotonic time. Moving backwards is ignored.
    pub fn set(&self, now: Duration) {
        if now > self.now.get() {
            self.now.set(now);
        }
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get().saturating_add(dt));
    }
}

impl MonotonicClock for ManualClock {
    fn now_mono(&self) -> Duration {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_at_zero() {
        assert_eq!(ManualClock::new().now_mono(), Duration::ZERO);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let observer = clock.clone();
        clock.advance(Duration::from_millis(1500));
        assert_eq!(observer.now_mono(), Duration::from_millis(1500));
    }

    #[test]
    fn manual_clock_never_moves_backwards() {
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(3));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now_mono(), Duration::from_secs(3));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_mono();
        let b = clock.now_mono();
        assert!(b >= a);
    }

    #[test]
    fn borrowed_and_shared_clocks_delegate() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_millis(7));
        let shared = Rc::new(clock.clone());
        assert_eq!((&clock).now_mono(), Duration::from_millis(7));
        assert_eq!(shared.now_mono(), Duration::from_millis(7));
    }
}
