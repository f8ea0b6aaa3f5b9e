#![forbid(unsafe_code)]

//! Re-armable liveness deadline.
//!
//! A [`Deadline`] is a cancellation signal with a time limit: it is armed when
//! an interaction starts, pushed forward by every sign of life, and polled by
//! the host's timer. Expiry is reported exactly once per arming; clearing an
//! already-cleared deadline is a no-op.
//!
//! ```
//! use core::time::Duration;
//! use sly_core::{Deadline, DeadlinePoll};
//!
//! let mut deadline = Deadline::new(Duration::from_secs(5));
//! deadline.arm(Duration::ZERO);
//! assert!(matches!(deadline.poll(Duration::from_secs(4)), DeadlinePoll::Pending { .. }));
//! assert_eq!(deadline.poll(Duration::from_secs(5)), DeadlinePoll::Expired);
//! assert_eq!(deadline.poll(Duration::from_secs(6)), DeadlinePoll::Disarmed);
//! ```

use core::time::Duration;

/// Result of polling a [`Deadline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlinePoll {
    /// Not armed (never armed, cleared, or already expired).
    Disarmed,
    /// Armed and not yet reached.
    Pending { remaining: Duration },
    /// Reached on this poll. The deadline is now disarmed.
    Expired,
}

/// Sliding-window deadline over monotonic time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    timeout: Duration,
    expires_at: Option<Duration>,
}

impl Deadline {
    /// Create a disarmed deadline with the given window.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            expires_at: None,
        }
    }

    /// Configured window length.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute expiry time, if armed.
    #[must_use]
    pub const fn expires_at(&self) -> Option<Duration> {
        self.expires_at
    }

    /// Whether the deadline is currently armed.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.expires_at.is_some()
    }

    /// Arm (or re-arm) the deadline so it expires `timeout` after `now`.
    pub fn arm(&mut self, now: Duration) {
        self.expires_at = Some(now.saturating_add(self.timeout));
    }

    /// Disarm. Returns whether the deadline was armed.
    pub fn clear(&mut self) -> bool {
        self.expires_at.take().is_some()
    }

    /// Check the deadline against `now`, disarming it on expiry.
    pub fn poll(&mut self, now: Duration) -> DeadlinePoll {
        match self.expires_at {
            None => DeadlinePoll::Disarmed,
            Some(at) if now >= at => {
                self.expires_at = None;
                DeadlinePoll::Expired
            }
            Some(at) => DeadlinePoll::Pending {
                remaining: at - now,
            },
        }
    }
}
