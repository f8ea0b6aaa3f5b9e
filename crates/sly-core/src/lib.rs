#![forbid(unsafe_code)]

//! Core: monotonic time, liveness deadlines, lengths, and logging setup.
//!
//! # Role in sly
//! `sly-core` holds the small value types shared by the resize engine
//! (`sly-layout`) and the column registry (`sly-columns`). Nothing here
//! touches a layout host directly.
//!
//! # Primary responsibilities
//! - **Clock**: [`MonotonicClock`] with a wall-clock and a host-driven
//!   implementation, so time-based behavior is testable without sleeping.
//! - **Deadline**: a re-armable deadline that reports expiry exactly once.
//! - **Length**: pixel lengths parsed from and rendered to CSS-style text.
//! - **Logging**: optional `tracing-subscriber` installation for hosts.

pub mod clock;
pub mod deadline;
pub mod length;
pub mod logging;

pub use clock::{ManualClock, MonotonicClock, SystemClock};
pub use deadline::{Deadline, DeadlinePoll};
pub use length::{Length, LengthParseError};
