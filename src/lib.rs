//! periodics — polled timing and record logging for bare-metal loops
//!
//! Two independent primitives for single-threaded main loops:
//! - [`IntervalTracker`]: named periods checked once per loop pass,
//!   correct across clock rollover (e.g. `millis()` every ~49.7 days)
//! - [`CircularBuffer`]: last-N record log with overwrite-oldest semantics
//!   and a resumable oldest-to-newest cursor
//!
//! No interrupts, no locks, no busy-waiting. Needs `alloc` only.
//!
//! # Example
//! ```
//! use periodics::{CircularBuffer, Clock, IntervalTracker, SoftClock};
//!
//! let mut tracker = IntervalTracker::new(SoftClock::new());
//! let mut log = CircularBuffer::new(3).unwrap();
//! tracker.register("sample", 100).unwrap();
//!
//! for _ in 0..500 {
//!     tracker.clock_mut().advance(1);
//!     tracker.poll();
//!     if tracker.check_by_name("sample") == Ok(true) {
//!         log.add(tracker.clock().now());
//!     }
//! }
//!
//! let kept: Vec<u32> = log.iter().map(|(_, t)| *t).collect();
//! assert_eq!(kept, [300, 400, 500]);
//! ```
//!
//! # Features
//! - `std`: host [`StdClock`] and `std::error::Error` for [`Error`]
//! - `defmt`: log registration, firing and misconfiguration via `defmt`
//!
//! Author: Moroya Sakamoto

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

#[macro_use]
mod log;

pub mod clock;
pub mod error;
pub mod period;
pub mod ring;
pub mod tracker;

pub use clock::{wrap_elapsed, Clock, SoftClock, MODULUS_U32};
#[cfg(feature = "std")]
pub use clock::{Resolution, StdClock};
pub use error::Error;
pub use period::{Period, NAME_LEN};
pub use ring::CircularBuffer;
pub use tracker::IntervalTracker;
