//! Error type shared by the tracker and the buffer
//!
//! Every failure is local and recoverable; nothing here panics.
//!
//! Author: Moroya Sakamoto

use core::fmt;

/// Errors returned by [`IntervalTracker`](crate::IntervalTracker) and
/// [`CircularBuffer`](crate::CircularBuffer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No period with that name, or index out of `1..=len`
    NotFound,
    /// Interval is zero or does not fit below the clock modulus
    InvalidInterval,
    /// Buffer capacity below 2
    InvalidCapacity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => f.write_str("period not found"),
            Error::InvalidInterval => f.write_str("interval must be positive and below the clock modulus"),
            Error::InvalidCapacity => f.write_str("buffer capacity must be at least 2"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
