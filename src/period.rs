//! Period — one named, recurring interval
//!
//! The `pending` flag is edge-triggered: only the tracker's poll sets it and
//! only a check clears it, so fields are private behind read accessors.
//!
//! Author: Moroya Sakamoto

use alloc::string::String;
use core::fmt;

/// Maximum period name length in bytes; longer names are truncated
pub const NAME_LEN: usize = 15;

/// Cut `name` to at most [`NAME_LEN`] bytes without splitting a character
pub fn truncate_name(name: &str) -> &str {
    if name.len() <= NAME_LEN {
        return name;
    }
    let mut end = NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Named interval tracked by [`IntervalTracker`](crate::IntervalTracker)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// Name, already truncated
    name: String,
    /// Interval in clock ticks (> 0)
    interval: u32,
    /// Tick of the latest interval boundary seen
    last_fire: u32,
    /// Elapsed since the consumer last checked
    pending: bool,
}

impl Period {
    pub(crate) fn new(name: &str, interval: u32, now: u32) -> Self {
        Self {
            name: String::from(truncate_name(name)),
            interval,
            last_fire: now,
            pending: false,
        }
    }

    /// Period name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interval in ticks
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Reference tick elapsed time is measured from
    pub fn last_fire(&self) -> u32 {
        self.last_fire
    }

    /// Has the period elapsed since the last check?
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub(crate) fn set_interval(&mut self, interval: u32) {
        self.interval = interval;
    }

    pub(crate) fn fire(&mut self, last_fire: u32) {
        self.last_fire = last_fire;
        self.pending = true;
    }

    pub(crate) fn restart(&mut self, now: u32, pending: bool) {
        self.last_fire = now;
        self.pending = pending;
    }

    /// Read and clear the pending flag
    pub(crate) fn take_pending(&mut self) -> bool {
        core::mem::replace(&mut self.pending, false)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - interval={} last_fire={} pending={}",
            self.name, self.interval, self.last_fire, self.pending
        )
    }
}
