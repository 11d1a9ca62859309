//! Clock — wrap-aware monotonic tick source
//!
//! The interval tracker only ever asks "what tick is it now". On real
//! hardware that is `millis()` or a free-running timer register, both of
//! which roll over. All elapsed-time math goes through [`wrap_elapsed`].
//!
//! Author: Moroya Sakamoto

/// Modulus of a free-running 32-bit millisecond counter (~49.7 days)
pub const MODULUS_U32: u64 = 1 << 32;

/// Monotonic tick source that wraps at [`Clock::MODULUS`]
pub trait Clock {
    /// Tick count at which the counter rolls back to zero
    const MODULUS: u64 = MODULUS_U32;

    /// Current tick count, always `< MODULUS`
    fn now(&self) -> u32;
}

/// Any `Fn() -> u32` is a clock, e.g. a HAL `millis` function.
impl<F: Fn() -> u32> Clock for F {
    fn now(&self) -> u32 {
        self()
    }
}

/// Ticks elapsed from `prev` to `now` on a counter wrapping at `modulus`.
///
/// `((M + now) - prev) mod M`: a `now` that has wrapped past `prev` still
/// yields the small positive difference.
#[inline]
pub fn wrap_elapsed(now: u32, prev: u32, modulus: u64) -> u32 {
    (((modulus + u64::from(now)) - u64::from(prev)) % modulus) as u32
}

/// `tick + delta` reduced modulo `modulus`
#[inline]
pub fn wrap_add(tick: u32, delta: u64, modulus: u64) -> u32 {
    ((u64::from(tick) + delta) % modulus) as u32
}

/// Software clock
///
/// Advanced by hand. Used for tests, simulation, and targets where the
/// application counts ticks itself (e.g. from a SysTick handler).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftClock {
    /// Current tick count
    ticks: u32,
    /// Number of rollovers seen
    overflows: u32,
}

impl SoftClock {
    /// Create a clock at tick 0
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            overflows: 0,
        }
    }

    /// Create a clock at an arbitrary tick, e.g. just before rollover
    pub const fn starting_at(ticks: u32) -> Self {
        Self {
            ticks,
            overflows: 0,
        }
    }

    /// Advance time by `ticks`
    pub fn advance(&mut self, ticks: u32) {
        let new = self.ticks.wrapping_add(ticks);
        if new < self.ticks {
            self.overflows = self.overflows.wrapping_add(1);
        }
        self.ticks = new;
    }

    /// Jump to an absolute tick
    pub fn set(&mut self, ticks: u32) {
        self.ticks = ticks;
    }

    /// Number of overflows
    pub fn overflows(&self) -> u32 {
        self.overflows
    }
}

impl Clock for SoftClock {
    fn now(&self) -> u32 {
        self.ticks
    }
}

/// Tick resolution of a [`StdClock`]
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// One tick per millisecond (Arduino `millis()` semantics)
    Millis,
    /// One tick per second (`time(NULL)` semantics)
    Seconds,
}

/// Host clock measuring time since construction
///
/// Truncated to 32 bits so it wraps exactly like a microcontroller counter.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
    resolution: Resolution,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Start a clock at tick 0
    pub fn new(resolution: Resolution) -> Self {
        Self {
            origin: std::time::Instant::now(),
            resolution,
        }
    }

    /// Configured resolution
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now(&self) -> u32 {
        let elapsed = self.origin.elapsed();
        match self.resolution {
            Resolution::Millis => elapsed.as_millis() as u32,
            Resolution::Seconds => elapsed.as_secs() as u32,
        }
    }
}
