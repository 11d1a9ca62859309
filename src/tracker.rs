//! Interval tracker — named periods for polled main loops
//!
//! Call [`IntervalTracker::poll`] once per loop iteration, then
//! [`check`](IntervalTracker::check_by_name) each period you care about.
//! A check is a consuming read: a firing not acted on is lost.
//!
//! Reference ticks advance in whole intervals from the previous boundary,
//! never from "now", so a late poll does not shift the phase.
//!
//! Author: Moroya Sakamoto

use alloc::vec::Vec;
use core::fmt;

use crate::clock::{wrap_add, wrap_elapsed, Clock};
use crate::error::Error;
use crate::period::{truncate_name, Period};

/// Polled scheduler of named intervals
///
/// Indices handed out by [`register`](Self::register) are 1-based and stable:
/// periods are only ever appended.
pub struct IntervalTracker<C: Clock> {
    /// Registered periods, in registration order
    periods: Vec<Period>,
    /// Tick source
    clock: C,
}

impl<C: Clock> IntervalTracker<C> {
    /// Create an empty tracker
    pub const fn new(clock: C) -> Self {
        Self {
            periods: Vec::new(),
            clock,
        }
    }

    /// Create an empty tracker with room for `n` periods
    pub fn with_capacity(clock: C, n: usize) -> Self {
        Self {
            periods: Vec::with_capacity(n),
            clock,
        }
    }

    /// Register a period, or update the interval of an existing one
    ///
    /// Returns the 1-based index. Updating keeps the reference tick, so the
    /// new interval is measured from the last boundary.
    pub fn register(&mut self, name: &str, interval: u32) -> Result<usize, Error> {
        if interval == 0 || u64::from(interval) >= C::MODULUS {
            warn!("rejected interval {} for period {}", interval, name);
            return Err(Error::InvalidInterval);
        }

        let name = truncate_name(name);
        if let Some(idx) = self.position(name) {
            self.periods[idx].set_interval(interval);
            debug!("period {} interval updated to {}", name, interval);
            return Ok(idx + 1);
        }

        let now = self.clock.now();
        self.periods.push(Period::new(name, interval, now));
        debug!("period {} registered, interval {} at tick {}", name, interval, now);
        Ok(self.periods.len())
    }

    /// Mark every period whose interval has elapsed as pending
    ///
    /// The clock is read once, so all periods see the same "now".
    /// Returns the number of registered periods.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now();

        for period in self.periods.iter_mut() {
            let interval = u64::from(period.interval());
            let elapsed = u64::from(wrap_elapsed(now, period.last_fire(), C::MODULUS));
            if elapsed >= interval {
                // Latest boundary not after `now`
                let boundaries = elapsed / interval;
                let last_fire = wrap_add(period.last_fire(), boundaries * interval, C::MODULUS);
                period.fire(last_fire);
                trace!("period {} fired, {} boundaries crossed", period.name(), boundaries);
            }
        }

        self.periods.len()
    }

    /// Read and clear the pending flag of the named period
    pub fn check_by_name(&mut self, name: &str) -> Result<bool, Error> {
        let idx = self.position(truncate_name(name)).ok_or(Error::NotFound)?;
        Ok(self.periods[idx].take_pending())
    }

    /// Read and clear the pending flag of the period at 1-based `index`
    pub fn check_by_index(&mut self, index: usize) -> Result<bool, Error> {
        let idx = self.slot(index).ok_or(Error::NotFound)?;
        Ok(self.periods[idx].take_pending())
    }

    /// Restart every period from the current tick with the given pending flag
    ///
    /// `true` forces one synthetic firing on the next check.
    /// Returns the number of periods.
    pub fn reset_all(&mut self, pending: bool) -> usize {
        let now = self.clock.now();
        for period in self.periods.iter_mut() {
            period.restart(now, pending);
        }
        self.periods.len()
    }

    /// Restart every period from the current tick, nothing pending
    pub fn reset(&mut self) -> usize {
        self.reset_all(false)
    }

    /// Drop all periods
    pub fn clear(&mut self) {
        self.periods.clear();
    }

    /// Period at 1-based `index`
    pub fn get(&self, index: usize) -> Option<&Period> {
        self.slot(index).map(|idx| &self.periods[idx])
    }

    /// Period by name
    pub fn get_by_name(&self, name: &str) -> Option<&Period> {
        self.position(truncate_name(name)).map(|idx| &self.periods[idx])
    }

    /// All periods in registration order
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Number of registered periods
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// No periods registered?
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Tick source
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Tick source, mutably (e.g. to advance a [`SoftClock`](crate::SoftClock))
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.periods.iter().position(|p| p.name() == name)
    }

    fn slot(&self, index: usize) -> Option<usize> {
        if index >= 1 && index <= self.periods.len() {
            Some(index - 1)
        } else {
            None
        }
    }
}

impl<C: Clock> fmt::Display for IntervalTracker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "periods: {}", self.periods.len())?;
        for period in &self.periods {
            writeln!(f, "  {}", period)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SoftClock;
    use proptest::prelude::*;

    fn tracker() -> IntervalTracker<SoftClock> {
        IntervalTracker::new(SoftClock::new())
    }

    /// 16-bit hardware timer
    struct Timer16(u32);

    impl Clock for Timer16 {
        const MODULUS: u64 = 1 << 16;

        fn now(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn test_register_returns_one_based_index() {
        let mut t = tracker();
        assert_eq!(t.register("blink", 500), Ok(1));
        assert_eq!(t.register("sample", 1000), Ok(2));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_no_initial_firing() {
        let mut t = tracker();
        t.register("blink", 500).unwrap();
        assert_eq!(t.check_by_name("blink"), Ok(false));
        t.poll();
        assert_eq!(t.check_by_name("blink"), Ok(false));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut t = tracker();
        assert_eq!(t.register("bad", 0), Err(Error::InvalidInterval));
        assert!(t.is_empty());
    }

    #[test]
    fn test_interval_beyond_modulus_rejected() {
        let mut t = IntervalTracker::new(Timer16(0));
        assert_eq!(t.register("slow", 1 << 16), Err(Error::InvalidInterval));
        assert_eq!(t.register("ok", (1 << 16) - 1), Ok(1));
    }

    #[test]
    fn test_reregister_updates_interval_keeps_reference() {
        let mut t = tracker();
        t.register("blink", 500).unwrap();
        t.clock_mut().advance(300);
        assert_eq!(t.register("blink", 200), Ok(1));
        assert_eq!(t.len(), 1);

        let p = t.get(1).unwrap();
        assert_eq!(p.interval(), 200);
        assert_eq!(p.last_fire(), 0);

        t.poll();
        assert_eq!(t.check_by_name("blink"), Ok(true));
    }

    #[test]
    fn test_fires_once_per_check() {
        let mut t = tracker();
        t.register("blink", 100).unwrap();

        t.clock_mut().advance(99);
        t.poll();
        assert_eq!(t.check_by_name("blink"), Ok(false));

        t.clock_mut().advance(1);
        t.poll();
        assert_eq!(t.check_by_name("blink"), Ok(true));
        assert_eq!(t.check_by_name("blink"), Ok(false));

        // Nothing new elapsed: a second poll does not refire
        t.poll();
        assert_eq!(t.check_by_name("blink"), Ok(false));
    }

    #[test]
    fn test_late_poll_keeps_phase() {
        let mut t = tracker();
        t.register("blink", 100).unwrap();

        t.clock_mut().advance(350);
        t.poll();
        assert_eq!(t.check_by_index(1), Ok(true));
        assert_eq!(t.get(1).unwrap().last_fire(), 300);

        t.clock_mut().advance(50);
        t.poll();
        assert_eq!(t.check_by_index(1), Ok(true));
        assert_eq!(t.get(1).unwrap().last_fire(), 400);
    }

    #[test]
    fn test_pending_survives_until_checked() {
        let mut t = tracker();
        t.register("a", 10).unwrap();
        t.register("b", 1000).unwrap();

        t.clock_mut().advance(10);
        assert_eq!(t.poll(), 2);
        t.clock_mut().advance(5);
        t.poll();

        assert_eq!(t.check_by_name("b"), Ok(false));
        assert_eq!(t.check_by_name("a"), Ok(true));
    }

    #[test]
    fn test_poll_across_clock_rollover() {
        let mut t = IntervalTracker::new(SoftClock::starting_at(u32::MAX - 49));
        t.register("blink", 100).unwrap();

        t.clock_mut().advance(99);
        t.poll();
        assert_eq!(t.check_by_name("blink"), Ok(false));

        t.clock_mut().advance(1);
        assert_eq!(t.clock().now(), 50);
        t.poll();
        assert_eq!(t.check_by_name("blink"), Ok(true));
        assert_eq!(t.get(1).unwrap().last_fire(), 50);
    }

    #[test]
    fn test_small_modulus_rollover() {
        let mut t = IntervalTracker::new(Timer16(65_500));
        t.register("tick", 50).unwrap();

        t.clock_mut().0 = 14; // 65_550 mod 2^16
        t.poll();
        assert_eq!(t.check_by_name("tick"), Ok(true));
        assert_eq!(t.get(1).unwrap().last_fire(), 14);
    }

    #[test]
    fn test_not_found() {
        let mut t = tracker();
        t.register("blink", 100).unwrap();
        assert_eq!(t.check_by_name("Blink"), Err(Error::NotFound));
        assert_eq!(t.check_by_index(0), Err(Error::NotFound));
        assert_eq!(t.check_by_index(2), Err(Error::NotFound));
        assert!(t.get(0).is_none());
    }

    #[test]
    fn test_long_names_truncated_consistently() {
        let mut t = tracker();
        t.register("temperature_sensor_poll", 100).unwrap();
        assert_eq!(t.get(1).unwrap().name(), "temperature_sen");
        assert_eq!(t.register("temperature_sensor_other", 200), Ok(1));
        assert_eq!(t.check_by_name("temperature_sensor_poll"), Ok(false));
    }

    #[test]
    fn test_reset_all() {
        let mut t = tracker();
        t.register("a", 100).unwrap();
        t.register("b", 200).unwrap();

        t.clock_mut().advance(150);
        assert_eq!(t.reset_all(true), 2);
        assert_eq!(t.get(2).unwrap().last_fire(), 150);
        assert_eq!(t.check_by_name("a"), Ok(true));
        assert_eq!(t.check_by_name("b"), Ok(true));

        t.clock_mut().advance(100);
        t.reset();
        t.poll();
        assert_eq!(t.check_by_name("a"), Ok(false));
        assert_eq!(t.get_by_name("a").unwrap().last_fire(), 250);
    }

    #[test]
    fn test_clear() {
        let mut t = tracker();
        t.register("a", 100).unwrap();
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.check_by_index(1), Err(Error::NotFound));
        assert_eq!(t.register("b", 10), Ok(1));
    }

    #[test]
    fn test_closure_clock() {
        let mut t = IntervalTracker::new(|| 1_000u32);
        assert_eq!(t.register("x", 10), Ok(1));
        assert_eq!(t.get(1).unwrap().last_fire(), 1_000);
    }

    #[test]
    fn test_display_dump() {
        let mut t = tracker();
        t.register("blink", 500).unwrap();
        assert_eq!(
            t.to_string(),
            "periods: 1\n  blink - interval=500 last_fire=0 pending=false\n"
        );
    }

    proptest! {
        #[test]
        fn prop_reference_within_one_interval(
            start in any::<u32>(),
            interval in 1u32..100_000,
            delta in 0u32..10_000_000,
        ) {
            let mut t = IntervalTracker::new(SoftClock::starting_at(start));
            t.register("p", interval).unwrap();
            t.clock_mut().advance(delta);
            t.poll();

            let now = t.clock().now();
            let last_fire = t.get(1).unwrap().last_fire();
            prop_assert!(wrap_elapsed(now, last_fire, crate::clock::MODULUS_U32) < interval);
            prop_assert_eq!(t.check_by_index(1), Ok(delta >= interval));
            prop_assert_eq!(t.check_by_index(1), Ok(false));
        }
    }
}
