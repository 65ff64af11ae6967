#![forbid(unsafe_code)]

//! Trailing-edge throttle for raw size notifications.
//!
//! # State machine
//!
//! The gate holds `{interval, last_fire, pending, deadline}`:
//!
//! | Event | Idle (`pending = None`) | Open window (`pending = Some`) |
//! |-------|-------------------------|--------------------------------|
//! | `offer(v)` | store `v`, `deadline = max(now, last_fire) + interval` | replace `pending` with `v` |
//! | `tick(now)` with `now >= deadline` | nothing | emit `pending`, go idle |
//! | `reconfigure(i)` | set interval | drop `pending`, go idle |
//!
//! The first notification opens a window, so the first emission trails it by
//! one interval. Every notification inside a window is coalesced into the last
//! one, which is emitted exactly once. A window never opens before the last
//! emission, so emissions are at least one interval apart.
//!
//! A deadline that `Instant` cannot represent (e.g. `Duration::MAX`) leaves the
//! window open forever: the value is held, never emitted, until `cancel` or
//! `reconfigure`.
//!
//! Time is passed in explicitly through the `*_at` methods so the machine is
//! deterministic under test; the plain methods use [`Instant::now`].

use std::time::{Duration, Instant};

/// What happened to an offered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleAction {
    /// A new window opened; the value fires at `deadline` unless replaced.
    Scheduled { deadline: Instant },
    /// A window was already open; the previous pending value was replaced.
    Coalesced,
    /// A new window opened but never closes; the value is held.
    Held,
}

/// Time-windowed coalescing gate.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    last_fire: Option<Instant>,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Throttle<T> {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
            pending: None,
            deadline: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the open window closes, if one is open.
    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time of the most recent emission. The next window starts no earlier.
    #[inline]
    #[must_use]
    pub fn last_fire(&self) -> Option<Instant> {
        self.last_fire
    }

    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn offer(&mut self, value: T) -> ThrottleAction {
        self.offer_at(value, Instant::now())
    }

    /// Offer a value at a specific time (for deterministic testing).
    pub fn offer_at(&mut self, value: T, now: Instant) -> ThrottleAction {
        if self.pending.replace(value).is_some() {
            return ThrottleAction::Coalesced;
        }
        let start = self.last_fire.map_or(now, |last| last.max(now));
        self.deadline = start.checked_add(self.interval);
        match self.deadline {
            Some(deadline) => ThrottleAction::Scheduled { deadline },
            None => ThrottleAction::Held,
        }
    }

    pub fn tick(&mut self) -> Option<T> {
        self.tick_at(Instant::now())
    }

    /// Emit the pending value if its window has closed by `now`.
    pub fn tick_at(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.last_fire = Some(now);
        self.pending.take()
    }

    /// Time left until the pending value fires; zero if already due. `None`
    /// when idle or when the window never closes.
    #[must_use]
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        let deadline = self.deadline?;
        Some(deadline.saturating_duration_since(now))
    }

    /// Drop the pending value without emitting it.
    pub fn cancel(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    /// Switch to a new interval. Resets the machine; a pending value from the
    /// old interval is dropped and returned.
    pub fn reconfigure(&mut self, interval: Duration) -> Option<T> {
        self.interval = interval;
        self.last_fire = None;
        self.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_millis(100);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_offer_opens_window() {
        let mut gate = Throttle::new(WAIT);
        let now = Instant::now();

        assert_eq!(
            gate.offer_at(1, now),
            ThrottleAction::Scheduled { deadline: now + WAIT }
        );
        assert!(gate.is_pending());
        assert_eq!(gate.tick_at(now + ms(50)), None);
        assert_eq!(gate.tick_at(now + ms(100)), Some(1));
        assert!(!gate.is_pending());
        assert_eq!(gate.last_fire(), Some(now + ms(100)));
    }

    #[test]
    fn burst_fires_once_with_latest() {
        let mut gate = Throttle::new(WAIT);
        let now = Instant::now();

        gate.offer_at(1, now);
        assert_eq!(gate.offer_at(2, now + ms(10)), ThrottleAction::Coalesced);
        assert_eq!(gate.offer_at(3, now + ms(90)), ThrottleAction::Coalesced);

        assert_eq!(gate.tick_at(now + ms(120)), Some(3));
        assert_eq!(gate.tick_at(now + ms(500)), None);
    }

    #[test]
    fn coalescing_does_not_extend_deadline() {
        let mut gate = Throttle::new(WAIT);
        let now = Instant::now();

        gate.offer_at(1, now);
        gate.offer_at(2, now + ms(99));
        assert_eq!(gate.deadline(), Some(now + WAIT));
        assert_eq!(gate.tick_at(now + ms(100)), Some(2));
    }

    #[test]
    fn windows_do_not_overlap() {
        let mut gate = Throttle::new(WAIT);
        let now = Instant::now();

        gate.offer_at(1, now);
        assert_eq!(gate.tick_at(now + ms(100)), Some(1));

        gate.offer_at(2, now + ms(101));
        assert_eq!(gate.tick_at(now + ms(150)), None);
        assert_eq!(gate.tick_at(now + ms(201)), Some(2));
    }

    #[test]
    fn window_starts_no_earlier_than_last_fire() {
        let mut gate = Throttle::new(WAIT);
        let now = Instant::now();

        gate.offer_at(1, now);
        assert_eq!(gate.tick_at(now + ms(300)), Some(1));

        // Offered with a clock reading older than the last emission.
        assert_eq!(
            gate.offer_at(2, now + ms(150)),
            ThrottleAction::Scheduled { deadline: now + ms(400) }
        );
        assert_eq!(gate.tick_at(now + ms(399)), None);
        assert_eq!(gate.tick_at(now + ms(400)), Some(2));
    }

    #[test]
    fn unrepresentable_deadline_holds_value() {
        let mut gate = Throttle::new(Duration::MAX);
        let now = Instant::now();

        assert_eq!(gate.offer_at(1, now), ThrottleAction::Held);
        assert_eq!(gate.offer_at(2, now + ms(10)), ThrottleAction::Coalesced);
        assert!(gate.is_pending());
        assert_eq!(gate.deadline(), None);
        assert_eq!(gate.time_until_fire(now), None);
        assert_eq!(gate.tick_at(now + Duration::from_secs(86_400)), None);

        assert_eq!(gate.reconfigure(WAIT), Some(2));
        assert_eq!(
            gate.offer_at(3, now),
            ThrottleAction::Scheduled { deadline: now + WAIT }
        );
    }

    #[test]
    fn idle_tick_is_none() {
        let mut gate: Throttle<u8> = Throttle::new(WAIT);
        assert_eq!(gate.tick_at(Instant::now()), None);
        assert_eq!(gate.time_until_fire(Instant::now()), None);
    }

    #[test]
    fn time_until_fire_counts_down() {
        let mut gate = Throttle::new(WAIT);
        let now = Instant::now();
        gate.offer_at((), now);

        assert_eq!(gate.time_until_fire(now + ms(30)), Some(ms(70)));
        assert_eq!(gate.time_until_fire(now + ms(300)), Some(Duration::ZERO));
    }

    #[test]
    fn reconfigure_drops_pending_and_applies_immediately() {
        let mut gate = Throttle::new(WAIT);
        let now = Instant::now();
        gate.offer_at(1, now);

        assert_eq!(gate.reconfigure(ms(20)), Some(1));
        assert_eq!(gate.tick_at(now + ms(200)), None);

        gate.offer_at(2, now + ms(200));
        assert_eq!(gate.tick_at(now + ms(220)), Some(2));
        assert_eq!(gate.interval(), ms(20));
    }

    #[test]
    fn cancel_discards_pending() {
        let mut gate = Throttle::new(WAIT);
        let now = Instant::now();
        gate.offer_at(1, now);

        assert_eq!(gate.cancel(), Some(1));
        assert_eq!(gate.tick_at(now + ms(1000)), None);
    }

    #[test]
    fn zero_interval_fires_on_next_tick() {
        let mut gate = Throttle::new(Duration::ZERO);
        let now = Instant::now();
        gate.offer_at(9, now);
        assert_eq!(gate.tick_at(now), Some(9));
    }
}
