use std::time::{Duration, Instant};

const ONE_SECOND: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// countdown not armed, tick dropped
    Idle,
    /// armed, but no whole second has passed
    Pending,
    /// one or more seconds elapsed, this many remain
    Second(u64),
    /// reached zero and disarmed itself
    Expired,
}

/// A one-second countdown driven by ticks from the event loop.
///
/// Only an armed countdown reacts to ticks, so whoever owns it must cancel it
/// whenever the session it was armed for goes away.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    remaining: u64,
    last_second: Option<Instant>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, secs: u64, now: Instant) {
        self.remaining = secs;
        self.last_second = Some(now);
    }

    pub fn cancel(&mut self) {
        self.last_second = None;
    }

    pub fn is_armed(&self) -> bool {
        self.last_second.is_some()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining
    }

    /// Reset the displayed value without arming
    pub fn set_remaining(&mut self, secs: u64) {
        self.cancel();
        self.remaining = secs;
    }

    pub fn on_tick(&mut self, now: Instant) -> TickOutcome {
        let Some(mut last) = self.last_second else {
            return TickOutcome::Idle;
        };

        if self.remaining == 0 {
            self.cancel();
            return TickOutcome::Expired;
        }

        let mut elapsed_any = false;
        while now.saturating_duration_since(last) >= ONE_SECOND {
            last += ONE_SECOND;
            self.remaining -= 1;
            elapsed_any = true;

            if self.remaining == 0 {
                self.cancel();
                return TickOutcome::Expired;
            }
        }
        self.last_second = Some(last);

        if elapsed_any {
            TickOutcome::Second(self.remaining)
        } else {
            TickOutcome::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_until_armed() {
        let mut countdown = Countdown::new();

        assert!(!countdown.is_armed());
        assert_eq!(countdown.on_tick(Instant::now()), TickOutcome::Idle);
    }

    #[test]
    fn counts_down_whole_seconds() {
        let start = Instant::now();
        let mut countdown = Countdown::new();
        countdown.arm(3, start);

        assert_eq!(
            countdown.on_tick(start + Duration::from_millis(500)),
            TickOutcome::Pending
        );
        assert_eq!(
            countdown.on_tick(start + Duration::from_millis(1000)),
            TickOutcome::Second(2)
        );
        assert_eq!(
            countdown.on_tick(start + Duration::from_millis(1900)),
            TickOutcome::Pending
        );
        assert_eq!(
            countdown.on_tick(start + Duration::from_millis(2100)),
            TickOutcome::Second(1)
        );
        assert_eq!(
            countdown.on_tick(start + Duration::from_millis(3000)),
            TickOutcome::Expired
        );
        assert!(!countdown.is_armed());
        assert_eq!(countdown.remaining_secs(), 0);
    }

    #[test]
    fn catches_up_after_a_long_gap() {
        let start = Instant::now();
        let mut countdown = Countdown::new();
        countdown.arm(10, start);

        assert_eq!(
            countdown.on_tick(start + Duration::from_millis(4200)),
            TickOutcome::Second(6)
        );
        assert_eq!(
            countdown.on_tick(start + Duration::from_secs(60)),
            TickOutcome::Expired
        );
    }

    #[test]
    fn cancelled_countdown_ignores_ticks() {
        let start = Instant::now();
        let mut countdown = Countdown::new();
        countdown.arm(5, start);
        countdown.cancel();

        assert_eq!(
            countdown.on_tick(start + Duration::from_secs(10)),
            TickOutcome::Idle
        );
        assert_eq!(countdown.remaining_secs(), 5);
    }

    #[test]
    fn rearm_starts_over() {
        let start = Instant::now();
        let mut countdown = Countdown::new();
        countdown.arm(2, start);
        countdown.on_tick(start + Duration::from_secs(1));

        let later = start + Duration::from_secs(30);
        countdown.arm(2, later);
        assert_eq!(countdown.remaining_secs(), 2);
        assert_eq!(
            countdown.on_tick(later + Duration::from_secs(1)),
            TickOutcome::Second(1)
        );
    }

    #[test]
    fn set_remaining_disarms() {
        let mut countdown = Countdown::new();
        countdown.arm(15, Instant::now());
        countdown.set_remaining(60);

        assert!(!countdown.is_armed());
        assert_eq!(countdown.remaining_secs(), 60);
    }

    #[test]
    fn zero_duration_expires_on_first_tick() {
        let start = Instant::now();
        let mut countdown = Countdown::new();
        countdown.arm(0, start);

        assert_eq!(countdown.on_tick(start), TickOutcome::Expired);
    }
}
