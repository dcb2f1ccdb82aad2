use std::time::Duration;

use tokio::time::Instant;

/// Deterministic core of the manual tick loop.
///
/// Holds nothing but the period and the next deadline, so tests can drive it
/// with hand-picked `Instant`s instead of waiting on real time. The async
/// loop in [`crate::gui::MainWindow`] feeds it `Instant::now()`, which under
/// a paused tokio test clock is itself virtual.
///
/// Ticks never overlap: `poll` reports how many periods have elapsed and the
/// caller runs the callback that many times in sequence, so a slow callback
/// queues the next tick instead of running it concurrently.
#[derive(Debug)]
pub struct TickLoop {
    period: Duration,
    next: Option<Instant>,
}

impl TickLoop {
    /// A zero period would make `poll` spin forever, so it is clamped to 1ms.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next: None,
        }
    }

    pub fn from_millis(period_ms: u64) -> Self {
        Self::new(Duration::from_millis(period_ms))
    }

    /// Arm the loop. The first tick is due one full period after `now`,
    /// never immediately.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn started(&self) -> bool {
        self.next.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the next tick is due. `None` until `start` is called.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Count the ticks due at `now` and advance the deadline past it.
    /// Returns 0 when the loop hasn't been started.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else { return 0 };
        let mut due = 0;
        while next <= now {
            next += self.period;
            due += 1;
        }
        self.next = Some(next);
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Duration = Duration::from_millis(500);

    #[test]
    fn test_unstarted_loop_never_fires() {
        let mut ticks = TickLoop::new(P);
        assert!(!ticks.started());
        assert_eq!(ticks.poll(Instant::now() + P * 10), 0);
        assert_eq!(ticks.next_deadline(), None);
    }

    #[test]
    fn test_first_fire_is_one_period_after_start() {
        let base = Instant::now();
        let mut ticks = TickLoop::new(P);
        ticks.start(base);

        // Not immediately, and not before a full period has passed.
        assert_eq!(ticks.poll(base), 0);
        assert_eq!(ticks.poll(base + P / 2), 0);
        assert_eq!(ticks.poll(base + P), 1);
    }

    #[test]
    fn test_advancing_by_one_period_fires_exactly_once() {
        let base = Instant::now();
        let mut ticks = TickLoop::new(P);
        ticks.start(base);

        assert_eq!(ticks.poll(base + P), 1);
        // Same instant again: already consumed.
        assert_eq!(ticks.poll(base + P), 0);
        assert_eq!(ticks.next_deadline(), Some(base + P * 2));
    }

    #[test]
    fn test_advancing_by_three_periods_fires_exactly_three_times() {
        let base = Instant::now();
        let mut ticks = TickLoop::new(P);
        ticks.start(base);

        // A slow callback shows up here as a late poll: all missed ticks are
        // reported at once so the caller runs them back to back, in order.
        assert_eq!(ticks.poll(base + P * 3), 3);
        assert_eq!(ticks.poll(base + P * 3), 0);
        assert_eq!(ticks.next_deadline(), Some(base + P * 4));
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let ticks = TickLoop::new(Duration::ZERO);
        assert_eq!(ticks.period(), Duration::from_millis(1));
    }
}
