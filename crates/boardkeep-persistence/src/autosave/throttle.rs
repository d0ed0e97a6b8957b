//! Time-based throttle for checkpoint writes.

use std::time::{Duration, Instant};

/// Whether a save may run at `now`.
///
/// A save is skipped while `now < last_saved_at + min_interval`. Without a
/// previous save it always may run.
pub fn should_save(now: Instant, last_saved_at: Option<Instant>, min_interval: Duration) -> bool {
    match last_saved_at {
        Some(last) => now.saturating_duration_since(last) >= min_interval,
        None => true,
    }
}

/// Remembers when the last save attempt started.
#[derive(Debug, Clone)]
pub struct AutosaveThrottle {
    min_interval: Duration,
    last_saved_at: Option<Instant>,
}

impl AutosaveThrottle {
    /// Throttle that allows the first attempt immediately.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_saved_at: None,
        }
    }

    /// Throttle whose first window starts at `started_at`.
    pub fn starting_at(min_interval: Duration, started_at: Instant) -> Self {
        Self {
            min_interval,
            last_saved_at: Some(started_at),
        }
    }

    /// Decide whether to save now.
    ///
    /// On `true` the window restarts at `now` regardless of whether the
    /// write that follows succeeds, so a failing disk is retried at most
    /// once per interval.
    pub fn maybe_save(&mut self, now: Instant) -> bool {
        if !should_save(now, self.last_saved_at, self.min_interval) {
            tracing::debug!("Auto-save throttled");
            return false;
        }
        self.last_saved_at = Some(now);
        true
    }

    /// When the last attempt started.
    pub fn last_saved_at(&self) -> Option<Instant> {
        self.last_saved_at
    }

    /// The throttle window.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WINDOW: Duration = Duration::from_secs(30);

    #[test]
    fn test_first_attempt_allowed() {
        let mut throttle = AutosaveThrottle::new(WINDOW);
        assert!(throttle.maybe_save(Instant::now()));
    }

    #[test]
    fn test_window_from_start() {
        let start = Instant::now();
        let mut throttle = AutosaveThrottle::starting_at(WINDOW, start);

        assert!(!throttle.maybe_save(start + Duration::from_secs(10)));
        assert!(throttle.maybe_save(start + Duration::from_secs(31)));
        assert!(!throttle.maybe_save(start + Duration::from_secs(45)));
        assert!(throttle.maybe_save(start + Duration::from_secs(61)));
    }

    #[test]
    fn test_skipped_attempt_does_not_move_window() {
        let start = Instant::now();
        let mut throttle = AutosaveThrottle::starting_at(WINDOW, start);

        assert!(!throttle.maybe_save(start + Duration::from_secs(29)));
        assert_eq!(throttle.last_saved_at(), Some(start));
    }

    #[test]
    fn test_exact_boundary_saves() {
        let start = Instant::now();
        assert!(should_save(start + WINDOW, Some(start), WINDOW));
        assert!(!should_save(
            start + WINDOW - Duration::from_millis(1),
            Some(start),
            WINDOW
        ));
    }

    proptest! {
        #[test]
        fn prop_should_save_matches_elapsed(elapsed_ms in 0u64..600_000, window_ms in 1u64..120_000) {
            let base = Instant::now();
            let window = Duration::from_millis(window_ms);
            let now = base + Duration::from_millis(elapsed_ms);
            prop_assert_eq!(should_save(now, Some(base), window), elapsed_ms >= window_ms);
        }

        #[test]
        fn prop_never_twice_within_window(offsets in proptest::collection::vec(0u64..10_000, 1..50)) {
            let base = Instant::now();
            let mut throttle = AutosaveThrottle::starting_at(Duration::from_secs(1), base);
            let mut now = base;
            let mut last_true: Option<Instant> = None;
            for offset in offsets {
                now += Duration::from_millis(offset);
                if throttle.maybe_save(now) {
                    if let Some(prev) = last_true {
                        prop_assert!(now.duration_since(prev) >= Duration::from_secs(1));
                    }
                    last_true = Some(now);
                }
            }
        }
    }
}
