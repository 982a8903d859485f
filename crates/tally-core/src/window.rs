//! Rolling window of event timestamps
//!
//! Timestamps are appended in arrival order from a monotonic clock, so the
//! window is a FIFO: the oldest entry is always at the front and expiry only
//! ever removes from the front.

use alloc::collections::VecDeque;

use embassy_time::{Duration, Instant};

/// Event timestamps that are still inside the record period.
#[derive(Debug, Clone, Default)]
pub struct RollingWindow {
    events: VecDeque<Instant>,
}

impl RollingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event at the tail. `now` must not go backwards across calls.
    pub fn record_event(&mut self, now: Instant) {
        debug_assert!(self.events.back().is_none_or(|last| *last <= now));
        self.events.push_back(now);
    }

    /// Drop the oldest timestamp if it is older than `now - retention`.
    ///
    /// Removes at most one entry per call. Called once per tick this lets the
    /// window lag behind the record period by a bounded amount when events
    /// arrive faster than ticks; [`Self::evict_all_expired`] is the full sweep.
    /// Returns whether an entry was removed.
    pub fn evict_expired(&mut self, now: Instant, retention: Duration) -> bool {
        // Early in the run there is no cutoff yet, so nothing can be stale.
        let Some(cutoff) = now.checked_sub(retention) else {
            return false;
        };

        match self.events.front() {
            Some(oldest) if *oldest < cutoff => {
                self.events.pop_front();
                true
            }
            _ => false,
        }
    }

    /// Drop every timestamp older than `now - retention`, returning how many.
    pub fn evict_all_expired(&mut self, now: Instant, retention: Duration) -> usize {
        let mut removed = 0;
        while self.evict_expired(now, retention) {
            removed += 1;
        }
        removed
    }

    /// Events currently in the window.
    pub fn size(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn oldest(&self) -> Option<Instant> {
        self.events.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instant> {
        self.events.iter()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn window_at(secs: &[u64]) -> RollingWindow {
        let mut window = RollingWindow::new();
        for s in secs {
            window.record_event(Instant::from_secs(*s));
        }
        window
    }

    #[test]
    fn test_record_appends_in_order() {
        let window = window_at(&[0, 1, 2]);
        assert_eq!(window.size(), 3);
        assert_eq!(window.oldest(), Some(Instant::from_secs(0)));
        let order: alloc::vec::Vec<u64> = window.iter().map(|i| i.as_secs()).collect();
        assert_eq!(order, [0, 1, 2]);
    }

    #[test]
    fn test_nothing_expires_before_first_period() {
        let mut window = window_at(&[0, 10]);
        assert!(!window.evict_expired(Instant::from_secs(100), HOUR));
        assert_eq!(window.size(), 2);
    }

    #[test]
    fn test_boundary_entry_is_kept() {
        // exactly `retention` old is not older than the cutoff
        let mut window = window_at(&[100]);
        assert!(!window.evict_expired(Instant::from_secs(3700), HOUR));
        assert_eq!(window.size(), 1);
        assert!(window.evict_expired(Instant::from_secs(3701), HOUR));
        assert!(window.is_empty());
    }

    #[test]
    fn test_evicts_one_per_call() {
        let mut window = window_at(&[0, 1, 2, 5000]);
        let now = Instant::from_secs(5000);

        assert!(window.evict_expired(now, HOUR));
        assert_eq!(window.size(), 3);
        assert!(window.evict_expired(now, HOUR));
        assert!(window.evict_expired(now, HOUR));
        assert_eq!(window.size(), 1);

        // converged: the remaining entry is fresh and stays
        assert!(!window.evict_expired(now, HOUR));
        assert_eq!(window.oldest(), Some(now));
    }

    #[test]
    fn test_never_evicts_fresh_entries() {
        let mut window = window_at(&[4000, 4500, 5000]);
        let now = Instant::from_secs(5000);
        for _ in 0..10 {
            window.evict_expired(now, HOUR);
        }
        assert_eq!(window.size(), 3);
    }

    #[test]
    fn test_full_sweep() {
        let mut window = window_at(&[0, 1, 2, 3000, 5000]);
        assert_eq!(window.evict_all_expired(Instant::from_secs(5000), HOUR), 3);
        assert_eq!(window.size(), 2);
        assert_eq!(window.oldest(), Some(Instant::from_secs(3000)));
    }

    #[test]
    fn test_empty_window_eviction_is_noop() {
        let mut window = RollingWindow::new();
        assert!(!window.evict_expired(Instant::from_secs(10_000), HOUR));
        assert_eq!(window.evict_all_expired(Instant::from_secs(10_000), HOUR), 0);
    }

    #[test]
    fn test_clear() {
        let mut window = window_at(&[1, 2, 3]);
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.oldest(), None);
    }
}
