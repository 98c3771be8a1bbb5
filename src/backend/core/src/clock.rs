//! Identifier and timestamp source for newly created records.
//!
//! Every mutation that creates a record asks an [`IdClock`] for an id and a
//! creation time. The clock is injected, so tests can run against a
//! deterministic sequence while the CLI uses UUIDs and the system time.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Supplies unique ids and creation timestamps.
pub trait IdClock {
    /// Return an id that has never been returned before. `prefix` names the
    /// record family (`student`, `log`, `homework`, `stamp`, `penalty`).
    fn new_id(&self, prefix: &str) -> String;

    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

impl<C: IdClock + ?Sized> IdClock for &C {
    fn new_id(&self, prefix: &str) -> String {
        (**self).new_id(prefix)
    }

    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Production clock: random v4 UUIDs and wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl IdClock for SystemClock {
    fn new_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4())
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock backed by a monotonic counter.
///
/// Ids are `prefix-N` with N strictly increasing across all prefixes. Time
/// starts at `start` and advances by `step` on every call to `now`.
#[derive(Debug)]
pub struct SequentialClock {
    counter: AtomicU64,
    ticks: AtomicU64,
    start: DateTime<Utc>,
    step: Duration,
}

impl SequentialClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::with_step(start, Duration::seconds(1))
    }

    pub fn with_step(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            counter: AtomicU64::new(0),
            ticks: AtomicU64::new(0),
            start,
            step,
        }
    }
}

impl Default for SequentialClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::default())
    }
}

impl IdClock for SequentialClock {
    fn new_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", prefix, n)
    }

    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        self.start + self.step * i32::try_from(tick).unwrap_or(i32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_system_clock_ids_are_unique() {
        let clock = SystemClock;
        let ids: HashSet<String> = (0..1000).map(|_| clock.new_id("log")).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.starts_with("log-")));
    }

    #[test]
    fn test_sequential_clock_is_monotonic() {
        let start = Utc::now();
        let clock = SequentialClock::new(start);

        assert_eq!(clock.new_id("log"), "log-1");
        assert_eq!(clock.new_id("homework"), "homework-2");

        let t0 = clock.now();
        let t1 = clock.now();
        assert_eq!(t0, start);
        assert_eq!(t1 - t0, Duration::seconds(1));
    }

    #[test]
    fn test_sequential_clock_saturates_tick_count() {
        let start = DateTime::<Utc>::default();
        let clock = SequentialClock::new(start);
        clock.ticks.store(u64::from(u32::MAX) + 7, Ordering::Relaxed);

        assert_eq!(clock.now(), start + Duration::seconds(i64::from(i32::MAX)));
    }
}
