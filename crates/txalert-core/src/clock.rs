//! Time sources for record timestamps.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Source of the current instant in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// Wraps another clock and never hands out an instant earlier than one
/// it already returned.
#[derive(Debug)]
pub struct MonotonicClock<C> {
    inner: C,
    last: AtomicI64,
}

impl<C: Clock> MonotonicClock<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            last: AtomicI64::new(i64::MIN),
        }
    }
}

impl<C: Clock> Clock for MonotonicClock<C> {
    fn now_millis(&self) -> i64 {
        let now = self.inner.now_millis();
        let prev = self.last.fetch_max(now, Ordering::AcqRel);
        prev.max(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays a fixed sequence of instants.
    struct ScriptedClock(Mutex<Vec<i64>>);

    impl Clock for ScriptedClock {
        fn now_millis(&self) -> i64 {
            self.0.lock().unwrap().remove(0)
        }
    }

    #[test]
    fn test_monotonic_clock_clamps_backwards_steps() {
        let clock = MonotonicClock::new(ScriptedClock(Mutex::new(vec![100, 250, 180, 300])));

        let seen: Vec<i64> = (0..4).map(|_| clock.now_millis()).collect();
        assert_eq!(seen, vec![100, 250, 250, 300]);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
