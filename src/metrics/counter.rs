use std::sync::atomic::{AtomicU64, Ordering};

/// Count of successful swipes since the last drain.
///
/// Handlers call `increment()`, the reporter calls `drain_and_reset()`.
/// Both are single atomic instructions, so no lock is needed and an
/// increment racing a drain lands in exactly one of the two drains.
#[derive(Debug, Default)]
pub struct ThroughputCounter {
    value: AtomicU64,
}

impl ThroughputCounter {
    pub const fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    /// Add one swipe.
    #[inline]
    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Return the count accumulated since the previous drain and reset it to 0.
    #[inline]
    pub fn drain_and_reset(&self) -> u64 {
        self.value.swap(0, Ordering::AcqRel)
    }

    /// Peek at the current value without resetting it.
    #[inline]
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn drain_returns_count_and_resets() {
        let counter = ThroughputCounter::new();
        for _ in 0..7 {
            counter.increment();
        }

        assert_eq!(counter.current(), 7);
        assert_eq!(counter.drain_and_reset(), 7);
        assert_eq!(counter.drain_and_reset(), 0);
        assert_eq!(counter.current(), 0);
    }

    #[test]
    fn fresh_counter_drains_zero() {
        assert_eq!(ThroughputCounter::default().drain_and_reset(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_are_not_lost() {
        let counter = Arc::new(ThroughputCounter::new());

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let counter = counter.clone();
                tokio::spawn(async move {
                    for _ in 0..1_000 {
                        counter.increment();
                    }
                })
            })
            .collect();

        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(counter.drain_and_reset(), 64_000);
    }

    #[test]
    fn drains_racing_increments_sum_to_total() {
        let counter = Arc::new(ThroughputCounter::new());
        let writers = 8;
        let per_writer = 20_000u64;

        let drained = std::thread::scope(|s| {
            for _ in 0..writers {
                let counter = counter.clone();
                s.spawn(move || {
                    for _ in 0..per_writer {
                        counter.increment();
                    }
                });
            }

            // Drain repeatedly while writers are still running
            let drainer = s.spawn(|| {
                let mut sum = 0u64;
                for _ in 0..10_000 {
                    sum += counter.drain_and_reset();
                    std::thread::yield_now();
                }
                sum
            });
            drainer.join().unwrap()
        });

        let total = drained + counter.drain_and_reset();
        assert_eq!(total, writers * per_writer);
    }

    #[test]
    fn concurrent_drains_see_disjoint_values() {
        let counter = Arc::new(ThroughputCounter::new());
        for _ in 0..50_000 {
            counter.increment();
        }

        let counter = &counter;
        let results: Vec<u64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(move || counter.drain_and_reset()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        // Exactly one drain wins the whole value, the rest see what was left (0)
        assert_eq!(results.iter().sum::<u64>(), 50_000);
        assert_eq!(results.iter().filter(|&&v| v == 50_000).count(), 1);
    }
}
