//! The process-wide counter behind the shared-memory simulation.
//!
//! The read and the write are two separate atomic operations, never a single
//! `fetch_add`. Two concurrent bumps can both read the same old value and one
//! increment is lost. That lost update is what the shared-memory narrative is
//! about, so it is kept.

use std::sync::atomic::{AtomicI64, Ordering};

/// Unsynchronised read-modify-write counter.
#[derive(Debug, Default)]
pub struct SharedCounter {
    value: AtomicI64,
}

impl SharedCounter {
    /// Create a counter starting at `initial`.
    pub fn new(initial: i64) -> Self {
        Self {
            value: AtomicI64::new(initial),
        }
    }

    /// Current value.
    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Read, add `increment`, write back. Returns `(old, new)`.
    ///
    /// Not atomic as a whole: concurrent callers may observe the same `old`.
    pub fn bump(&self, increment: i64) -> (i64, i64) {
        let old = self.value.load(Ordering::Relaxed);
        let new = old.wrapping_add(increment);
        self.value.store(new, Ordering::Relaxed);
        (old, new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_counter_starts_at_initial() {
        assert_eq!(SharedCounter::new(0).value(), 0);
        assert_eq!(SharedCounter::new(42).value(), 42);
    }

    #[test]
    fn test_sequential_bumps_step_by_increment() {
        let counter = SharedCounter::default();
        assert_eq!(counter.bump(5), (0, 5));
        assert_eq!(counter.bump(5), (5, 10));
        assert_eq!(counter.value(), 10);
    }

    #[test]
    fn test_bump_wraps_instead_of_overflowing() {
        let counter = SharedCounter::new(i64::MAX);
        let (old, new) = counter.bump(1);
        assert_eq!(old, i64::MAX);
        assert_eq!(new, i64::MIN);
    }

    #[test]
    fn test_concurrent_bumps_never_exceed_serial_total() {
        let counter = Arc::new(SharedCounter::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = Arc::clone(&counter);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        c.bump(5);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("test: worker thread");
        }
        // Lost updates are allowed; gained ones are not.
        let total = counter.value();
        assert!(total > 0);
        assert!(total <= 8 * 1000 * 5);
        assert_eq!(total % 5, 0);
    }
}
