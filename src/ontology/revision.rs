use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic version of the knowledge base's fact set.
///
/// Every successful mutation bumps the counter exactly once; derived views are
/// stamped with the value they were built from and are stale as soon as the
/// two differ.
#[derive(Debug, Default)]
pub struct RevisionCounter {
    value: AtomicU64,
}

impl RevisionCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter and returns the new revision.
    pub fn bump(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Reads the current revision.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::RevisionCounter;

    #[test]
    fn bump_returns_the_new_value() {
        let counter = RevisionCounter::new();
        assert_eq!(counter.current(), 0);
        assert_eq!(counter.bump(), 1);
        assert_eq!(counter.bump(), 2);
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn concurrent_bumps_are_never_lost() {
        let counter = Arc::new(RevisionCounter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..250 {
                        counter.bump();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("bumping thread");
        }
        assert_eq!(counter.current(), 1000);
    }
}
