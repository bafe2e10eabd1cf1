//! Process-wide processed-item counter

use std::sync::atomic::{AtomicUsize, Ordering};

/// Lock-free counter shared by every worker
///
/// Incremented exactly once per processed item. Read for the final summary
/// only after every worker has reported done.
#[derive(Debug, Default)]
pub struct ProcessedCounter {
    count: AtomicUsize,
}

impl ProcessedCounter {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one and return the new value
    pub fn increment(&self) -> usize {
        self.count.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Current value
    pub fn get(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}

/// Whether a processed count deserves a progress line
///
/// Every count below 10 is reported, then every fifth.
pub fn is_milestone(count: usize) -> bool {
    count < 10 || count.is_multiple_of(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counter_starts_at_zero() {
        let counter = ProcessedCounter::new();
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_increment_returns_new_value() {
        let counter = ProcessedCounter::new();
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_concurrent_increments_not_lost() {
        let counter = Arc::new(ProcessedCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    (0..1000).map(|_| counter.increment()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen: Vec<usize> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("increment thread panicked"))
            .collect();
        seen.sort_unstable();

        assert_eq!(counter.get(), 8000);
        // Every returned value is unique: 1..=8000 exactly once.
        assert_eq!(seen, (1..=8000).collect::<Vec<_>>());
    }

    #[test]
    fn test_is_milestone() {
        for count in 1..10 {
            assert!(is_milestone(count));
        }
        assert!(is_milestone(10));
        assert!(!is_milestone(11));
        assert!(!is_milestone(14));
        assert!(is_milestone(15));
        assert!(is_milestone(200));
        assert!(!is_milestone(199));
    }
}
