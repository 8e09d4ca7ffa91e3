//! Identity synthesis for locally created products.
//!
//! The remote backend never hands back a durable id for a created product, so
//! the client mints its own. Generators sit behind [`IdGenerator`] so tests can
//! pin ids with [`SequentialIds`] while production uses [`ClockIds`].
//!
//! Any `Fn() -> ProductId` closure is also a generator:
//!
//! ```rust
//! use catalog_overlay::ids::IdGenerator;
//! use catalog_overlay::model::ProductId;
//!
//! let fixed = || ProductId(999);
//! assert_eq!(fixed.next_id(), ProductId(999));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::ProductId;

/// Source of ids for locally created products.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> ProductId;
}

impl<F> IdGenerator for F
where
    F: Fn() -> ProductId + Send + Sync,
{
    fn next_id(&self) -> ProductId {
        self()
    }
}

/// Monotonic counter starting at a fixed base.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn starting_at(base: u64) -> Self {
        Self {
            next: AtomicU64::new(base),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> ProductId {
        ProductId(self.next.fetch_add(1, Ordering::SeqCst))
    }
}

/// Millisecond-timestamp ids, bumped past the previous id when the clock has
/// not advanced (or went backwards), so no two ids from one generator repeat.
///
/// Timestamps are in the trillions, far outside the small integer ids the
/// remote catalog assigns.
#[derive(Debug, Default)]
pub struct ClockIds {
    last: AtomicU64,
}

impl ClockIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl IdGenerator for ClockIds {
    fn next_id(&self) -> ProductId {
        let now = Self::now_millis();
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return ProductId(candidate),
                Err(actual) => last = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_sequential_ids_count_up_from_base() {
        let ids = SequentialIds::starting_at(1_000);
        assert_eq!(ids.next_id(), ProductId(1_000));
        assert_eq!(ids.next_id(), ProductId(1_001));
    }

    #[test]
    fn test_clock_ids_never_repeat_in_a_burst() {
        let ids = ClockIds::new();
        let mut seen = HashSet::new();
        let mut previous = ProductId(0);
        for _ in 0..10_000 {
            let id = ids.next_id();
            assert!(id > previous, "ids must be strictly increasing");
            assert!(seen.insert(id));
            previous = id;
        }
    }

    #[test]
    fn test_clock_ids_unique_across_threads() {
        let ids = Arc::new(ClockIds::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..1_000).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 4_000);
    }

    #[test]
    fn test_clock_ids_are_disjoint_from_remote_ids() {
        let remote_ids: HashSet<ProductId> = (1..=20).map(ProductId).collect();
        let ids = ClockIds::new();
        for _ in 0..100 {
            assert!(!remote_ids.contains(&ids.next_id()));
        }
    }
}
