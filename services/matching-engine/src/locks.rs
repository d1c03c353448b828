//! Per-listing critical sections
//!
//! Orders for different listings are fully independent; the only
//! contended resource is one listing's book. This map hands out one
//! mutex per listing so submissions and cancellations for the same
//! listing serialize while everything else proceeds in parallel.

use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use types::ids::ListingId;

/// Lazily-populated map of per-listing mutexes.
#[derive(Default)]
pub struct ListingLocks {
    locks: DashMap<ListingId, Arc<Mutex<()>>>,
}

impl ListingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the mutex guarding `listing_id`, creating it on first use.
    ///
    /// Callers hold the returned Arc locally and lock it:
    /// ```ignore
    /// let lock = locks.acquire(listing_id);
    /// let _guard = lock.lock();
    /// ```
    pub fn acquire(&self, listing_id: ListingId) -> Arc<Mutex<()>> {
        self.locks
            .entry(listing_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Number of listings that have ever been locked.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_same_listing_same_mutex() {
        let locks = ListingLocks::new();
        let id = ListingId::new();
        let a = locks.acquire(id);
        let b = locks.acquire(id);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn test_different_listings_do_not_contend() {
        let locks = ListingLocks::new();
        let a = locks.acquire(ListingId::new());
        let b = locks.acquire(ListingId::new());
        assert!(!Arc::ptr_eq(&a, &b));

        // Holding one listing's lock must not block another listing.
        let _guard = a.lock().unwrap();
        let handle = thread::spawn(move || {
            let _other = b.lock().unwrap();
            true
        });
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_serializes_same_listing() {
        let locks = Arc::new(ListingLocks::new());
        let id = ListingId::new();
        let counter = Arc::new(Mutex::new(0u32));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let lock = locks.acquire(id);
                        let _guard = lock.lock().unwrap();
                        let mut c = counter.lock().unwrap();
                        *c += 1;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*counter.lock().unwrap(), 800);
    }
}
