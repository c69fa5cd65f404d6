// src/services/locks.rs

//! Striped locks over article identity keys.
//!
//! Every uuid and title hashes onto one of a fixed number of stripes.
//! A caller locks the stripes of all keys it is about to touch, always in
//! ascending stripe order, so two callers never wait on each other in a
//! cycle. Articles whose keys land on different stripes never block.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

use parking_lot::{Mutex, MutexGuard};

/// An identity key of an article.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Uuid(String),
    Title(String),
}

/// Fixed set of mutexes addressed by key hash.
pub struct KeyLocks {
    stripes: Vec<Mutex<()>>,
    hasher: RandomState,
}

/// Guards held for one critical section.
pub struct StripeGuard<'a> {
    held: Vec<usize>,
    _guards: Vec<MutexGuard<'a, ()>>,
}

impl StripeGuard<'_> {
    /// Whether this guard covers the stripe of `key`.
    pub fn covers(&self, locks: &KeyLocks, key: &IdentityKey) -> bool {
        self.held.binary_search(&locks.stripe_of(key)).is_ok()
    }
}

impl KeyLocks {
    pub fn new(stripes: usize) -> Self {
        Self {
            stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
            hasher: RandomState::new(),
        }
    }

    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    fn stripe_of(&self, key: &IdentityKey) -> usize {
        (self.hasher.hash_one(key) % self.stripes.len() as u64) as usize
    }

    /// Lock the stripes of every key in `keys`.
    pub fn lock(&self, keys: &[IdentityKey]) -> StripeGuard<'_> {
        let mut held: Vec<usize> = keys.iter().map(|k| self.stripe_of(k)).collect();
        held.sort_unstable();
        held.dedup();

        let guards = held.iter().map(|&i| self.stripes[i].lock()).collect();
        StripeGuard {
            held,
            _guards: guards,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_guard_covers_requested_keys() {
        let locks = KeyLocks::new(16);
        let uuid = IdentityKey::Uuid("a".into());
        let title = IdentityKey::Title("a".into());

        let guard = locks.lock(&[uuid.clone(), title.clone(), uuid.clone()]);
        assert!(guard.covers(&locks, &uuid));
        assert!(guard.covers(&locks, &title));
    }

    #[test]
    fn test_single_stripe_covers_everything() {
        let locks = KeyLocks::new(1);
        let guard = locks.lock(&[IdentityKey::Uuid("x".into())]);
        assert!(guard.covers(&locks, &IdentityKey::Title("anything".into())));
    }

    #[test]
    fn test_zero_stripes_rounds_up() {
        assert_eq!(KeyLocks::new(0).stripe_count(), 1);
    }

    #[test]
    fn test_opposite_order_lockers_do_not_deadlock() {
        let locks = Arc::new(KeyLocks::new(4));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let locks = Arc::clone(&locks);
                thread::spawn(move || {
                    for n in 0..500 {
                        let a = IdentityKey::Uuid(format!("k{}", n % 7));
                        let b = IdentityKey::Title(format!("k{}", (n + i) % 5));
                        let keys = if i % 2 == 0 { vec![a, b] } else { vec![b, a] };
                        let _guard = locks.lock(&keys);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
