//! Keyed Locking
//!
//! A map of lazily created async mutexes, one per key. Used to
//! serialize every mutation touching one owner's data (e.g. all writes
//! to a single mentor's schedule) while leaving other owners untouched.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-key async mutex map
///
/// Guards are owned, so they can be held across `await` points for the
/// whole duration of a multi-step operation.
pub struct KeyedMutex<K> {
    locks: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K> KeyedMutex<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the mutex for `key`, creating it on first use
    ///
    /// The inner map lock is only held while looking up the entry,
    /// never while waiting for the key's mutex itself.
    pub async fn lock(&self, key: &K) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        entry.lock_owned().await
    }
}

impl<K> Default for KeyedMutex<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_key_serializes() {
        let gate = Arc::new(KeyedMutex::new());
        let counter = Arc::new(std::sync::Mutex::new(0u32));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let gate = Arc::clone(&gate);
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                let _guard = gate.lock(&"mentor-a").await;
                // Non-atomic read-modify-write, safe only under the gate
                let read = *counter.lock().unwrap();
                tokio::task::yield_now().await;
                *counter.lock().unwrap() = read + 1;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*counter.lock().unwrap(), 16);
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let gate = KeyedMutex::new();
        let _a = gate.lock(&"a").await;
        // Would deadlock if keys shared one mutex
        let _b = gate.lock(&"b").await;
    }

    #[tokio::test]
    async fn test_reacquire_after_release() {
        let gate = KeyedMutex::new();
        {
            let _guard = gate.lock(&1u32).await;
        }
        let _guard = gate.lock(&1u32).await;
    }
}
