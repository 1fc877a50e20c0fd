//! Per-character serialization of read-modify-write use cases
//!
//! Every use case that loads a character, mutates it and writes it back
//! holds that character's lock for the whole round-trip, so two concurrent
//! actions against one session can never both apply.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::value_objects::CharacterId;

#[derive(Default)]
pub struct CharacterLocks {
    locks: Mutex<HashMap<CharacterId, Arc<Mutex<()>>>>,
}

impl CharacterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to one character
    pub async fn acquire(&self, id: CharacterId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Forget locks nobody holds or waits on; returns how many were dropped
    pub async fn prune(&self) -> usize {
        let mut locks = self.locks.lock().await;
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_character_is_serialized() {
        let locks = Arc::new(CharacterLocks::new());
        let id = CharacterId::new();

        let guard = locks.acquire(id).await;
        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_other_characters_do_not_block() {
        let locks = CharacterLocks::new();
        let _first = locks.acquire(CharacterId::new()).await;
        let _second = locks.acquire(CharacterId::new()).await;
    }

    #[tokio::test]
    async fn test_prune_keeps_held_locks() {
        let locks = CharacterLocks::new();
        let held = CharacterId::new();
        let _guard = locks.acquire(held).await;
        drop(locks.acquire(CharacterId::new()).await);

        assert_eq!(locks.prune().await, 1);
        assert_eq!(locks.locks.lock().await.len(), 1);
    }
}
