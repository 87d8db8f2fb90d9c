//! Storage port used by [`ResourceActor`](crate::actor_framework::ResourceActor).
//!
//! The actor owns its store exclusively and talks to it synchronously from inside its
//! message loop. A store only has to make each `put` all-or-nothing; serialisation of
//! concurrent mutations is the actor's job.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::actor_framework::Entity;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("write to {table} failed: {reason}")]
    WriteFailed { table: &'static str, reason: String },
}

pub trait Store<T: Entity>: Send + 'static {
    fn get(&self, id: &T::Id) -> Result<Option<T>, StorageError>;

    /// Insert or replace the entity. Either every row of the entity is written or none is.
    fn put(&mut self, entity: &T) -> Result<(), StorageError>;

    fn remove(&mut self, id: &T::Id) -> Result<bool, StorageError>;

    fn list(&self) -> Result<Vec<T>, StorageError>;
}

/// Plain map-backed store for entities that fit in a single row.
pub struct MemoryStore<T: Entity> {
    items: HashMap<T::Id, T>,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Store<T> for MemoryStore<T> {
    fn get(&self, id: &T::Id) -> Result<Option<T>, StorageError> {
        Ok(self.items.get(id).cloned())
    }

    fn put(&mut self, entity: &T) -> Result<(), StorageError> {
        self.items.insert(entity.id().clone(), entity.clone());
        Ok(())
    }

    fn remove(&mut self, id: &T::Id) -> Result<bool, StorageError> {
        Ok(self.items.remove(id).is_some())
    }

    fn list(&self) -> Result<Vec<T>, StorageError> {
        Ok(self.items.values().cloned().collect())
    }
}

/// Arms a store to fail row writes, so tests can simulate a fault in the middle of a
/// multi-row transaction.
///
/// Cloning shares the trigger: arm it from the test, let the store consume it.
#[derive(Debug, Clone, Default)]
pub struct FaultInjector {
    remaining: Arc<Mutex<Option<usize>>>,
}

impl FaultInjector {
    /// Let `writes` more row writes succeed, then fail every write until [`clear`](Self::clear).
    pub fn fail_after_writes(&self, writes: usize) {
        *self.remaining.lock() = Some(writes);
    }

    pub fn clear(&self) {
        *self.remaining.lock() = None;
    }

    /// Called by a store before each row write.
    pub fn before_write(&self, table: &'static str) -> Result<(), StorageError> {
        let mut remaining = self.remaining.lock();
        match remaining.as_mut() {
            None => Ok(()),
            Some(0) => Err(StorageError::WriteFailed {
                table,
                reason: "injected fault".to_string(),
            }),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_injector_lets_budgeted_writes_through() {
        let faults = FaultInjector::default();
        assert!(faults.before_write("orders").is_ok());

        faults.fail_after_writes(2);
        assert!(faults.before_write("orders").is_ok());
        assert!(faults.before_write("order_items").is_ok());
        assert_eq!(
            faults.before_write("order_items"),
            Err(StorageError::WriteFailed {
                table: "order_items",
                reason: "injected fault".to_string()
            })
        );
        // Stays armed until cleared.
        assert!(faults.before_write("orders").is_err());

        faults.clear();
        assert!(faults.before_write("orders").is_ok());
    }

    #[test]
    fn clones_share_the_trigger() {
        let faults = FaultInjector::default();
        let store_side = faults.clone();
        faults.fail_after_writes(0);
        assert!(store_side.before_write("orders").is_err());
    }
}
