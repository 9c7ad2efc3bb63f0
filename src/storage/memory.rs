use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::{AppError, Record, Repository, Result};

/// In-process store backed by a vector in insertion order
///
/// Used as the default backend and by the test suites. Writes take the lock for the
/// whole compare-and-swap so the version check and the replacement are atomic.
#[derive(Debug)]
pub struct MemoryRepository<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MemoryRepository<T> {
    async fn create(&self, mut entity: T) -> Result<T> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.id() == entity.id()) {
            return Err(AppError::conflict(format!(
                "{} record '{}' already exists",
                T::COLLECTION,
                entity.id()
            )));
        }

        entity.set_version(1);
        records.push(entity.clone());

        Ok(entity)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn update(&self, mut entity: T) -> Result<T> {
        let mut records = self.records.write().await;

        let stored = records
            .iter_mut()
            .find(|r| r.id() == entity.id())
            .ok_or_else(|| {
                AppError::not_found(format!("{} record '{}'", T::COLLECTION, entity.id()))
            })?;

        if stored.version() != entity.version() {
            return Err(AppError::conflict(format!(
                "{} record '{}' was modified concurrently (expected version {}, found {})",
                T::COLLECTION,
                entity.id(),
                entity.version(),
                stored.version()
            )));
        }

        entity.set_version(stored.version() + 1);
        *stored = entity.clone();

        Ok(entity)
    }

    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.records.read().await.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(format!("{} record '{}'", T::COLLECTION, id)))?;
        records.remove(position);
        Ok(())
    }
}
