use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::core::Result;

/// A persisted aggregate addressed by a string id and guarded by a version counter
///
/// The version is bumped by the store on every successful write; callers pass back the
/// version they read so that a concurrent writer is detected instead of overwritten.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection (table) the aggregate lives in
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn version(&self) -> u64;

    fn set_version(&mut self, version: u64);
}

/// Storage abstraction every business rule is written against
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Insert a new aggregate; fails with Conflict if the id is taken
    async fn create(&self, entity: T) -> Result<T>;

    /// Find aggregate by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;

    /// Compare-and-swap update
    ///
    /// Succeeds only when the stored version equals `entity.version()`; returns the
    /// entity carrying its new version. A stale version fails with Conflict, a missing
    /// id with NotFound.
    async fn update(&self, entity: T) -> Result<T>;

    /// All aggregates in insertion order
    async fn list(&self) -> Result<Vec<T>>;

    /// Removes an aggregate; a missing id is NotFound
    async fn delete(&self, id: &str) -> Result<()>;
}
