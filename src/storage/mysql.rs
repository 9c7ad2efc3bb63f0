// MySQL document store
//
// Each aggregate is one row: `id`, a `version` counter used for compare-and-swap,
// and the aggregate serialized as JSON in `data`. `seq` preserves insertion order.
// Tables are created by the migrations in `migrations/`.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Record, Repository, Result};

/// Repository storing aggregates of type `T` in the `T::COLLECTION` table
pub struct MySqlRepository<T> {
    pool: MySqlPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> MySqlRepository<T> {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    fn decode(version: i64, data: &str) -> Result<T> {
        let mut entity: T = serde_json::from_str(data)?;
        entity.set_version(version as u64);
        Ok(entity)
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MySqlRepository<T> {
    async fn create(&self, mut entity: T) -> Result<T> {
        entity.set_version(1);
        let data = serde_json::to_string(&entity)?;
        let sql = format!(
            "INSERT INTO {} (id, version, data) VALUES (?, ?, ?)",
            T::COLLECTION
        );

        sqlx::query(&sql)
            .bind(entity.id())
            .bind(1_i64)
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::conflict(format!(
                            "{} record '{}' already exists",
                            T::COLLECTION,
                            entity.id()
                        ));
                    }
                }
                AppError::Database(e)
            })?;

        Ok(entity)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        let sql = format!("SELECT version, data FROM {} WHERE id = ?", T::COLLECTION);

        let row = sqlx::query_as::<_, (i64, String)>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(version, data)| Self::decode(version, &data))
            .transpose()
    }

    async fn update(&self, mut entity: T) -> Result<T> {
        let expected = entity.version();
        entity.set_version(expected + 1);
        let data = serde_json::to_string(&entity)?;
        let sql = format!(
            "UPDATE {} SET version = ?, data = ? WHERE id = ? AND version = ?",
            T::COLLECTION
        );

        let result = sqlx::query(&sql)
            .bind((expected + 1) as i64)
            .bind(&data)
            .bind(entity.id())
            .bind(expected as i64)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            let exists_sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?", T::COLLECTION);
            let count: i64 = sqlx::query_scalar(&exists_sql)
                .bind(entity.id())
                .fetch_one(&self.pool)
                .await?;

            return Err(if count == 0 {
                AppError::not_found(format!("{} record '{}'", T::COLLECTION, entity.id()))
            } else {
                AppError::conflict(format!(
                    "{} record '{}' was modified concurrently (expected version {})",
                    T::COLLECTION,
                    entity.id(),
                    expected
                ))
            });
        }

        Ok(entity)
    }

    async fn list(&self) -> Result<Vec<T>> {
        let sql = format!("SELECT version, data FROM {} ORDER BY seq", T::COLLECTION);

        let rows = sqlx::query_as::<_, (i64, String)>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|(version, data)| Self::decode(*version, data))
            .collect()
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", T::COLLECTION);

        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("{} record '{}'", T::COLLECTION, id)));
        }

        Ok(())
    }
}
