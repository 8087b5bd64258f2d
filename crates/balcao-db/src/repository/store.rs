//! # Store Repository
//!
//! CRUD for store reference data. No computed fields.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use balcao_core::Store;

/// Repository for store database operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Inserts a store built with [`Store::new`].
    pub async fn insert(&self, store: &Store) -> DbResult<Store> {
        store.validate()?;
        debug!(id = %store.id, name = %store.name, "Inserting store");

        sqlx::query(
            r#"
            INSERT INTO stores (id, name, address, phone)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&store.id)
        .bind(&store.name)
        .bind(&store.address)
        .bind(&store.phone)
        .execute(&self.pool)
        .await?;

        Ok(store.clone())
    }

    /// Gets a store by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, name, address, phone
            FROM stores
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Lists all stores by name.
    pub async fn list(&self) -> DbResult<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, name, address, phone
            FROM stores
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    /// Replaces name, address and phone of an existing store.
    pub async fn update(&self, store: &Store) -> DbResult<()> {
        store.validate()?;
        debug!(id = %store.id, "Updating store");

        let result = sqlx::query(
            r#"
            UPDATE stores SET
                name = ?2,
                address = ?3,
                phone = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&store.id)
        .bind(&store.name)
        .bind(&store.address)
        .bind(&store.phone)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", &store.id));
        }

        Ok(())
    }

    /// Deletes a store.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting store");

        let result = sqlx::query("DELETE FROM stores WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }

        Ok(())
    }

    /// Counts stores (used by the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
