//! Postgres-backed store (`kv_entries` / `kv_members`).

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Maximum pooled connections.
const MAX_CONNECTIONS: u32 = 20;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool to `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for PgStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let value = sqlx::query_scalar::<_, Value>("SELECT value FROM kv_entries WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv_entries (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_entries WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_members(&self, set_key: &str) -> Result<Vec<String>, StoreError> {
        let members = sqlx::query_scalar::<_, String>(
            "SELECT member FROM kv_members WHERE set_key = $1 ORDER BY member",
        )
        .bind(set_key)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    async fn add_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO kv_members (set_key, member) VALUES ($1, $2) \
             ON CONFLICT (set_key, member) DO NOTHING",
        )
        .bind(set_key)
        .bind(member)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM kv_members WHERE set_key = $1 AND member = $2")
            .bind(set_key)
            .bind(member)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
