//! # Postgres
//!
//! Relational backend for the store.
//!
//! ## Schema
//! - `inventory(name TEXT PRIMARY KEY, data JSONB)`: one row per flavor, the item
//!   document kept opaque
//! - `settings(key TEXT PRIMARY KEY, value TEXT)`: the headline lives under `headline`
//!
//! ## Implementation
//! - Tables are created on connect if absent
//! - Whole-map saves upsert every key in one transaction, any failure rolls back all
//!   of them and the caller never sees a partial save
//! - No row locks or version checks, last write wins per key
//! - TLS is required without certificate verification unless the URL carries its
//!   own `sslmode`
use std::{str::FromStr, time::Duration};

use sqlx::{
    Pool, Postgres,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    types::Json,
};
use stock::{DEFAULT_HEADLINE, Inventory, InventoryItem};

use crate::store::StoreError;

pub type DbPool = Pool<Postgres>;

const HEADLINE_KEY: &str = "headline";

const CREATE_INVENTORY: &str =
    "CREATE TABLE IF NOT EXISTS inventory (name TEXT PRIMARY KEY, data JSONB NOT NULL)";
const CREATE_SETTINGS: &str =
    "CREATE TABLE IF NOT EXISTS settings (key TEXT PRIMARY KEY, value TEXT NOT NULL)";

const UPSERT_ITEM: &str = "INSERT INTO inventory (name, data) VALUES ($1, $2) \
     ON CONFLICT (name) DO UPDATE SET data = EXCLUDED.data";
const UPSERT_SETTING: &str = "INSERT INTO settings (key, value) VALUES ($1, $2) \
     ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value";

pub struct PgStore {
    pool: DbPool,
}

pub async fn init_pool(database_url: &str) -> Result<DbPool, StoreError> {
    let mut opts = PgConnectOptions::from_str(database_url)?;
    if !database_url.contains("sslmode=") {
        opts = opts.ssl_mode(PgSslMode::Require);
    }

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(opts)
        .await?;

    Ok(pool)
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = init_pool(database_url).await?;

        sqlx::query(CREATE_INVENTORY).execute(&pool).await?;
        sqlx::query(CREATE_SETTINGS).execute(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn get(&self) -> Result<Inventory, StoreError> {
        let rows: Vec<(String, Json<InventoryItem>)> =
            sqlx::query_as("SELECT name, data FROM inventory ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(name, Json(item))| (name, item))
            .collect())
    }

    pub async fn set(&self, inventory: &Inventory) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for (name, item) in inventory {
            sqlx::query(UPSERT_ITEM)
                .bind(name)
                .bind(Json(*item))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn upsert(&self, name: &str, item: &InventoryItem) -> Result<(), StoreError> {
        sqlx::query(UPSERT_ITEM)
            .bind(name)
            .bind(Json(*item))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_headline(&self) -> Result<String, StoreError> {
        let headline: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
                .bind(HEADLINE_KEY)
                .fetch_optional(&self.pool)
                .await?;

        Ok(headline.unwrap_or_else(|| DEFAULT_HEADLINE.to_string()))
    }

    pub async fn set_headline(&self, headline: &str) -> Result<(), StoreError> {
        sqlx::query(UPSERT_SETTING)
            .bind(HEADLINE_KEY)
            .bind(headline)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
