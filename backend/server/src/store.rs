//! # Store
//!
//! Flavor name to [`InventoryItem`] documents plus the headline setting.
//!
//! Two backends behind one enum, picked at startup:
//! - [`FileStore`]: one JSON file for the inventory, one for settings
//! - [`PgStore`]: `inventory` and `settings` tables in Postgres
//!
//! ## Saving
//! - `set` takes the whole map. The file store replaces the file, so flavors missing
//!   from the map are gone. Postgres upserts each key and leaves the rest alone.
//! - `upsert` writes a single flavor, which is what the staff client uses.
//!
//! Neither backend versions documents. Two whole-map saves built from stale
//! snapshots still lose whichever write landed first.
//!
//! ## Failures
//! A missing inventory file reads as an empty map. Anything else that goes wrong is a
//! [`StoreError`], so callers can tell "no data yet" from "store unavailable".
use std::io;

use stock::{Inventory, InventoryItem};
use thiserror::Error;
use tracing::info;

use crate::{config::Config, database::PgStore, file::FileStore};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Corrupt document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub enum Store {
    File(FileStore),
    Postgres(PgStore),
}

impl Store {
    pub async fn open(config: &Config) -> Result<Self, StoreError> {
        let store = match &config.database_url {
            Some(url) => Store::Postgres(PgStore::connect(url).await?),
            None => Store::File(FileStore::new(&config.db_path, &config.settings_path)),
        };

        info!("Using {}", store.describe());
        Ok(store)
    }

    pub fn describe(&self) -> String {
        match self {
            Store::File(store) => format!("file store at {}", store.path().display()),
            Store::Postgres(_) => "postgres store".to_string(),
        }
    }

    pub async fn get(&self) -> Result<Inventory, StoreError> {
        match self {
            Store::File(store) => store.get().await,
            Store::Postgres(store) => store.get().await,
        }
    }

    pub async fn set(&self, inventory: &Inventory) -> Result<(), StoreError> {
        match self {
            Store::File(store) => store.set(inventory).await,
            Store::Postgres(store) => store.set(inventory).await,
        }
    }

    pub async fn upsert(&self, name: &str, item: &InventoryItem) -> Result<(), StoreError> {
        match self {
            Store::File(store) => store.upsert(name, item).await,
            Store::Postgres(store) => store.upsert(name, item).await,
        }
    }

    pub async fn get_headline(&self) -> Result<String, StoreError> {
        match self {
            Store::File(store) => store.get_headline().await,
            Store::Postgres(store) => store.get_headline().await,
        }
    }

    pub async fn set_headline(&self, headline: &str) -> Result<(), StoreError> {
        match self {
            Store::File(store) => store.set_headline(headline).await,
            Store::Postgres(store) => store.set_headline(headline).await,
        }
    }

    /// Fills an empty store with flavors in setup. Returns how many were added.
    pub async fn seed(&self, flavors: &[String]) -> Result<usize, StoreError> {
        if flavors.is_empty() || !self.get().await?.is_empty() {
            return Ok(0);
        }

        let inventory: Inventory = flavors
            .iter()
            .map(|name| (name.clone(), InventoryItem::default()))
            .collect();

        self.set(&inventory).await?;
        info!("Seeded {} flavors", inventory.len());

        Ok(inventory.len())
    }
}
