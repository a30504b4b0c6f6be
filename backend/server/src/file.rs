use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use stock::{DEFAULT_HEADLINE, Inventory, InventoryItem};
use tokio::{fs, sync::Mutex};

use crate::store::StoreError;

#[derive(Default, Serialize, Deserialize)]
struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    headline: Option<String>,
}

pub struct FileStore {
    path: PathBuf,
    settings_path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    writer: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, settings_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings_path: settings_path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self) -> Result<Inventory, StoreError> {
        read_json(&self.path).await
    }

    pub async fn set(&self, inventory: &Inventory) -> Result<(), StoreError> {
        let _guard = self.writer.lock().await;

        write_json(&self.path, inventory).await
    }

    pub async fn upsert(&self, name: &str, item: &InventoryItem) -> Result<(), StoreError> {
        let _guard = self.writer.lock().await;

        let mut inventory: Inventory = read_json(&self.path).await?;
        inventory.insert(name.to_string(), *item);

        write_json(&self.path, &inventory).await
    }

    pub async fn get_headline(&self) -> Result<String, StoreError> {
        let settings: Settings = read_json(&self.settings_path).await?;

        Ok(settings
            .headline
            .unwrap_or_else(|| DEFAULT_HEADLINE.to_string()))
    }

    pub async fn set_headline(&self, headline: &str) -> Result<(), StoreError> {
        let _guard = self.writer.lock().await;

        let mut settings: Settings = read_json(&self.settings_path).await?;
        settings.headline = Some(headline.to_string());

        write_json(&self.settings_path, &settings).await
    }
}

async fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

/// Writes a sibling temp file, then renames it over the target.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)?;

    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    fs::write(&temp, bytes).await?;
    fs::rename(&temp, path).await?;

    Ok(())
}
