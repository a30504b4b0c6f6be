use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use stock::{DEFAULT_FLAVORS, GoalBasis};
use tracing::{info, warn};

use crate::error::AppError;

pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub db_path: PathBuf,
    pub settings_path: PathBuf,
    pub static_dir: PathBuf,
    pub goal_basis: GoalBasis,
    pub seed_flavors: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            port: try_load("PORT", "3000")?,
            database_url: read_secret("DATABASE_URL"),
            db_path: try_load("DB_PATH", "db.json")?,
            settings_path: try_load("SETTINGS_PATH", "settings.json")?,
            static_dir: try_load("STATIC_DIR", "public")?,
            goal_basis: try_load("GOAL_BASIS", "max")?,
            seed_flavors: seed_flavors(),
        })
    }

    /// File-backed config rooted at `dir`, no seeding.
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();

        Self {
            port: 0,
            database_url: None,
            db_path: dir.join("db.json"),
            settings_path: dir.join("settings.json"),
            static_dir: dir.join("public"),
            goal_basis: GoalBasis::default(),
            seed_flavors: Vec::new(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            AppError::Config(format!("invalid {key}: {e}"))
        })
}

/// Environment first, then a mounted secret file.
fn read_secret(secret_name: &str) -> Option<String> {
    if let Ok(value) = env::var(secret_name) {
        return Some(value.trim().to_string()).filter(|value| !value.is_empty());
    }

    let path = format!("/run/secrets/{secret_name}");
    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|_| {
            info!("{secret_name} not set, using the file store");
        })
        .ok()
        .filter(|value| !value.is_empty())
}

fn seed_flavors() -> Vec<String> {
    match var("SEED_FLAVORS") {
        Ok(list) => parse_list(&list),
        Err(_) => DEFAULT_FLAVORS.iter().map(|name| name.to_string()).collect(),
    }
}

fn parse_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(stock::utils::sanitize)
        .filter(|name| !name.is_empty())
        .collect()
}
