use std::sync::Arc;

use tracing::warn;

use super::{config::Config, error::AppError, store::Store};

pub struct State {
    pub config: Config,
    pub store: Store,
}

impl State {
    pub async fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let store = Store::open(&config)
            .await
            .map_err(AppError::StoreUnavailable)?;

        // An unreadable store still serves, reads answer 503 until it is repaired.
        if let Err(e) = store.seed(&config.seed_flavors).await {
            warn!("Skipping seed, store unavailable: {e}");
        }

        Ok(Arc::new(Self { config, store }))
    }
}
