use crate::config::Config;
use crate::render::{HtmlPages, Renderer};
use crate::services::{
    CardRenderer, DisabledPayments, FsPictureStore, NoCards, Payments, PictureStore,
    SharedSecretPayments,
};
use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub renderer: Arc<dyn Renderer>,
    pub payments: Arc<dyn Payments>,
    pub pictures: Arc<dyn PictureStore>,
    pub cards: Arc<dyn CardRenderer>,
}

impl AppState {
    /// Wires the default collaborators: built-in maud renderer, filesystem
    /// picture store, no card imaging, and payments driven by the config
    /// (disabled unless a checkout URL and webhook secret are present).
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let payments: Arc<dyn Payments> =
            match (&config.checkout_url, &config.webhook_secret) {
                (Some(checkout_url), Some(secret)) => Arc::new(SharedSecretPayments {
                    checkout_url: checkout_url.clone(),
                    secret: secret.clone(),
                }),
                _ => Arc::new(DisabledPayments),
            };

        let pictures = Arc::new(FsPictureStore {
            root: PathBuf::from(&config.upload_dir),
        });

        Self {
            pool,
            config,
            renderer: Arc::new(HtmlPages),
            payments,
            pictures,
            cards: Arc::new(NoCards),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
