// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Immutable process configuration, constructed once at startup and passed
/// explicitly through `AppState` to every component that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,

    /// Apex domain, e.g. `example.com`. A request for `alice.example.com`
    /// resolves the tenant `alice`; any other hostname resolves no tenant.
    pub domain: String,

    /// Canonical origin of the main site, e.g. `https://example.com`.
    pub web_origin: String,

    pub rust_log: String,

    /// Directory profile pictures are stored under, one subdirectory per account.
    pub upload_dir: String,

    /// Checkout entry point of the payment collaborator. Activation is
    /// disabled when unset.
    pub checkout_url: Option<String>,

    /// Shared secret the payment collaborator signs webhook calls with.
    pub webhook_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let domain = env::var("DOMAIN").expect("DOMAIN must be set");

        let web_origin = env::var("WEB_ORIGIN").expect("WEB_ORIGIN must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        let checkout_url = env::var("CHECKOUT_URL").ok();

        let webhook_secret = env::var("WEBHOOK_SECRET").ok();

        Self {
            database_url,
            domain,
            web_origin,
            rust_log,
            upload_dir,
            checkout_url,
            webhook_secret,
        }
    }
}
