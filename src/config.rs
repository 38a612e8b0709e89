use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use validator::Validate;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_COMMISSION_PERCENT: u32 = 5;
const DEFAULT_SHIPPING_FEE_PER_SELLER: u32 = 20;
const DEFAULT_ORDER_PAYMENT_TIMEOUT_SECS: u64 = 600;
const DEFAULT_SCHEDULER_POLL_INTERVAL_SECS: u64 = 30;
const DEFAULT_CURRENCY: &str = "usd";
const DEV_DEFAULT_JWT_SECRET: &str =
    "this_is_a_development_secret_key_that_is_at_least_64_characters_long_for_testing";

/// Application configuration with validation.
///
/// Constructed once at process start (from `config/*.toml` plus `APP__*`
/// environment overrides) and injected into services; nothing reads the
/// process environment after startup.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// JWT signing secret (minimum 32 characters)
    #[validate(length(min = 32))]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: u64,

    /// JWT issuer claim
    #[serde(default = "default_auth_issuer")]
    pub auth_issuer: String,

    /// JWT audience claim
    #[serde(default = "default_auth_audience")]
    pub auth_audience: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment ("development", "production", "test")
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// Percentage the marketplace retains from each sale (0..=100)
    #[validate(range(max = 100))]
    #[serde(default = "default_commission_percent")]
    pub platform_commission_percent: u32,

    /// Flat shipping fee charged per distinct seller in a checkout
    #[serde(default = "default_shipping_fee_per_seller")]
    pub shipping_fee_per_seller: u32,

    /// Grace window after which an unpaid order is canceled
    #[serde(default = "default_order_payment_timeout_secs")]
    pub order_payment_timeout_secs: u64,

    /// How often the deferred-task worker polls for due tasks
    #[serde(default = "default_scheduler_poll_interval_secs")]
    pub scheduler_poll_interval_secs: u64,

    /// ISO currency code used for payment intents and transfers
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Payment processor API base URL
    #[serde(default = "default_payment_api_base")]
    pub payment_api_base: String,

    /// Payment processor secret key
    #[serde(default)]
    pub payment_secret_key: String,

    /// Redirect target when seller onboarding must be restarted
    #[serde(default)]
    pub payment_refresh_url: String,

    /// Redirect target after successful seller onboarding
    #[serde(default)]
    pub payment_return_url: String,

    /// Media storage endpoint used for image uploads
    #[serde(default)]
    pub media_endpoint: String,

    /// Media storage API key
    #[serde(default)]
    pub media_api_key: String,

    /// Comma-separated list of allowed CORS origins
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    #[serde(default)]
    pub cors_allow_credentials: bool,
}

fn default_jwt_expiration() -> u64 {
    60 * 60 * 24
}
fn default_auth_issuer() -> String {
    "vendora-api".to_string()
}
fn default_auth_audience() -> String {
    "vendora-clients".to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_commission_percent() -> u32 {
    DEFAULT_COMMISSION_PERCENT
}
fn default_shipping_fee_per_seller() -> u32 {
    DEFAULT_SHIPPING_FEE_PER_SELLER
}
fn default_order_payment_timeout_secs() -> u64 {
    DEFAULT_ORDER_PAYMENT_TIMEOUT_SECS
}
fn default_scheduler_poll_interval_secs() -> u64 {
    DEFAULT_SCHEDULER_POLL_INTERVAL_SECS
}
fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}
fn default_payment_api_base() -> String {
    "https://api.stripe.com".to_string()
}

impl AppConfig {
    /// Minimal constructor used by tests and tooling.
    pub fn new(
        database_url: String,
        jwt_secret: String,
        host: String,
        port: u16,
        environment: String,
    ) -> Self {
        Self {
            database_url,
            jwt_secret,
            jwt_expiration: default_jwt_expiration(),
            auth_issuer: default_auth_issuer(),
            auth_audience: default_auth_audience(),
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            platform_commission_percent: default_commission_percent(),
            shipping_fee_per_seller: default_shipping_fee_per_seller(),
            order_payment_timeout_secs: default_order_payment_timeout_secs(),
            scheduler_poll_interval_secs: default_scheduler_poll_interval_secs(),
            currency: default_currency(),
            payment_api_base: default_payment_api_base(),
            payment_secret_key: String::new(),
            payment_refresh_url: String::new(),
            payment_return_url: String::new(),
            media_endpoint: String::new(),
            media_api_key: String::new(),
            cors_allowed_origins: None,
            cors_allow_credentials: false,
        }
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development" || self.environment == "test"
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Load configuration from `config/default.toml`, an environment-specific
/// overlay, and `APP__*` environment variables (in increasing precedence).
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let mut builder = Config::builder()
        .set_default("environment", run_env.clone())?
        .set_default("jwt_secret", DEV_DEFAULT_JWT_SECRET)?
        .set_default("database_url", "sqlite://vendora.db?mode=rwc")?;

    let default_file = Path::new(CONFIG_DIR).join("default");
    let env_file = Path::new(CONFIG_DIR).join(&run_env);
    builder = builder
        .add_source(File::from(default_file).required(false))
        .add_source(File::from(env_file).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"));

    let cfg: AppConfig = builder.build()?.try_deserialize()?;
    cfg.validate()?;

    info!(environment = %cfg.environment, "Configuration loaded");
    Ok(cfg)
}

/// Initialize the global tracing subscriber.
pub fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_jwt_secret_is_rejected() {
        let cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "short".into(),
            "127.0.0.1".into(),
            8080,
            "test".into(),
        );
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn defaults_match_marketplace_policy() {
        let cfg = AppConfig::new(
            "sqlite::memory:".into(),
            DEV_DEFAULT_JWT_SECRET.into(),
            "127.0.0.1".into(),
            8080,
            "test".into(),
        );
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.platform_commission_percent, 5);
        assert_eq!(cfg.shipping_fee_per_seller, 20);
        assert_eq!(cfg.order_payment_timeout_secs, 600);
    }
}
