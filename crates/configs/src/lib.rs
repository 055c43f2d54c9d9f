//! # configs
//!
//! Layered runtime configuration for LumiRead binaries.
//!
//! Sources, in ascending precedence:
//! 1. `config/default.toml` (optional, checked into the repo for dev)
//! 2. `LUMIREAD__*` environment variables, `__` as the section separator
//!    (e.g. `LUMIREAD__HTTP__PORT=8080`, `LUMIREAD__AUTH__JWT_SECRET=...`)
//!
//! `Settings::load` also reads a `.env` file first, so local overrides can
//! live next to the checkout without touching the shell.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub media: MediaSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "defaults::host")]
    pub host: String,
    #[serde(default = "defaults::port")]
    pub port: u16,
    /// Upper bound for multipart post bodies (image uploads)
    #[serde(default = "defaults::max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Exact origin to allow, or "*" for any
    #[serde(default = "defaults::cors_allow_origin")]
    pub cors_allow_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "defaults::database_url")]
    pub url: SecretString,
    #[serde(default = "defaults::max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "defaults::jwt_secret")]
    pub jwt_secret: SecretString,
    /// Bearer token lifetime; the stock client refreshes weekly
    #[serde(default = "defaults::token_ttl_hours")]
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    /// Root directory for stored post images
    #[serde(default = "defaults::media_root")]
    pub root_dir: String,
    /// URL prefix under which the router serves stored media
    #[serde(default = "defaults::media_url_prefix")]
    pub url_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// tracing-subscriber EnvFilter directive, e.g. "info,sqlx=warn"
    #[serde(default = "defaults::log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            max_upload_bytes: defaults::max_upload_bytes(),
            cors_allow_origin: defaults::cors_allow_origin(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: defaults::database_url(),
            max_connections: defaults::max_connections(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: defaults::jwt_secret(),
            token_ttl_hours: defaults::token_ttl_hours(),
        }
    }
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            root_dir: defaults::media_root(),
            url_prefix: defaults::media_url_prefix(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: defaults::log_filter(),
            json: false,
        }
    }
}

impl Settings {
    /// Loads `.env`, then the layered configuration sources.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("LUMIREAD").separator("__"))
            .build()?;

        let settings: Settings = cfg.try_deserialize()?;

        if settings.auth.jwt_secret_is_default() {
            tracing::warn!(
                "auth.jwt_secret is the built-in development value; set LUMIREAD__AUTH__JWT_SECRET in production"
            );
        }

        Ok(settings)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}

impl AuthSettings {
    fn jwt_secret_is_default(&self) -> bool {
        use secrecy::ExposeSecret;
        self.jwt_secret.expose_secret() == defaults::DEV_JWT_SECRET
    }
}

mod defaults {
    use secrecy::SecretString;

    pub const DEV_JWT_SECRET: &str = "lumiread-dev-secret";

    pub fn host() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5000
    }

    pub fn max_upload_bytes() -> usize {
        5 * 1024 * 1024
    }

    pub fn cors_allow_origin() -> String {
        "*".into()
    }

    pub fn database_url() -> SecretString {
        SecretString::from("postgres://localhost/lumiread")
    }

    pub fn max_connections() -> u32 {
        5
    }

    pub fn jwt_secret() -> SecretString {
        SecretString::from(DEV_JWT_SECRET)
    }

    pub fn token_ttl_hours() -> i64 {
        // seven days, matching the web client's session expectations
        24 * 7
    }

    pub fn media_root() -> String {
        "data/media".into()
    }

    pub fn media_url_prefix() -> String {
        "/static/media".into()
    }

    pub fn log_filter() -> String {
        "info".into()
    }
}
