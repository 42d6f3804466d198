use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

fn default_cors_max_age() -> u64 {
    3600
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued bearer tokens.
    pub token_ttl_hours: i64,
}

/// Slack OAuth v2 client settings used for member login.
#[derive(Debug, Deserialize, Clone)]
pub struct SlackConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Comma-separated user scopes requested on the authorize page.
    pub user_scopes: String,
    pub authorize_endpoint: String,
    pub token_endpoint: String,
}

/// Administrator account provisioned at startup when absent.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub slack: SlackConfig,
    pub admin: Option<AdminConfig>,
}

impl AppConfig {
    /// Load configuration. Fails when the JWT secret or any Slack
    /// credential is missing.
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite://prompthub.db?mode=rwc")?
            .set_default("database.max_connections", 20)?
            .set_default("auth.token_ttl_hours", 24 * 7)?
            .set_default("slack.user_scopes", "identity.basic,identity.email")?
            .set_default(
                "slack.authorize_endpoint",
                "https://slack.com/oauth/v2/authorize",
            )?
            .set_default("slack.token_endpoint", "https://slack.com/api/oauth.v2.access")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., PROMPTHUB__SLACK__CLIENT_ID)
            .add_source(Environment::with_prefix("PROMPTHUB").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
