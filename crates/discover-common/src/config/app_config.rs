//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// `DATABASE_URL` value that selects the in-memory backend
pub const MEMORY_DATABASE_URL: &str = "memory";

/// Admin identity used when `ADMIN_EMAIL` is not set
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@discover.local";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub snowflake: SnowflakeConfig,
    pub admin: AdminConfig,
    pub feed: FeedConfig,
    pub globe: GlobeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// True when the in-memory repositories should be used instead of PostgreSQL
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.url == MEMORY_DATABASE_URL
    }
}

/// Redis configuration (feed event publishing)
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds
    #[serde(default = "default_token_expiry")]
    pub token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Blob storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: u32,
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

impl StorageConfig {
    #[must_use]
    pub fn max_file_size_bytes(&self) -> u64 {
        u64::from(self.max_file_size_mb) * 1024 * 1024
    }
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// The single identity with moderation rights
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_email")]
    pub email: String,
}

/// Feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

/// Globe intro configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GlobeConfig {
    /// GeoJSON landmass outline; the globe renders without it when unset
    #[serde(default)]
    pub geojson_path: Option<String>,
    /// Hard fallback after which the intro overlay is hidden regardless
    #[serde(default = "default_fallback_ms")]
    pub fallback_ms: u64,
}

fn default_app_name() -> String {
    "discover-feed".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_token_expiry() -> i64 {
    86_400 // 1 day
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_max_file_size() -> u32 {
    10
}

fn default_bucket() -> String {
    "discover.appspot.com".to_string()
}

fn default_admin_email() -> String {
    DEFAULT_ADMIN_EMAIL.to_string()
}

fn default_page_size() -> usize {
    discover_core::FEED_PAGE_SIZE
}

fn default_fallback_ms() -> u64 {
    8_000
}

/// Parse an optional variable, failing on values that do not parse
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        _ => Ok(None),
    }
}

fn string_var(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let worker_id = parse_var::<u16>("WORKER_ID")?.unwrap_or(0);
        if worker_id >= 1024 {
            return Err(ConfigError::InvalidValue("WORKER_ID", worker_id.to_string()));
        }

        Ok(Self {
            app: AppSettings {
                name: string_var("APP_NAME").unwrap_or_else(default_app_name),
                env: string_var("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: string_var("API_HOST").unwrap_or_else(default_host),
                port: parse_var("API_PORT")?.ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: string_var("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            },
            redis: match string_var("REDIS_URL") {
                Some(url) => Some(RedisConfig {
                    url,
                    max_connections: parse_var("REDIS_MAX_CONNECTIONS")?
                        .unwrap_or_else(default_redis_max_connections),
                }),
                None => None,
            },
            jwt: JwtConfig {
                secret: string_var("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
                token_expiry: parse_var("JWT_TOKEN_EXPIRY")?.unwrap_or_else(default_token_expiry),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var("RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: parse_var("RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: string_var("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            storage: StorageConfig {
                upload_dir: string_var("UPLOAD_DIR").unwrap_or_else(default_upload_dir),
                max_file_size_mb: parse_var("MAX_FILE_SIZE_MB")?
                    .unwrap_or_else(default_max_file_size),
                bucket: string_var("STORAGE_BUCKET").unwrap_or_else(default_bucket),
            },
            snowflake: SnowflakeConfig { worker_id },
            admin: AdminConfig {
                email: string_var("ADMIN_EMAIL").unwrap_or_else(default_admin_email),
            },
            feed: FeedConfig {
                page_size: parse_var("FEED_PAGE_SIZE")?
                    .filter(|n: &usize| *n > 0)
                    .unwrap_or_else(default_page_size),
            },
            globe: GlobeConfig {
                geojson_path: string_var("GLOBE_GEOJSON_PATH"),
                fallback_ms: parse_var("GLOBE_FALLBACK_MS")?.unwrap_or_else(default_fallback_ms),
            },
        })
    }

    /// Configuration for the in-memory backend with every other setting at its default
    #[must_use]
    pub fn in_memory(jwt_secret: &str, upload_dir: &str) -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
            },
            api: ServerConfig {
                host: default_host(),
                port: 0,
            },
            database: DatabaseConfig {
                url: MEMORY_DATABASE_URL.to_string(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
            },
            redis: None,
            jwt: JwtConfig {
                secret: jwt_secret.to_string(),
                token_expiry: default_token_expiry(),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: 1_000,
                burst: 1_000,
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
            },
            storage: StorageConfig {
                upload_dir: upload_dir.to_string(),
                max_file_size_mb: default_max_file_size(),
                bucket: default_bucket(),
            },
            snowflake: SnowflakeConfig { worker_id: 0 },
            admin: AdminConfig {
                email: default_admin_email(),
            },
            feed: FeedConfig {
                page_size: default_page_size(),
            },
            globe: GlobeConfig {
                geojson_path: None,
                fallback_ms: default_fallback_ms(),
            },
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("PRODUCTION"), Some(Environment::Production));
        assert_eq!(Environment::parse("staging"), Some(Environment::Staging));
        assert_eq!(Environment::parse("qa"), None);
        assert!(Environment::Production.is_production());
        assert!(Environment::Development.is_development());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_in_memory_defaults() {
        let config = AppConfig::in_memory("secret", "/tmp/up");
        assert!(config.database.is_memory());
        assert!(config.redis.is_none());
        assert_eq!(config.admin.email, DEFAULT_ADMIN_EMAIL);
        assert_eq!(config.feed.page_size, 10);
        assert_eq!(config.storage.max_file_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.globe.fallback_ms, 8_000);
    }

    #[test]
    fn test_postgres_url_is_not_memory() {
        let db = DatabaseConfig {
            url: "postgres://localhost/discover".to_string(),
            max_connections: 1,
            min_connections: 1,
        };
        assert!(!db.is_memory());
    }
}
