//! Configuration structs

mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    FeedConfig, GlobeConfig, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig,
    SnowflakeConfig, StorageConfig, DEFAULT_ADMIN_EMAIL, MEMORY_DATABASE_URL,
};
