//! Pooled Redis connections for feed event fan-out.

use deadpool_redis::{Config, Pool, Runtime};

#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    /// `redis://[user:password@]host:port[/db]`
    pub url: String,
    pub max_connections: usize,
}

impl Default for RedisPoolConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            max_connections: 16,
        }
    }
}

impl From<&discover_common::RedisConfig> for RedisPoolConfig {
    fn from(config: &discover_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections as usize,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("invalid Redis pool settings: {0}")]
    Build(String),

    #[error("no Redis connection available: {0}")]
    Checkout(#[from] deadpool_redis::PoolError),

    #[error("Redis command failed: {0}")]
    Command(#[from] redis::RedisError),

    #[error("event encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type RedisResult<T> = Result<T, RedisPoolError>;

/// Connections are opened lazily on first checkout
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
    endpoint: String,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisPool")
            .field("endpoint", &self.endpoint)
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

impl RedisPool {
    pub fn new(config: RedisPoolConfig) -> RedisResult<Self> {
        let build_error = |e: &dyn std::fmt::Display| RedisPoolError::Build(e.to_string());
        let pool = Config::from_url(&config.url)
            .builder()
            .map_err(|e| build_error(&e))?
            .max_size(config.max_connections.max(1))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| build_error(&e))?;

        let endpoint = redacted_endpoint(&config.url);
        tracing::info!(
            endpoint = %endpoint,
            max_connections = config.max_connections,
            "Redis pool ready for feed events"
        );

        Ok(Self { pool, endpoint })
    }

    pub fn from_config(config: &discover_common::RedisConfig) -> RedisResult<Self> {
        Self::new(RedisPoolConfig::from(config))
    }

    /// Host part of the URL, without credentials
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn get(&self) -> RedisResult<deadpool_redis::Connection> {
        Ok(self.pool.get().await?)
    }

    /// Round trip used by the readiness probe
    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.get().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}

fn redacted_endpoint(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.rsplit_once('@')
        .map_or(rest, |(_, host)| host)
        .to_string()
}
