//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use discover_cache::{RedisEventPublisher, RedisPool};
use discover_common::{AppConfig, AppError, JwtService};
use discover_core::{SnowflakeGenerator, UserKey};
use discover_db::{create_pool, run_migrations, LocalBlobStore, MemoryDatabase, PoolConfig};
use discover_globe::{load_outline, GLOBE_RADIUS};
use discover_service::{ServiceContextBuilder, SessionRegistry};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Feed sessions idle this long are dropped
const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const SESSION_REAP_INTERVAL: Duration = Duration::from_secs(60);

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(config.storage.max_file_size_bytes()),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    Ok(health_routes().merge(api).with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let mut builder = ServiceContextBuilder::new();

    if config.database.is_memory() {
        warn!("Using the in-memory database; nothing will be persisted");
        builder = builder.memory(Arc::new(MemoryDatabase::new()));
    } else {
        info!("Connecting to PostgreSQL...");
        let pool = create_pool(&PoolConfig::from(&config.database))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        info!("PostgreSQL connection established");
        builder = builder.postgres(pool);
    }

    if let Some(redis) = &config.redis {
        info!("Connecting to Redis...");
        let redis_pool = RedisPool::from_config(redis).map_err(|e| AppError::Cache(e.to_string()))?;
        builder = builder
            .publisher(Arc::new(RedisEventPublisher::new(redis_pool.clone())))
            .redis_pool(redis_pool);
        info!("Redis event publishing enabled");
    }

    let admin = UserKey::parse(&config.admin.email)
        .map_err(|e| AppError::Config(format!("ADMIN_EMAIL: {e}")))?;

    let service_context = builder
        .blob_store(Arc::new(LocalBlobStore::new(
            &config.storage.upload_dir,
            config.storage.bucket.clone(),
            config.storage.max_file_size_bytes(),
        )))
        .jwt_service(Arc::new(JwtService::new(
            &config.jwt.secret,
            config.jwt.token_expiry,
        )))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .admin(admin)
        .page_size(config.feed.page_size)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let geojson_path = config.globe.geojson_path.clone();
    let mut state = AppState::new(service_context, config);

    // A broken outline only costs the landmass lines
    if let Some(path) = geojson_path {
        match load_outline(Path::new(&path), GLOBE_RADIUS).await {
            Ok(outline) => {
                info!(path = %path, points = outline.point_count(), "Globe outline loaded");
                state = state.with_globe_outline(outline);
            }
            Err(e) => warn!(path = %path, error = %e, "Globe outline unavailable"),
        }
    }

    Ok(state)
}

/// Periodically drop idle feed sessions
pub fn spawn_session_reaper(sessions: Arc<SessionRegistry>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_REAP_INTERVAL);
        loop {
            ticker.tick().await;
            let max_idle = chrono::Duration::from_std(SESSION_IDLE_TIMEOUT)
                .unwrap_or_else(|_| chrono::Duration::minutes(30));
            sessions.evict_idle(max_idle);
        }
    })
}

/// Serve `app` on an already bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    serve(listener, app).await
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address: {e}")))?;

    let state = create_app_state(config).await?;
    let reaper = spawn_session_reaper(state.sessions().clone());

    let app = create_app(state)?;
    let result = run_server(app, addr).await;

    reaper.abort();
    result
}
