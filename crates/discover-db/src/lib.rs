//! # discover-db
//!
//! Persistence for the discover feed.
//!
//! - PostgreSQL repositories (SQLx) for every repository trait in `discover-core`
//! - the schema, applied at startup by [`run_migrations`]
//! - [`MemoryDatabase`], an in-memory implementation of the same traits
//! - [`LocalBlobStore`], a filesystem [`BlobStore`](discover_core::BlobStore)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use discover_db::{create_pool, run_migrations, PgBlockRepository, PoolConfig};
//!
//! let pool = create_pool(&PoolConfig::from(&config.database)).await?;
//! run_migrations(&pool).await?;
//! let blocks = PgBlockRepository::new(pool.clone());
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod storage;

// Re-export commonly used types
pub use memory::MemoryDatabase;
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgBlockRepository, PgCollabPostRepository, PgCommentRepository, PgNotificationRepository,
    PgProfileRepository, PgVoteRepository,
};
pub use storage::LocalBlobStore;
