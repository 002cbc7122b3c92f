//! Connection Port
//!
//! The minimal surface the probe needs from a live database connection:
//! an engine name for adapter selection, a stable database identity for cache
//! keys, scalar queries, and a transaction-scoped variant for session settings
//! that must not outlive the probe.

use crate::error::HealthResult;
use async_trait::async_trait;

#[cfg(feature = "mysql")]
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
#[cfg(feature = "postgres")]
use sqlx::postgres::{PgPool, PgPoolOptions};
#[cfg(any(feature = "postgres", feature = "mysql"))]
use {crate::constants::QUERY_TIMEOUT_BACKSTOP, sqlx::Executor, std::time::Duration, tracing::debug};

/// A live connection (or pool) the probe can sample
#[async_trait]
pub trait HealthConnection: Send + Sync {
    /// Engine name as reported by the driver, e.g. `"PostgreSQL"`
    fn engine_name(&self) -> &str;

    /// Stable name of the database behind this connection, e.g. `"primary"`
    fn database_identity(&self) -> &str;

    /// Run `sql` and return its single integer result
    async fn select_count(&self, sql: &str) -> HealthResult<i64>;

    /// Run `sql` and return its single text result
    async fn select_text(&self, sql: &str) -> HealthResult<Option<String>>;

    /// Run `setting` then `sql` inside one transaction and return the
    /// integer result; the setting ends with the transaction
    async fn select_count_scoped(&self, setting: &str, sql: &str) -> HealthResult<i64>;
}

#[cfg(any(feature = "postgres", feature = "mysql"))]
/// Pool options shared by the bundled connections: small, and never waiting
/// longer for a connection than the probe is allowed to take
fn probe_pool_limits() -> (u32, Duration) {
    (2, QUERY_TIMEOUT_BACKSTOP)
}

/// PostgreSQL connection backed by a `sqlx` pool
#[cfg(feature = "postgres")]
#[derive(Debug, Clone)]
pub struct PgHealthConnection {
    pool: PgPool,
    identity: String,
}

#[cfg(feature = "postgres")]
impl PgHealthConnection {
    pub fn new(pool: PgPool, identity: impl Into<String>) -> Self {
        Self {
            pool,
            identity: identity.into(),
        }
    }

    /// Open a dedicated probe pool
    pub async fn connect(url: &str, identity: impl Into<String>) -> HealthResult<Self> {
        let (max_connections, acquire_timeout) = probe_pool_limits();
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;
        Ok(Self::new(pool, identity))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(feature = "postgres")]
#[async_trait]
impl HealthConnection for PgHealthConnection {
    fn engine_name(&self) -> &str {
        "PostgreSQL"
    }

    fn database_identity(&self) -> &str {
        &self.identity
    }

    async fn select_count(&self, sql: &str) -> HealthResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn select_text(&self, sql: &str) -> HealthResult<Option<String>> {
        Ok(sqlx::query_scalar::<_, Option<String>>(sql)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn select_count_scoped(&self, setting: &str, sql: &str) -> HealthResult<i64> {
        let mut tx = self.pool.begin().await?;
        (&mut *tx).execute(setting).await?;
        let count = sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(database = %self.identity, count, "Scoped count query completed");
        Ok(count)
    }
}

/// MySQL-family connection backed by a `sqlx` pool
#[cfg(feature = "mysql")]
#[derive(Debug, Clone)]
pub struct MySqlHealthConnection {
    pool: MySqlPool,
    identity: String,
}

#[cfg(feature = "mysql")]
impl MySqlHealthConnection {
    pub fn new(pool: MySqlPool, identity: impl Into<String>) -> Self {
        Self {
            pool,
            identity: identity.into(),
        }
    }

    /// Open a dedicated probe pool
    pub async fn connect(url: &str, identity: impl Into<String>) -> HealthResult<Self> {
        let (max_connections, acquire_timeout) = probe_pool_limits();
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;
        Ok(Self::new(pool, identity))
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[cfg(feature = "mysql")]
#[async_trait]
impl HealthConnection for MySqlHealthConnection {
    fn engine_name(&self) -> &str {
        "MySQL"
    }

    fn database_identity(&self) -> &str {
        &self.identity
    }

    async fn select_count(&self, sql: &str) -> HealthResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn select_text(&self, sql: &str) -> HealthResult<Option<String>> {
        Ok(sqlx::query_scalar::<_, Option<String>>(sql)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn select_count_scoped(&self, setting: &str, sql: &str) -> HealthResult<i64> {
        let mut tx = self.pool.begin().await?;
        (&mut *tx).execute(setting).await?;
        let count = sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(database = %self.identity, count, "Scoped count query completed");
        Ok(count)
    }
}
