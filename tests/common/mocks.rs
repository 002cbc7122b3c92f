use async_trait::async_trait;
use db_load_health::cache::{CacheError, CacheResult};
use db_load_health::{CacheStore, HealthConnection, HealthError, HealthModel, HealthResult, ModelKey};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Connection reporting a fixed session count, or failing every statement
pub struct MockConnection {
    engine: &'static str,
    identity: String,
    active_session_count: i64,
    should_fail: bool,
    should_hang: bool,
    queries: AtomicUsize,
    statements: Mutex<Vec<String>>,
}

impl MockConnection {
    pub fn new(identity: &str) -> Self {
        Self {
            engine: "PostgreSQL",
            identity: identity.to_string(),
            active_session_count: 0,
            should_fail: false,
            should_hang: false,
            queries: AtomicUsize::new(0),
            statements: Mutex::new(Vec::new()),
        }
    }

    pub fn with_active_sessions(mut self, count: i64) -> Self {
        self.active_session_count = count;
        self
    }

    pub fn failing(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Session count queries never complete
    pub fn hanging(mut self) -> Self {
        self.should_hang = true;
        self
    }

    pub fn with_engine(mut self, engine: &'static str) -> Self {
        self.engine = engine;
        self
    }

    /// Number of session count queries issued
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().clone()
    }

    fn record(&self, sql: &str) -> HealthResult<()> {
        self.statements.lock().push(sql.to_string());
        if self.should_fail {
            return Err(HealthError::Query("Connection failed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl HealthConnection for MockConnection {
    fn engine_name(&self) -> &str {
        self.engine
    }

    fn database_identity(&self) -> &str {
        &self.identity
    }

    async fn select_count(&self, sql: &str) -> HealthResult<i64> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.record(sql)?;
        if self.should_hang {
            std::future::pending::<()>().await;
        }
        Ok(self.active_session_count)
    }

    async fn select_text(&self, sql: &str) -> HealthResult<Option<String>> {
        self.record(sql)?;
        Ok(Some("8.0.35".to_string()))
    }

    async fn select_count_scoped(&self, setting: &str, sql: &str) -> HealthResult<i64> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.record(setting)?;
        self.record(sql)?;
        if self.should_hang {
            std::future::pending::<()>().await;
        }
        Ok(self.active_session_count)
    }
}

/// Model bound to a mock connection
pub struct MockModel {
    key: ModelKey,
    pub connection: MockConnection,
}

impl MockModel {
    pub fn new(identity: &str) -> Self {
        Self::with_connection(MockConnection::new(identity))
    }

    pub fn with_connection(connection: MockConnection) -> Self {
        Self {
            key: ModelKey::base(),
            connection,
        }
    }

    pub fn keyed(mut self, key: ModelKey) -> Self {
        self.key = key;
        self
    }
}

impl HealthModel for MockModel {
    fn model_key(&self) -> ModelKey {
        self.key.clone()
    }

    fn connection(&self) -> &dyn HealthConnection {
        &self.connection
    }
}

/// Cache whose every operation fails
pub struct FailingCache;

#[async_trait]
impl CacheStore for FailingCache {
    async fn read(&self, _key: &str) -> CacheResult<Option<f64>> {
        Err(CacheError::ConnectionError("Cache connection failed".to_string()))
    }

    async fn write(&self, _key: &str, _value: f64, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::ConnectionError("Cache connection failed".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "failing"
    }
}

/// Cache that reads fine but fails every write
pub struct ReadOnlyCache;

#[async_trait]
impl CacheStore for ReadOnlyCache {
    async fn read(&self, _key: &str) -> CacheResult<Option<f64>> {
        Ok(None)
    }

    async fn write(&self, _key: &str, _value: f64, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::BackendError("READONLY".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "read-only"
    }
}
