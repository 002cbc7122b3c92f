//! Database adapters
//!
//! One variant per supported engine family. An adapter knows two things: the
//! dialect's "count active client sessions" query, and how to make the server
//! abort that query if it runs longer than the probe allows.
//!
//! | Engine      | Session count source                 | Time limit                                  |
//! |-------------|--------------------------------------|---------------------------------------------|
//! | PostgreSQL  | `pg_stat_activity`                   | `SET LOCAL statement_timeout` in a transaction |
//! | MySQL 8.0.22+ | `performance_schema.processlist`   | `MAX_EXECUTION_TIME` optimizer hint         |
//! | MySQL 5.7   | `information_schema.processlist`     | `MAX_EXECUTION_TIME` optimizer hint         |
//! | MariaDB     | `information_schema.processlist`     | `SET STATEMENT max_statement_time ... FOR`  |
//!
//! Adapters are cheap and stateless apart from the MySQL server version, and
//! are built fresh for every probe.

use super::connection::HealthConnection;
use crate::error::{HealthError, HealthResult};
use std::fmt;
use std::time::Duration;
use tracing::debug;

const POSTGRESQL_ACTIVE_SESSIONS: &str = "\
SELECT count(*)
FROM pg_stat_activity
WHERE state = 'active'
  AND backend_type = 'client backend'
  AND pid != pg_backend_pid()";

const MYSQL_PERFORMANCE_SCHEMA_ACTIVE_SESSIONS: &str = "\
SELECT COUNT(*)
FROM performance_schema.processlist
WHERE COMMAND NOT IN ('Sleep', 'Daemon', 'Binlog Dump', 'Binlog Dump GTID')
  AND USER NOT IN ('event_scheduler', 'system user')
  AND ID != CONNECTION_ID()";

const MYSQL_INFORMATION_SCHEMA_ACTIVE_SESSIONS: &str = "\
SELECT COUNT(*)
FROM information_schema.processlist
WHERE COMMAND NOT IN ('Sleep', 'Daemon', 'Binlog Dump', 'Binlog Dump GTID')
  AND USER NOT IN ('event_scheduler', 'system user')
  AND ID != CONNECTION_ID()";

const MYSQL_VERSION_QUERY: &str = "SELECT VERSION()";

/// Supported engine families, selected from a driver's reported engine name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseEngine {
    PostgreSql,
    MySql,
}

impl DatabaseEngine {
    /// Map a reported engine name to a family
    ///
    /// Matching is a case-insensitive substring match, so driver-specific
    /// names such as `"PostGIS"` or `"Mysql2"` resolve too.
    pub fn from_engine_name(name: &str) -> HealthResult<Self> {
        let lowered = name.to_ascii_lowercase();

        if lowered.contains("postgres") || lowered.contains("postgis") {
            Ok(Self::PostgreSql)
        } else if lowered.contains("mysql")
            || lowered.contains("mariadb")
            || lowered.contains("trilogy")
        {
            Ok(Self::MySql)
        } else {
            Err(HealthError::UnsupportedAdapter {
                engine: name.to_string(),
            })
        }
    }
}

impl fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PostgreSql => write!(f, "PostgreSQL"),
            Self::MySql => write!(f, "MySQL"),
        }
    }
}

/// MySQL-family server flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MySqlFlavor {
    MySql,
    MariaDb,
}

/// Dialect details of one MySQL-family server, derived from `SELECT VERSION()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlDialect {
    version: String,
    flavor: MySqlFlavor,
    release: (u32, u32, u32),
}

impl MySqlDialect {
    /// Parse a server version string such as `8.0.35`, `5.7.44-log` or
    /// `10.11.6-MariaDB`
    pub fn parse(version: &str) -> HealthResult<Self> {
        let flavor = if version.to_ascii_lowercase().contains("mariadb") {
            MySqlFlavor::MariaDb
        } else {
            MySqlFlavor::MySql
        };

        let numeric: &str = version
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .next()
            .unwrap_or_default();
        let mut parts = numeric.split('.').map(|part| part.parse::<u32>().ok());
        let major = parts.next().flatten().ok_or_else(|| {
            HealthError::Query(format!("unrecognized MySQL server version: {version:?}"))
        })?;
        let minor = parts.next().flatten().unwrap_or(0);
        let patch = parts.next().flatten().unwrap_or(0);

        let dialect = Self {
            version: version.to_string(),
            flavor,
            release: (major, minor, patch),
        };

        // MAX_EXECUTION_TIME arrived in 5.7.8; without it the server cannot
        // bound the probe.
        if flavor == MySqlFlavor::MySql && dialect.release < (5, 7, 8) {
            return Err(HealthError::UnsupportedAdapter {
                engine: format!("MySQL {version} (statement time limits need 5.7.8+)"),
            });
        }

        Ok(dialect)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn flavor(&self) -> MySqlFlavor {
        self.flavor
    }

    fn has_performance_schema_processlist(&self) -> bool {
        self.flavor == MySqlFlavor::MySql && self.release >= (8, 0, 22)
    }
}

/// Engine adapter used for one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseAdapter {
    PostgreSql,
    MySql(MySqlDialect),
}

impl DatabaseAdapter {
    /// Resolve the adapter for a live connection
    ///
    /// MySQL-family servers are asked for their version so the dialect can
    /// vary. Unknown engines fail with [`HealthError::UnsupportedAdapter`].
    pub async fn build(connection: &dyn HealthConnection) -> HealthResult<Self> {
        let adapter = match DatabaseEngine::from_engine_name(connection.engine_name())? {
            DatabaseEngine::PostgreSql => Self::PostgreSql,
            DatabaseEngine::MySql => {
                let version = connection
                    .select_text(MYSQL_VERSION_QUERY)
                    .await?
                    .ok_or_else(|| HealthError::Query("SELECT VERSION() returned NULL".into()))?;
                Self::MySql(MySqlDialect::parse(&version)?)
            }
        };

        debug!(
            engine = connection.engine_name(),
            database = connection.database_identity(),
            adapter = ?adapter,
            "Database adapter resolved"
        );
        Ok(adapter)
    }

    pub fn engine(&self) -> DatabaseEngine {
        match self {
            Self::PostgreSql => DatabaseEngine::PostgreSql,
            Self::MySql(_) => DatabaseEngine::MySql,
        }
    }

    /// Count of sessions currently executing, excluding the probe's own
    pub fn active_session_count_query(&self) -> &'static str {
        match self {
            Self::PostgreSql => POSTGRESQL_ACTIVE_SESSIONS,
            Self::MySql(dialect) if dialect.has_performance_schema_processlist() => {
                MYSQL_PERFORMANCE_SCHEMA_ACTIVE_SESSIONS
            }
            Self::MySql(_) => MYSQL_INFORMATION_SCHEMA_ACTIVE_SESSIONS,
        }
    }

    /// Run `query` with a server-enforced time limit of `timeout`
    ///
    /// The server aborts the statement when the limit is hit, and the abort
    /// comes back as an error rather than a hang.
    pub async fn execute_with_timeout(
        &self,
        connection: &dyn HealthConnection,
        query: &str,
        timeout: Duration,
    ) -> HealthResult<i64> {
        match self {
            Self::PostgreSql => {
                let setting = format!("SET LOCAL statement_timeout = '{}ms'", timeout.as_millis());
                connection.select_count_scoped(&setting, query).await
            }
            Self::MySql(dialect) => {
                let limited = match dialect.flavor {
                    MySqlFlavor::MySql => with_max_execution_time_hint(query, timeout)?,
                    MySqlFlavor::MariaDb => format!(
                        "SET STATEMENT max_statement_time = {:.3} FOR {}",
                        timeout.as_secs_f64(),
                        query.trim_start()
                    ),
                };
                connection.select_count(&limited).await
            }
        }
    }
}

/// Insert `/*+ MAX_EXECUTION_TIME(ms) */` after the leading `SELECT`
fn with_max_execution_time_hint(query: &str, timeout: Duration) -> HealthResult<String> {
    let trimmed = query.trim_start();
    let keyword = trimmed.get(..6).unwrap_or_default();

    if !keyword.eq_ignore_ascii_case("select") {
        return Err(HealthError::Query(
            "MySQL execution time limits apply only to SELECT statements".to_string(),
        ));
    }

    Ok(format!(
        "SELECT /*+ MAX_EXECUTION_TIME({}) */{}",
        timeout.as_millis(),
        &trimmed[6..]
    ))
}
