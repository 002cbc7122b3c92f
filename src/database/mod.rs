//! # Database Layer
//!
//! Engine adapters and the connection port the load probe runs over.
//!
//! ## Key Components
//!
//! - [`connection`] - The `HealthConnection` port plus `sqlx`-backed PostgreSQL
//!   and MySQL implementations
//! - [`adapter`] - Engine selection, session count queries, and server-side
//!   statement time limits per dialect
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use db_load_health::constants::QUERY_TIMEOUT;
//! use db_load_health::database::{DatabaseAdapter, PgHealthConnection};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = PgHealthConnection::connect("postgresql://localhost/app", "primary").await?;
//! let adapter = DatabaseAdapter::build(&connection).await?;
//! let active = adapter
//!     .execute_with_timeout(&connection, adapter.active_session_count_query(), QUERY_TIMEOUT)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod connection;

pub use adapter::{DatabaseAdapter, DatabaseEngine, MySqlDialect, MySqlFlavor};
pub use connection::HealthConnection;

#[cfg(feature = "mysql")]
pub use connection::MySqlHealthConnection;
#[cfg(feature = "postgres")]
pub use connection::PgHealthConnection;
