//! # Database Load Probe
//!
//! Command-line tool for sampling a database's load the way the library does,
//! and for validating health settings files before deploying them.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use db_load_health::cache::{MemoryCache, NoOpCache};
use db_load_health::config::HealthSettings;
use db_load_health::database::{HealthConnection, MySqlHealthConnection, PgHealthConnection};
use db_load_health::logging::init_structured_logging;
use db_load_health::{BoundModel, ConfigStore, HealthEngine, ModelKey};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "db-load-health")]
#[command(about = "Sample database load and validate health settings")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Health settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample one database and report its load
    Probe {
        /// Database URL (postgres://, postgresql://, mysql://)
        #[arg(long, env = "DATABASE_URL")]
        url: String,

        /// Database identity used in the cache key and events
        #[arg(long, default_value = "primary")]
        identity: String,

        /// Model whose configuration applies (default configuration if omitted)
        #[arg(long)]
        model: Option<String>,

        /// Override the configured vCPU count
        #[arg(long)]
        vcpu_count: Option<u32>,

        /// Override the configured threshold
        #[arg(long)]
        threshold: Option<f64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Load settings and validate them
    Validate,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct ProbeReport {
    database_identity: String,
    model: String,
    load_pct: f64,
    threshold: f64,
    max_healthy_sessions: Option<u64>,
    healthy: bool,
}

#[tokio::main]
async fn main() {
    init_structured_logging();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let settings = HealthSettings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate => {
            let store = ConfigStore::new();
            settings.apply(&store, Some(Arc::new(MemoryCache::new())));
            store.validate()?;

            println!(
                "configuration valid: {} model override(s), max healthy sessions {}",
                store.overrides().len(),
                store
                    .max_healthy_sessions()
                    .map_or_else(|| "-".to_string(), |n| n.to_string())
            );
            Ok(0)
        }
        Commands::Probe {
            url,
            identity,
            model,
            vcpu_count,
            threshold,
            format,
        } => {
            let store = Arc::new(ConfigStore::new());
            // Every probe samples the database directly
            settings.apply(&store, Some(Arc::new(NoOpCache::new())));
            store.configure(|layer| {
                if let Some(vcpu_count) = vcpu_count {
                    layer.vcpu_count(vcpu_count);
                }
                if let Some(threshold) = threshold {
                    layer.threshold(threshold);
                }
            });
            store.validate()?;

            let key = model.map_or_else(ModelKey::base, ModelKey::from);
            let connection = connect(&url, &identity).await?;
            let bound = BoundModel::new(key.clone(), connection);
            let engine = HealthEngine::new(store.clone());

            let adapter = engine.check_adapter(&bound).await?;
            info!(adapter = ?adapter, "Probing database");

            let config = store.for_model(&key);
            let load_pct = engine.load_pct(&bound).await;
            let report = ProbeReport {
                database_identity: identity,
                model: key.to_string(),
                load_pct,
                threshold: config.threshold,
                max_healthy_sessions: config.max_healthy_sessions(),
                healthy: load_pct <= config.threshold,
            };

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => println!(
                    "{}: load {:.1}% (threshold {:.1}%) - {}",
                    report.database_identity,
                    report.load_pct * 100.0,
                    report.threshold * 100.0,
                    if report.healthy { "healthy" } else { "overloaded" }
                ),
            }

            Ok(if report.healthy { 0 } else { 2 })
        }
    }
}

async fn connect(url: &str, identity: &str) -> anyhow::Result<Arc<dyn HealthConnection>> {
    let scheme = url.split("://").next().unwrap_or_default();

    let connection: Arc<dyn HealthConnection> = match scheme {
        "postgres" | "postgresql" => Arc::new(
            PgHealthConnection::connect(url, identity)
                .await
                .context("connecting to PostgreSQL")?,
        ),
        "mysql" => Arc::new(
            MySqlHealthConnection::connect(url, identity)
                .await
                .context("connecting to MySQL")?,
        ),
        other => bail!("unsupported database URL scheme: {other:?}"),
    };
    Ok(connection)
}
