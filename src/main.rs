//! GA4 batch ETL pipeline
//!
//! Daily and backfill processing of raw GA4 event exports:
//! - Flattens nested event parameters into typed columns
//! - Derives session summaries and user profiles
//! - Loads derived tables with replace-partition semantics
//! - Posts run status to a Slack webhook

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};

use etl_core::dates::parse_date;
use notify::{Notifier, NotifyConfig};
use pipeline::Pipeline;
use telemetry::init_tracing_from_env;
use warehouse_client::{health, schema, WarehouseClient, WarehouseConfig};

/// Processing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Process a single date relative to today
    Daily,
    /// Process an explicit inclusive date range
    Full,
}

#[derive(Debug, Parser)]
#[command(name = "ga4-etl", version, about = "Batch ETL pipeline for GA4 event exports")]
struct Cli {
    /// Processing mode
    #[arg(long, value_enum, default_value_t = Mode::Daily)]
    mode: Mode,

    /// Days before today to process in daily mode
    #[arg(long, default_value_t = 1)]
    days_back: u64,

    /// Range start for full mode (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// Range end for full mode (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    warehouse: WarehouseConfig,

    #[serde(default)]
    notify: NotifyConfig,
}

#[tokio::main]
async fn main() {
    std::process::exit(run().await);
}

async fn run() -> i32 {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    let cli = Cli::parse();

    info!("Starting GA4 ETL pipeline v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return 1;
        }
    };

    let client = match WarehouseClient::new(config.warehouse.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create warehouse client: {}", e);
            return 1;
        }
    };

    // Initialize derived table schema
    if let Err(e) = schema::init_schema(&client).await {
        error!("Failed to initialize schema: {}", e);
        // Continue anyway, the tables might already exist
    }

    if let Err(e) = health::check_connection(&client).await {
        error!("Warehouse connection check failed: {}", e);
        return 1;
    }
    info!("Warehouse connection: healthy");

    let notifier = Notifier::new(config.notify.clone());
    let pipeline = Pipeline::new(client.clone(), client, notifier);

    match cli.mode {
        Mode::Daily => match pipeline.run_daily(cli.days_back).await {
            Ok(summary) => {
                info!(
                    dates_processed = summary.dates_processed,
                    events = summary.totals.events,
                    "Daily run complete"
                );
                0
            }
            Err(e) => {
                error!("Daily run failed: {}", e);
                1
            }
        },
        Mode::Full => {
            let (start, end) = match parse_range(&cli) {
                Ok(range) => range,
                Err(e) => {
                    error!("Invalid backfill range: {:#}", e);
                    return 1;
                }
            };
            match pipeline.run_backfill(start, end).await {
                Ok(summary) => {
                    info!(
                        dates_processed = summary.dates_processed,
                        dates_failed = summary.dates_failed,
                        events = summary.totals.events,
                        "Backfill run complete"
                    );
                    if summary.dates_failed > 0 {
                        1
                    } else {
                        0
                    }
                }
                Err(e) => {
                    error!("Backfill run failed: {}", e);
                    1
                }
            }
        }
    }
}

/// Resolves the full-mode date range from CLI arguments.
///
/// Both bounds are required; full mode never defaults to a range.
fn parse_range(cli: &Cli) -> Result<(chrono::NaiveDate, chrono::NaiveDate)> {
    let start = cli
        .start_date
        .as_deref()
        .context("--start-date is required in full mode")?;
    let end = cli
        .end_date
        .as_deref()
        .context("--end-date is required in full mode")?;
    let start = parse_date(start).context("Invalid --start-date")?;
    let end = parse_date(end).context("Invalid --end-date")?;
    Ok((start, end))
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("GA4_ETL")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested warehouse config from environment
    // The config crate's nested parsing doesn't work reliably with underscored field names
    if let Ok(url) = std::env::var("GA4_ETL_WAREHOUSE_URL") {
        config.warehouse.url = url;
    }
    if let Ok(database) = std::env::var("GA4_ETL_WAREHOUSE_DATABASE") {
        config.warehouse.database = database;
    }
    if let Ok(database) = std::env::var("GA4_ETL_WAREHOUSE_SOURCE_DATABASE") {
        config.warehouse.source_database = database;
    }
    if let Ok(username) = std::env::var("GA4_ETL_WAREHOUSE_USERNAME") {
        config.warehouse.username = Some(username);
    }
    if let Ok(password) = std::env::var("GA4_ETL_WAREHOUSE_PASSWORD") {
        config.warehouse.password = Some(password);
    }

    // Webhook override
    if let Ok(url) = std::env::var("GA4_ETL_SLACK_WEBHOOK_URL") {
        config.notify.webhook_url = Some(url);
    }

    Ok(config)
}
