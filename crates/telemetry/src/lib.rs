//! Telemetry for the GA4 ETL pipeline.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, init_tracing_from_env};
