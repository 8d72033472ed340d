//! ClickHouse source and sink for the GA4 ETL pipeline.

pub mod client;
pub mod config;
pub mod health;
pub mod rows;
pub mod schema;
pub mod sink;
pub mod source;

pub use client::*;
pub use config::*;
pub use sink::*;
pub use source::fetch_raw_events;
