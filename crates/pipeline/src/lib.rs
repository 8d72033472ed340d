//! Run orchestration: wires extraction, transformation, and loading
//! into daily and backfill runs.

pub mod runner;
pub mod stats;
pub mod traits;
pub mod warehouse;

pub use runner::Pipeline;
pub use stats::{DateStats, RunSummary};
pub use traits::{EventSink, EventSource};
