//! Transformation engine for the GA4 ETL pipeline.
//!
//! Three pure reductions over immutable inputs:
//! - flatten: raw events → one uniform row per event
//! - sessionize: flat rows → one summary per (user, session)
//! - aggregate: flat rows → one profile per user, split new/updated
//!
//! Sessionize and aggregate consume the same flattened set and have
//! no data dependency on each other.

pub mod flatten;
pub mod profile;
pub mod sessionize;

pub use flatten::{flatten, EventCategory};
pub use profile::aggregate;
pub use sessionize::sessionize;
