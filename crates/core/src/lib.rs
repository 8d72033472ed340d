//! Core types and parameter extraction for the GA4 ETL pipeline.

pub mod dates;
pub mod error;
pub mod params;
pub mod raw;
pub mod records;

pub use dates::*;
pub use error::{Error, Result};
pub use params::*;
pub use raw::*;
pub use records::*;
