//! Service record model for pagestamp.
//!
//! This crate loads the per-industry service records that drive page generation
//! from JSON, YAML or TOML and validates the record set as a whole.

pub mod loader;
pub mod record;

pub use loader::{load_services, parse_services, DataError, Format, ServiceSet};
pub use record::{FaqEntry, ServiceRecord};
