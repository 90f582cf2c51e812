//! # Forage IO
//!
//! Persistence for the forage simulator:
//! - Structured error handling
//! - Gzip archives of per-day run statistics
//! - Config and experiment plan loading

/// Error types and result aliases for I/O operations
pub mod error;
/// Saved run statistics
pub mod history;
/// JSON helpers and TOML config loading
pub mod serialization;

pub use error::{IoError, Result};
pub use history::{archive_file_name, StatsArchive};
pub use serialization::{
    from_json, load_config, load_experiments, to_json, to_json_pretty, write_json_file,
};
