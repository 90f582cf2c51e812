//! JSON helpers and configuration file loading.

use crate::error::{IoError, Result};
use forage_core::batch::ExperimentPlan;
use forage_core::config::SimConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }
    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {}", e)))
}

/// Writes `data` as pretty-printed JSON.
pub fn write_json_file<T, P>(path: P, data: &T) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json = to_json_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn read_toml_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(IoError::not_found(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Loads and validates a simulation config from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimConfig> {
    let path = path.as_ref();
    let content = read_toml_file(path)?;
    let config: SimConfig = toml::from_str(&content)
        .map_err(|e| IoError::from(e).with_context(format!("parsing {}", path.display())))?;
    config
        .validate()
        .map_err(|e| IoError::validation(e.to_string()))?;
    Ok(config)
}

/// Loads an experiment plan from a TOML file.
pub fn load_experiments<P: AsRef<Path>>(path: P) -> Result<ExperimentPlan> {
    let path = path.as_ref();
    let content = read_toml_file(path)?;
    ExperimentPlan::from_toml(&content).map_err(|e| {
        IoError::validation(e.to_string()).with_context(format!("parsing {}", path.display()))
    })
}
