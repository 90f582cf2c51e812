//! Saved run statistics.
//!
//! An archive is gzip-compressed JSON. Loading also accepts plain JSON so
//! hand-edited or externally produced files can be read back.

use crate::error::{IoError, Result};
use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use forage_core::config::SimConfig;
use forage_data::RunStats;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatsArchive {
    pub name: String,
    /// RFC 3339 timestamp of when the archive was created.
    pub created_at: String,
    pub config_fingerprint: String,
    pub seed: Option<u64>,
    pub stats: RunStats,
}

impl StatsArchive {
    pub fn new<S: Into<String>>(name: S, config: &SimConfig, seed: Option<u64>, stats: RunStats) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now().to_rfc3339(),
            config_fingerprint: config.fingerprint(),
            seed,
            stats,
        }
    }

    /// Number of completed days in the archived run.
    pub fn days(&self) -> usize {
        self.stats.len().saturating_sub(1)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        let json = serde_json::to_vec(self)?;
        encoder.write_all(&json)?;
        encoder
            .finish()
            .map_err(|e| IoError::compression(e.to_string()))?
            .flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::not_found(path.display().to_string()));
        }
        let raw = std::fs::read(path)?;

        let mut decoded = Vec::new();
        let archive = if GzDecoder::new(raw.as_slice())
            .read_to_end(&mut decoded)
            .is_ok()
        {
            serde_json::from_slice(&decoded)?
        } else {
            serde_json::from_slice(&raw)?
        };
        Ok(archive)
    }
}

/// File name for one run of a batch, e.g. `mixed_r2.json.gz`.
pub fn archive_file_name(name: &str, repeat: u32) -> String {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_r{}.json.gz", safe, repeat)
}
