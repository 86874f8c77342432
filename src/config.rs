// src/config.rs

use anyhow::{ensure, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::{env, fs, path::PathBuf};
use tracing::info;

use crate::fetch::client::DEFAULT_BASE_URL;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "MENSADUMP_CONFIG";

/// Everything one export run needs to know.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub mensa_ids: Vec<u32>,
    pub start: NaiveDate,
    pub stop: NaiveDate,
    /// Removed once from the front of every mensa name, e.g. the town.
    pub strip_prefix: String,
    /// Dates per worker task.
    pub chunk_size: usize,
    /// Chunks fetched at the same time.
    pub workers: usize,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mensa_ids: (113..117).collect(),
            start: NaiveDate::from_ymd_opt(2012, 7, 1).unwrap_or_default(),
            stop: NaiveDate::from_ymd_opt(2020, 2, 7).unwrap_or_default(),
            strip_prefix: "Marburg, ".to_string(),
            chunk_size: 50,
            workers: 32,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Read the YAML file named by `MENSADUMP_CONFIG`, falling back to the
    /// built-in defaults when the variable is unset.
    pub fn load() -> Result<Self> {
        let config = match env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                info!(path = %path.display(), "loading config");
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("reading config {:?}", path))?;
                Self::from_yaml(&text).with_context(|| format!("parsing config {:?}", path))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.chunk_size >= 1, "chunk_size must be at least 1");
        ensure!(self.workers >= 1, "workers must be at least 1");
        ensure!(!self.mensa_ids.is_empty(), "no mensa ids configured");
        Ok(())
    }

    /// `{mensa_id}_{start}_{stop}.csv` inside `output_dir`.
    pub fn csv_path(&self, mensa_id: u32) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}_{}.csv", mensa_id, self.start, self.stop))
    }
}
