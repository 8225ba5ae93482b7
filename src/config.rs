//! Configuration loading from TOML.
//!
//! The config file is optional: every field defaults to the archive
//! catalog in `crate::catalog`, so a missing `uil_scrape.toml` runs the
//! full 2004–2022 scrape. A present file may override any subset.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog;
use crate::engine::enumerator::QueryPlan;
use crate::types::{Level, ScrapeError};

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "uil_scrape.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub scrape: ScrapeConfig,
    pub archive: ArchiveConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScrapeConfig {
    pub first_year: u16,
    pub last_year: u16,
    /// Number of years harvested concurrently.
    pub workers: usize,
    pub output_dir: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            first_year: catalog::FIRST_YEAR,
            last_year: catalog::LAST_YEAR,
            workers: default_workers(),
            output_dir: PathBuf::from(catalog::OUTPUT_DIR),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArchiveConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: catalog::ARCHIVE_URL.to_string(),
            user_agent: catalog::USER_AGENT.to_string(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub conferences: Vec<String>,
    pub levels: Vec<String>,
    pub events: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            conferences: owned(&catalog::CONFERENCES),
            levels: owned(&catalog::LEVELS),
            events: owned(&catalog::EVENTS),
        }
    }
}

/// Same sizing rule as a default thread pool: CPUs + 4, capped at 32.
fn default_workers() -> usize {
    let cpus = std::thread::available_parallelism().map_or(1, |n| n.get());
    (cpus + 4).min(32)
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration if the file exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validate the catalog and build the enumeration plan.
    pub fn plan(&self) -> Result<QueryPlan, ScrapeError> {
        let scrape = &self.scrape;
        if scrape.first_year > scrape.last_year {
            return Err(ScrapeError::Config(format!(
                "first_year {} is after last_year {}",
                scrape.first_year, scrape.last_year
            )));
        }
        if scrape.workers == 0 {
            return Err(ScrapeError::Config("workers must be at least 1".into()));
        }

        let cat = &self.catalog;
        for (name, list) in [
            ("conferences", &cat.conferences),
            ("levels", &cat.levels),
            ("events", &cat.events),
        ] {
            if list.is_empty() {
                return Err(ScrapeError::Config(format!("catalog.{name} is empty")));
            }
        }

        let levels = cat
            .levels
            .iter()
            .map(|l| l.parse::<Level>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryPlan {
            years: (scrape.first_year..=scrape.last_year).collect(),
            conferences: cat.conferences.clone(),
            levels,
            events: cat.events.clone(),
        })
    }
}
