//! Scrape orchestration: harvest all years, then flush each to disk.

use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use super::enumerator::QueryPlan;
use super::harvester::{harvest_years, YearOutcome};
use crate::archive::{ArchiveClient, PageSource};
use crate::config::AppConfig;
use crate::storage;

/// What happened to one year after the run.
#[derive(Debug)]
pub struct YearReport {
    pub year: u16,
    /// Files written, or `None` if the year failed.
    pub files: Option<[PathBuf; 2]>,
    pub rows: usize,
}

/// Run the full scrape against the live archive.
pub async fn run(cfg: &AppConfig) -> Result<Vec<YearReport>> {
    let plan = cfg.plan().context("Invalid scrape configuration")?;
    let client = ArchiveClient::new(&cfg.archive).context("Failed to build archive client")?;

    info!(
        years = plan.years.len(),
        requests = plan.total_requests(),
        workers = cfg.scrape.workers,
        base_url = %client.base_url(),
        "Starting archive scrape"
    );

    let progress = MultiProgress::new();
    let reports = run_with_source(
        Arc::new(client),
        plan,
        cfg.scrape.workers,
        &cfg.scrape.output_dir,
        &progress,
    )
    .await;

    let written = reports.iter().filter(|r| r.files.is_some()).count();
    info!(written, years = reports.len(), "Scrape finished");
    Ok(reports)
}

/// Harvest every year from `source`, join, then write each successful year.
///
/// Nothing is written until every year has joined: a year stuck on a
/// request that never returns holds back the files of all the others,
/// though not their harvesting. A year that failed to harvest or to write
/// is logged and reported with `files: None`; it never stops the other
/// years.
pub async fn run_with_source<S>(
    source: Arc<S>,
    plan: QueryPlan,
    workers: usize,
    output_dir: &Path,
    progress: &MultiProgress,
) -> Vec<YearReport>
where
    S: PageSource + ?Sized + 'static,
{
    let per_year = plan.combinations_per_year() as u64;
    let outcomes = harvest_years(source, Arc::new(plan), workers, |year| {
        progress.add(year_bar(year, per_year))
    })
    .await;

    outcomes
        .into_iter()
        .map(|YearOutcome { year, result }| match result {
            Ok(results) => {
                let rows = results.len();
                match storage::write_year(output_dir, &results) {
                    Ok(files) => YearReport { year, files: Some(files), rows },
                    Err(e) => {
                        error!(year, error = %e, "Failed to write year");
                        YearReport { year, files: None, rows }
                    }
                }
            }
            Err(_) => YearReport { year, files: None, rows: 0 },
        })
        .collect()
}

/// A hidden `MultiProgress` for callers that want no terminal output.
pub fn hidden_progress() -> MultiProgress {
    MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
}

fn year_bar(year: u16, len: u64) -> ProgressBar {
    let style = ProgressStyle::with_template("{prefix} [{bar:40}] {pos}/{len} {elapsed_precise}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::new(len).with_style(style).with_prefix(year.to_string())
}
