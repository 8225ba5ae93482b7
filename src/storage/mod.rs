//! CSV output.
//!
//! Each harvested year becomes two files, `INDIVIDUAL_<year>.csv` and
//! `TEAM_<year>.csv`, holding a fixed 12-column header followed by the
//! rows in enumeration order. Existing files are overwritten.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{RowKind, ScrapeError, YearResults};

/// Path of one year's output file for a result kind.
pub fn output_path(dir: &Path, kind: RowKind, year: u16) -> PathBuf {
    dir.join(format!("{}_{year}.csv", kind.file_prefix()))
}

/// Write one year's individual and team files. Returns the paths written.
pub fn write_year(dir: &Path, results: &YearResults) -> Result<[PathBuf; 2], ScrapeError> {
    fs::create_dir_all(dir).map_err(|source| ScrapeError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let individual = write_rows(dir, RowKind::Individual, results)?;
    let team = write_rows(dir, RowKind::Team, results)?;

    info!(
        year = results.year,
        individual = results.individual.len(),
        team = results.team.len(),
        dir = %dir.display(),
        "Year written"
    );
    Ok([individual, team])
}

fn write_rows(dir: &Path, kind: RowKind, results: &YearResults) -> Result<PathBuf, ScrapeError> {
    let path = output_path(dir, kind, results.year);
    let csv_err = |source| ScrapeError::Csv {
        path: path.clone(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_path(&path)
        .map_err(csv_err)?;

    writer.write_record(kind.header()).map_err(csv_err)?;
    for row in results.rows(kind) {
        writer.write_record(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ScrapeError::Io {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), rows = results.rows(kind).len(), "CSV written");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
