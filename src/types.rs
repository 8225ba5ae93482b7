//! Shared types for the archive scraper.
//!
//! Query keys, parsed rows, and per-year result sets flow from the
//! enumerator through the harvester into the CSV writer; all of them are
//! defined here so no module depends on another's internals.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Competition level of a meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    District,
    Region,
    State,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::District, Level::Region, Level::State];

    pub fn name(self) -> &'static str {
        match self {
            Level::District => "District",
            Level::Region => "Region",
            Level::State => "State",
        }
    }

    /// Single-letter code the archive expects in `s_level_id`.
    pub fn code(self) -> char {
        match self {
            Level::District => 'D',
            Level::Region => 'R',
            Level::State => 'S',
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|l| l.name() == s)
            .ok_or_else(|| ScrapeError::UnknownLevel(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Query key
// ---------------------------------------------------------------------------

/// One archive query: a single page of results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub year: u16,
    pub conference: String,
    pub level: Level,
    /// District/region number; empty for State.
    pub bracket: String,
    pub event: String,
}

impl QueryKey {
    pub fn new(
        year: u16,
        conference: impl Into<String>,
        level: Level,
        bracket: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        Self {
            year,
            conference: conference.into(),
            level,
            bracket: bracket.into(),
            event: event.into(),
        }
    }

    /// Context columns appended after the table-native cells.
    pub fn context_cells(&self) -> [String; 5] {
        [
            self.year.to_string(),
            self.conference.clone(),
            self.level.name().to_string(),
            self.bracket.clone(),
            self.event.clone(),
        ]
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.year, self.conference, self.level, self.bracket, self.event
        )
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Which output stream a parsed table feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Individual,
    Team,
}

impl RowKind {
    /// Column names of the table-native cells.
    pub fn domain_columns(self) -> [&'static str; DOMAIN_COLUMNS] {
        match self {
            RowKind::Individual => {
                ["Contestant", "School", "Score", "Place", "Points", "Medal", "Advance"]
            }
            RowKind::Team => ["School", "Team", "Score", "Place", "Points", "Medal", "Advance"],
        }
    }

    /// Full CSV header: domain columns followed by the context columns.
    pub fn header(self) -> Vec<&'static str> {
        self.domain_columns()
            .into_iter()
            .chain(CONTEXT_COLUMNS)
            .collect()
    }

    pub fn file_prefix(self) -> &'static str {
        match self {
            RowKind::Individual => "INDIVIDUAL",
            RowKind::Team => "TEAM",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKind::Individual => write!(f, "individual"),
            RowKind::Team => write!(f, "team"),
        }
    }
}

/// Number of table-native columns in either result shape.
pub const DOMAIN_COLUMNS: usize = 7;

pub const CONTEXT_COLUMNS: [&str; 5] = ["Year", "Conference", "Level", "Bracket", "Event"];

/// One normalized result: table cells followed by the query context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub kind: RowKind,
    pub cells: Vec<String>,
}

// ---------------------------------------------------------------------------
// Year results
// ---------------------------------------------------------------------------

/// Everything harvested for one year, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearResults {
    pub year: u16,
    pub individual: Vec<Vec<String>>,
    pub team: Vec<Vec<String>>,
}

impl YearResults {
    pub fn new(year: u16) -> Self {
        Self {
            year,
            individual: Vec::new(),
            team: Vec::new(),
        }
    }

    pub fn push(&mut self, row: ResultRow) {
        match row.kind {
            RowKind::Individual => self.individual.push(row.cells),
            RowKind::Team => self.team.push(row.cells),
        }
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = ResultRow>) {
        for row in rows {
            self.push(row);
        }
    }

    pub fn rows(&self, kind: RowKind) -> &[Vec<String>] {
        match kind {
            RowKind::Individual => &self.individual,
            RowKind::Team => &self.team,
        }
    }

    pub fn len(&self) -> usize {
        self.individual.len() + self.team.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Request failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unknown level: {0:?} (expected District, Region or State)")]
    UnknownLevel(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error at {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Task for {year} aborted: {message}")]
    TaskAborted { year: u16, message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
