//! Query enumeration.
//!
//! Generates every (conference, level, bracket, event) combination for a
//! year from an explicit catalog. Ordering is part of the output contract:
//! CSV rows follow it.

use crate::types::{Level, QueryKey, ScrapeError};

/// Number of UIL districts per conference.
const DISTRICTS: u32 = 32;

/// Number of UIL regions per conference.
const REGIONS: u32 = 4;

/// Bracket identifiers valid for a level.
///
/// State has no bracket segmentation and yields a single empty id.
pub fn brackets(level: Level) -> Vec<String> {
    match level {
        Level::District => (1..=DISTRICTS).map(|i| i.to_string()).collect(),
        Level::Region => (1..=REGIONS).map(|i| i.to_string()).collect(),
        Level::State => vec![String::new()],
    }
}

/// Bracket lookup by level name. Anything but the three known names fails.
pub fn brackets_for_name(level: &str) -> Result<Vec<String>, ScrapeError> {
    Ok(brackets(level.parse()?))
}

/// Immutable catalog driving the enumeration.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub years: Vec<u16>,
    pub conferences: Vec<String>,
    pub levels: Vec<Level>,
    pub events: Vec<String>,
}

impl QueryPlan {
    /// Every key for one year, ordered conference → level → bracket → event.
    pub fn keys_for_year(&self, year: u16) -> impl Iterator<Item = QueryKey> + '_ {
        self.conferences.iter().flat_map(move |conf| {
            self.levels.iter().flat_map(move |&level| {
                brackets(level).into_iter().flat_map(move |bracket| {
                    self.events
                        .iter()
                        .map(move |event| QueryKey::new(year, conf, level, bracket.clone(), event))
                })
            })
        })
    }

    pub fn combinations_per_year(&self) -> usize {
        let brackets: usize = self.levels.iter().map(|&l| brackets(l).len()).sum();
        self.conferences.len() * brackets * self.events.len()
    }

    pub fn total_requests(&self) -> usize {
        self.combinations_per_year() * self.years.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
