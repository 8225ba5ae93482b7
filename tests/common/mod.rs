//! Fixture page source for integration testing.
//!
//! Serves canned HTML per query key from memory. Unlisted keys get a
//! page without any table, the way the archive answers empty queries.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use uil_scrape::archive::{ArchiveClient, PageSource};
use uil_scrape::config::ArchiveConfig;
use uil_scrape::types::{QueryKey, ScrapeError};

pub const EMPTY_PAGE: &str =
    "<html><body><p>No results match the selected criteria.</p></body></html>";

pub struct FixtureSource {
    pages: HashMap<QueryKey, String>,
    /// Years whose requests go to an unreachable archive.
    unreachable_years: HashSet<u16>,
    /// Years whose requests never complete.
    stuck_years: HashSet<u16>,
    dead_client: ArchiveClient,
    requests: AtomicUsize,
}

impl FixtureSource {
    pub fn new() -> Self {
        // Bind then release a loopback port so connecting to it is refused.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .map(|a| a.port())
            .expect("free port");
        let dead = ArchiveConfig {
            base_url: format!("http://127.0.0.1:{port}/vlcp_pub_arch.WBX"),
            ..ArchiveConfig::default()
        };
        Self {
            pages: HashMap::new(),
            unreachable_years: HashSet::new(),
            stuck_years: HashSet::new(),
            dead_client: ArchiveClient::new(&dead).expect("client"),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_page(mut self, key: QueryKey, html: impl Into<String>) -> Self {
        self.pages.insert(key, html.into());
        self
    }

    pub fn with_unreachable_year(mut self, year: u16) -> Self {
        self.unreachable_years.insert(year);
        self
    }

    pub fn with_stuck_year(mut self, year: u16) -> Self {
        self.stuck_years.insert(year);
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for FixtureSource {
    async fn fetch_page(&self, key: &QueryKey) -> Result<String, ScrapeError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.unreachable_years.contains(&key.year) {
            return self.dead_client.fetch_page(key).await;
        }
        if self.stuck_years.contains(&key.year) {
            std::future::pending::<()>().await;
        }
        Ok(self
            .pages
            .get(key)
            .cloned()
            .unwrap_or_else(|| EMPTY_PAGE.to_string()))
    }
}

/// Render an archive-style results page from a header and data rows.
pub fn results_page(header: &[&str], rows: &[&[&str]]) -> String {
    let th: String = header.iter().map(|h| format!("<th>{h}</th>")).collect();
    let trs: String = rows
        .iter()
        .map(|cells| {
            let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
            format!("<tr>{tds}</tr>\n")
        })
        .collect();
    format!(
        "<html><body><h2>Academic Results</h2>\n<table border=\"1\">\n<tr>{th}</tr>\n{trs}</table></body></html>"
    )
}

pub const INDIVIDUAL_HEADER: [&str; 7] =
    ["Contestant", "School", "Score", "Place", "Points", "Medal", "Advance"];

pub const STATE_INDIVIDUAL_HEADER: [&str; 6] =
    ["Contestant", "School", "Score", "Place", "Points", "Medal"];

pub const TEAM_HEADER: [&str; 7] =
    ["School", "Team", "Score", "Place", "Points", "Medal", "Advance"];
