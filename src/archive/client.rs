//! HTTP client for the UIL academic results archive.
//!
//! Endpoint: `vlcp_pub_arch.WBX`, a form handler that renders results as
//! HTML tables. Queries are plain GETs with the form fields in the query
//! string; no authentication.
//!
//! The handler does not signal "no results" with a status code. Missing
//! results come back as a page without a table, so the body is returned
//! whatever the status.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::PageSource;
use crate::config::ArchiveConfig;
use crate::types::{QueryKey, ScrapeError};

/// Form fields the handler requires but which never vary.
const FIXED_PARAMS: [(&str, &str); 5] = [
    ("s_submit_sw", "X"),
    ("s_gender", ""),
    ("s_round", ""),
    ("s_dept", "C"),
    ("s_area_zone", ""),
];

/// Build the request URL for one query key.
pub fn archive_url(base_url: &str, key: &QueryKey) -> String {
    let level_code = key.level.code().to_string();
    let year = key.year.to_string();

    let params = [
        ("s_year", year.as_str()),
        ("s_conference", key.conference.as_str()),
        ("s_level_id", level_code.as_str()),
        ("s_level_nbr", key.bracket.as_str()),
        ("s_event_abbr", key.event.as_str()),
    ];

    let query = params
        .iter()
        .chain(FIXED_PARAMS.iter())
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{base_url}?{query}")
}

/// Archive client backed by `reqwest`.
pub struct ArchiveClient {
    http: Client,
    base_url: String,
}

impl ArchiveClient {
    pub fn new(config: &ArchiveConfig) -> Result<Self, ScrapeError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder.build().map_err(|source| ScrapeError::Transport {
            url: config.base_url.clone(),
            source,
        })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PageSource for ArchiveClient {
    async fn fetch_page(&self, key: &QueryKey) -> Result<String, ScrapeError> {
        let url = archive_url(&self.base_url, key);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ScrapeError::Transport { url: url.clone(), source })?;

        let status = resp.status();
        if !status.is_success() {
            debug!(%status, %key, "Archive returned non-success status");
        }

        resp.text()
            .await
            .map_err(|source| ScrapeError::Transport { url, source })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
