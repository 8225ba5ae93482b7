//! Results archive access.
//!
//! Defines the `PageSource` trait the harvester pulls pages through, and
//! the HTTP-backed `ArchiveClient` used in production.

pub mod client;

use async_trait::async_trait;

use crate::types::{QueryKey, ScrapeError};

pub use client::{archive_url, ArchiveClient};

/// Abstraction over anything that can serve a results page for a query.
///
/// Implementors return the raw HTML body; parsing happens downstream.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the results page for one query key.
    async fn fetch_page(&self, key: &QueryKey) -> Result<String, ScrapeError>;
}
