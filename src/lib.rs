//! uil-scrape — UIL academic results archive scraper
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod archive;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod storage;
pub mod types;
