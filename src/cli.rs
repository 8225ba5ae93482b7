//! Command-line action gate.
//!
//! The binary takes at most one positional argument. `scrape` runs
//! immediately; no argument asks for confirmation first.

use anyhow::{Context, Result};
use dialoguer::Confirm;

/// What the first command-line argument asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `scrape`: run without asking.
    Scrape,
    /// No argument: ask before running.
    Prompt,
    /// Anything else.
    Unknown(String),
}

impl Action {
    /// Interpret the arguments after the program name. Extra arguments are ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match args.into_iter().next().map(Into::into) {
            None => Action::Prompt,
            Some(arg) if arg == "scrape" => Action::Scrape,
            Some(arg) => Action::Unknown(arg),
        }
    }
}

/// Interactive yes/no gate. Defaults to "no".
pub fn confirm_scrape(total_requests: usize) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!(
            "Scrape the UIL results archive? This issues about {total_requests} requests"
        ))
        .default(false)
        .interact()
        .context("Failed to read confirmation from terminal")
}
