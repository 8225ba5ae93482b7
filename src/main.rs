//! uil-scrape — UIL academic results archive scraper
//!
//! Entry point. Loads configuration, initialises structured logging,
//! gates the run on the `scrape` argument (or an interactive prompt),
//! then harvests every year and writes the per-year CSV pairs.
//!
//! Logging defaults to `uil_scrape=info`: year start, finish, write and
//! failure. Set `RUST_LOG=uil_scrape=debug` for one line per combination
//! ("Parsed" or "Skipped: no table"). `UIL_SCRAPE_LOG_JSON=1` switches to
//! JSON output.

use anyhow::Result;
use tracing::{info, warn};

use uil_scrape::cli::{self, Action};
use uil_scrape::config::{self, AppConfig};
use uil_scrape::engine::runner;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let cfg = AppConfig::load_or_default(config::DEFAULT_CONFIG_FILE)?;

    let go = match Action::from_args(std::env::args().skip(1)) {
        Action::Scrape => true,
        Action::Prompt => {
            let plan = cfg.plan()?;
            cli::confirm_scrape(plan.total_requests())?
        }
        Action::Unknown(arg) => {
            warn!(action = %arg, "Unknown action (expected `scrape`); nothing to do");
            false
        }
    };

    if !go {
        info!("Scrape not started");
        return Ok(());
    }

    let reports = runner::run(&cfg).await?;
    for report in reports.iter().filter(|r| r.files.is_none()) {
        warn!(year = report.year, "No output written for year");
    }

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("uil_scrape=info"));

    let json_logging = std::env::var("UIL_SCRAPE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
