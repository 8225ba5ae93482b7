//! Per-year harvesting.
//!
//! One year is one unit of work: its combinations are fetched and parsed
//! sequentially into a private `YearResults`. Years run on a fixed-size
//! pool of tokio tasks and share nothing, so a failed or panicked year
//! never affects the others.

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::enumerator::QueryPlan;
use super::parser;
use crate::archive::PageSource;
use crate::types::{ScrapeError, YearResults};

/// Outcome of one year's task.
#[derive(Debug)]
pub struct YearOutcome {
    pub year: u16,
    pub result: Result<YearResults, ScrapeError>,
}

/// Fetch and parse every combination of one year, in enumeration order.
///
/// The first transport error aborts the year. Pages without a table are
/// skipped and contribute no rows.
pub async fn harvest_year<S>(
    source: &S,
    plan: &QueryPlan,
    year: u16,
    progress: &ProgressBar,
) -> Result<YearResults, ScrapeError>
where
    S: PageSource + ?Sized,
{
    info!(year, combinations = plan.combinations_per_year(), "Harvesting year");

    let mut results = YearResults::new(year);
    let mut skipped = 0usize;

    for key in plan.keys_for_year(year) {
        let html = source.fetch_page(&key).await?;

        match parser::parse_page(&html, &key) {
            Some(rows) => {
                debug!(
                    year,
                    conference = %key.conference,
                    level = %key.level,
                    bracket = %key.bracket,
                    event = %key.event,
                    rows = rows.len(),
                    "Parsed"
                );
                results.extend(rows);
            }
            None => {
                debug!(
                    year,
                    conference = %key.conference,
                    level = %key.level,
                    bracket = %key.bracket,
                    event = %key.event,
                    "Skipped: no table"
                );
                skipped += 1;
            }
        }
        progress.inc(1);
    }

    info!(
        year,
        individual = results.individual.len(),
        team = results.team.len(),
        skipped,
        "Year harvested"
    );
    Ok(results)
}

/// Harvest every year of the plan with at most `workers` years in flight.
///
/// A finished year frees its slot at once, so a year stuck on a request
/// that never returns holds one worker and nothing else. Outcomes are
/// returned sorted by year. `progress_for` supplies the progress bar each
/// year reports to.
pub async fn harvest_years<S, P>(
    source: Arc<S>,
    plan: Arc<QueryPlan>,
    workers: usize,
    progress_for: P,
) -> Vec<YearOutcome>
where
    S: PageSource + ?Sized + 'static,
    P: Fn(u16) -> ProgressBar,
{
    let years = plan.years.clone();

    let mut outcomes = stream::iter(years)
        .map(|year| {
            let source = Arc::clone(&source);
            let plan = Arc::clone(&plan);
            let bar = progress_for(year);
            let handle = tokio::spawn(async move {
                let result = harvest_year(source.as_ref(), &plan, year, &bar).await;
                bar.finish();
                result
            });
            async move {
                let result = match handle.await {
                    Ok(result) => result,
                    Err(join_err) => Err(ScrapeError::TaskAborted {
                        year,
                        message: join_err.to_string(),
                    }),
                };
                if let Err(e) = &result {
                    error!(year, error = %e, "Year failed");
                }
                YearOutcome { year, result }
            }
        })
        .buffer_unordered(workers.max(1))
        .collect::<Vec<_>>()
        .await;

    outcomes.sort_by_key(|o| o.year);
    outcomes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveClient, MockPageSource};
    use crate::config::ArchiveConfig;
    use crate::types::{Level, QueryKey};
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    /// Never answers for `stuck_year`; serves a team page for every other year.
    struct StuckYearSource {
        stuck_year: u16,
        requested: Mutex<BTreeSet<u16>>,
    }

    #[async_trait]
    impl PageSource for StuckYearSource {
        async fn fetch_page(&self, key: &QueryKey) -> Result<String, ScrapeError> {
            self.requested.lock().unwrap().insert(key.year);
            if key.year == self.stuck_year {
                std::future::pending::<()>().await;
            }
            Ok(TEAM_PAGE.to_string())
        }
    }

    const INDIVIDUAL_PAGE: &str = "<table>\
        <tr><th>Contestant</th><th>School</th></tr>\
        <tr><td>Jane Doe</td><td>Lincoln HS</td><td>95</td><td>1</td><td>10</td><td>Gold</td></tr>\
        </table>";

    const TEAM_PAGE: &str = "<table>\
        <tr><th>School</th><th>Team</th></tr>\
        <tr><td>Lincoln HS</td><td>A</td><td>300</td><td>1</td><td>20</td><td>Gold</td><td>Yes</td></tr>\
        </table>";

    fn state_plan(years: Vec<u16>, events: &[&str]) -> QueryPlan {
        QueryPlan {
            years,
            conferences: vec!["4A".into()],
            levels: vec![Level::State],
            events: events.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_harvest_year_routes_and_skips() {
        let mut source = MockPageSource::new();
        source.expect_fetch_page().times(3).returning(|key| {
            Ok(match key.event.as_str() {
                "LIT" => INDIVIDUAL_PAGE.to_string(),
                "MTH" => "<p>No results</p>".to_string(),
                _ => TEAM_PAGE.to_string(),
            })
        });

        let plan = state_plan(vec![2010], &["LIT", "MTH", "SCI"]);
        let bar = ProgressBar::hidden();
        let results = assert_ok!(harvest_year(&source, &plan, 2010, &bar).await);

        assert_eq!(results.year, 2010);
        assert_eq!(
            results.individual,
            vec![vec!["Jane Doe", "Lincoln HS", "95", "1", "10", "Gold", "", "2010", "4A", "State", "", "LIT"]]
        );
        assert_eq!(results.team.len(), 1);
        assert_eq!(results.team[0][11], "SCI");
        assert_eq!(bar.position(), 3);
    }

    #[tokio::test]
    async fn test_harvest_year_queries_in_enumeration_order() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);

        let mut source = MockPageSource::new();
        source.expect_fetch_page().returning(move |key| {
            log.lock().unwrap().push(key.clone());
            Ok(String::new())
        });

        let plan = QueryPlan {
            years: vec![2012],
            conferences: vec!["1A".into(), "2A".into()],
            levels: vec![Level::Region, Level::State],
            events: vec!["ACC".into()],
        };
        let results = assert_ok!(harvest_year(&source, &plan, 2012, &ProgressBar::hidden()).await);
        assert!(results.is_empty());

        let expected: Vec<QueryKey> = plan.keys_for_year(2012).collect();
        assert_eq!(*seen.lock().unwrap(), expected);
        assert_eq!(expected.len(), 2 * (4 + 1));
    }

    #[tokio::test]
    async fn test_harvest_year_aborts_on_first_fetch_error() {
        let mut source = MockPageSource::new();
        source
            .expect_fetch_page()
            .times(1)
            .returning(|_| Err(ScrapeError::Config("upstream down".into())));

        let plan = state_plan(vec![2010], &["LIT", "MTH"]);
        assert_err!(harvest_year(&source, &plan, 2010, &ProgressBar::hidden()).await);
    }

    #[tokio::test]
    async fn test_harvest_year_aborts_on_refused_connection() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .unwrap()
            .port();
        let client = ArchiveClient::new(&ArchiveConfig {
            base_url: format!("http://127.0.0.1:{port}/vlcp_pub_arch.WBX"),
            ..ArchiveConfig::default()
        })
        .unwrap();

        let plan = state_plan(vec![2010], &["LIT", "MTH"]);
        let bar = ProgressBar::hidden();
        let err = assert_err!(harvest_year(&client, &plan, 2010, &bar).await);

        assert!(matches!(err, ScrapeError::Transport { ref url, .. } if url.contains("s_event_abbr=LIT")));
        assert_eq!(bar.position(), 0);
    }

    #[tokio::test]
    async fn test_harvest_years_isolates_failures() {
        let mut source = MockPageSource::new();
        source.expect_fetch_page().returning(|key| {
            if key.year == 2005 {
                Err(ScrapeError::Config("boom".into()))
            } else {
                Ok(TEAM_PAGE.to_string())
            }
        });

        let plan = Arc::new(state_plan(vec![2004, 2005, 2006], &["LIT"]));
        let outcomes =
            harvest_years(Arc::new(source), plan, 2, |_| ProgressBar::hidden()).await;

        let years: Vec<_> = outcomes.iter().map(|o| o.year).collect();
        assert_eq!(years, vec![2004, 2005, 2006]);
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_err());
        assert_eq!(outcomes[2].result.as_ref().unwrap().team.len(), 1);
    }

    #[tokio::test]
    async fn test_harvest_years_reports_panicked_year() {
        let mut source = MockPageSource::new();
        source.expect_fetch_page().returning(|key| {
            if key.year == 2006 {
                panic!("parser bug");
            }
            Ok(INDIVIDUAL_PAGE.to_string())
        });

        // One worker: 2005 finishes before the panicking year starts.
        let plan = Arc::new(state_plan(vec![2005, 2006], &["LIT"]));
        let outcomes =
            harvest_years(Arc::new(source), plan, 1, |_| ProgressBar::hidden()).await;

        assert_eq!(outcomes[0].result.as_ref().unwrap().individual.len(), 1);
        assert!(matches!(
            outcomes[1].result,
            Err(ScrapeError::TaskAborted { year: 2006, .. })
        ));
    }

    #[tokio::test]
    async fn test_stuck_year_does_not_hold_back_later_years() {
        let source = Arc::new(StuckYearSource {
            stuck_year: 2004,
            requested: Mutex::new(BTreeSet::new()),
        });
        let plan = Arc::new(state_plan(vec![2004, 2005, 2006, 2007, 2008], &["LIT"]));

        let run = harvest_years(Arc::clone(&source), plan, 2, |_| ProgressBar::hidden());
        let finished = tokio::time::timeout(Duration::from_secs(2), run).await;
        assert!(finished.is_err(), "the stuck year never completes");

        let requested: Vec<_> = source.requested.lock().unwrap().iter().copied().collect();
        assert_eq!(requested, vec![2004, 2005, 2006, 2007, 2008]);
    }

    #[tokio::test]
    async fn test_harvest_years_sorted_by_year() {
        let mut source = MockPageSource::new();
        source.expect_fetch_page().returning(|_| Ok(TEAM_PAGE.to_string()));

        let plan = Arc::new(state_plan(vec![2009, 2004, 2006], &["LIT", "MTH"]));
        let outcomes =
            harvest_years(Arc::new(source), plan, 3, |_| ProgressBar::hidden()).await;

        let years: Vec<_> = outcomes.iter().map(|o| o.year).collect();
        assert_eq!(years, vec![2004, 2006, 2009]);
        assert!(outcomes.iter().all(|o| o.result.as_ref().unwrap().team.len() == 2));
    }
}
