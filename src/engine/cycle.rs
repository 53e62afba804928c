//! One full generation: fetch every sport for every bookmaker, run the
//! engine per bookmaker, persist what it picks.

use anyhow::Result;
use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use super::{EngineReport, ParlayEngine};
use crate::data::{flatten_events, MarketDataSource};
use crate::storage::ParlayStore;
use crate::types::{ParlayRecord, RawOutcome};

/// Summary of one generation across all bookmakers.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub date: NaiveDate,
    /// One entry per bookmaker, in configured order.
    pub reports: Vec<EngineReport>,
    /// Sport/bookmaker fetches that failed and were skipped.
    pub failed_fetches: usize,
    /// Bookmakers whose chosen parlay could not be built.
    pub failed_builds: usize,
}

impl GenerationReport {
    /// Parlays that were built, in bookmaker order.
    pub fn records(&self) -> Vec<&ParlayRecord> {
        self.reports.iter().filter_map(|r| r.record.as_ref()).collect()
    }

    pub fn total_dropped(&self) -> usize {
        self.reports.iter().map(|r| r.dropped).sum()
    }
}

/// Fetch and flatten all sports for one bookmaker.
///
/// A failed sport is logged and skipped. Returns the outcomes and the
/// number of failures.
pub async fn gather_outcomes(
    source: &dyn MarketDataSource,
    sports: &[String],
    bookmaker: &str,
) -> (Vec<RawOutcome>, usize) {
    let fetches = sports.iter().map(|sport| source.fetch_odds(sport, bookmaker));
    let results = join_all(fetches).await;

    let mut outcomes = Vec::new();
    let mut failed = 0;
    for (sport, result) in sports.iter().zip(results) {
        match result {
            Ok(events) => outcomes.extend(flatten_events(&events, bookmaker)),
            Err(e) => {
                failed += 1;
                warn!(sport = %sport, bookmaker, error = %e, "Odds fetch failed, skipping sport");
            }
        }
    }
    (outcomes, failed)
}

/// Run one generation and persist every parlay found.
///
/// Holds the engine's generation lock throughout, so concurrent callers
/// run one after another. Returns an error only when the store fails.
/// Fetch failures and bookmakers whose parlay cannot be built are
/// logged, counted and skipped.
pub async fn run_generation(
    source: &dyn MarketDataSource,
    engine: &ParlayEngine,
    store: Option<&ParlayStore>,
    sports: &[String],
    bookmakers: &[String],
    date: NaiveDate,
) -> Result<GenerationReport> {
    let _generation = engine.lock_generation().await;
    let run_id = Uuid::new_v4();
    info!(
        %run_id,
        %date,
        sports = sports.len(),
        bookmakers = bookmakers.len(),
        estimator = engine.estimator_name(),
        "Starting generation"
    );

    let mut reports = Vec::with_capacity(bookmakers.len());
    let mut failed_fetches = 0;
    let mut failed_builds = 0;

    for bookmaker in bookmakers {
        let (raw, failed) = gather_outcomes(source, sports, bookmaker).await;
        failed_fetches += failed;

        let mut report = match engine.run(bookmaker, &raw, date) {
            Ok(report) => report,
            Err(e) => {
                failed_builds += 1;
                warn!(%run_id, bookmaker = %bookmaker, error = %e, "Parlay build failed, skipping bookmaker");
                continue;
            }
        };
        if let (Some(store), Some(record)) = (store, report.record.as_mut()) {
            let id = store.insert(record).await?;
            record.id = Some(id);
            info!(%run_id, id, record = %record, "Parlay stored");
        }

        info!(
            %run_id,
            bookmaker = %bookmaker,
            outcomes = raw.len(),
            candidates = report.candidates,
            dropped = report.dropped,
            built = report.record.is_some(),
            "Bookmaker done"
        );
        reports.push(report);
    }

    let report = GenerationReport {
        run_id,
        date,
        reports,
        failed_fetches,
        failed_builds,
    };

    info!(
        %run_id,
        parlays = report.records().len(),
        dropped = report.total_dropped(),
        failed_fetches = report.failed_fetches,
        failed_builds = report.failed_builds,
        "Generation complete"
    );

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
