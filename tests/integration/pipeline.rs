//! End-to-end generation scenarios.

use chrono::NaiveDate;
use std::sync::Arc;

use parlay::engine::cycle::run_generation;
use parlay::engine::selector::SelectorConfig;
use parlay::engine::ParlayEngine;
use parlay::estimator::{ConstantEstimator, ImpliedProbabilityEstimator};
use parlay::history::{format_history, format_parlays, NO_HISTORY, NO_PARLAYS};
use parlay::odds::american_to_decimal;
use parlay::storage::ParlayStore;
use parlay::types::ParlayStatus;

use crate::mock_source::MockSource;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn constant_engine() -> ParlayEngine {
    ParlayEngine::new(Arc::new(ConstantEstimator::default()), SelectorConfig::default())
}

#[tokio::test]
async fn test_constant_estimator_picks_fewest_legs() {
    let source = MockSource::default_slate();
    let store = ParlayStore::in_memory().await.unwrap();

    let report = run_generation(
        &source,
        &constant_engine(),
        Some(&store),
        &strings(&["basketball_nba", "baseball_mlb"]),
        &strings(&["draftkings", "fanduel"]),
        day(17),
    )
    .await
    .unwrap();

    // Only Jazz (+320) with Rockies (+210) reaches 11.0 in two legs.
    let records = report.records();
    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(
            record.result.bets,
            vec!["Nuggets vs Jazz - Jazz", "Dodgers vs Rockies - Rockies"]
        );
        assert!((record.result.hit_rate - 0.36).abs() < 1e-12);
        assert!((record.result.american_odds - 1202.0).abs() < 1e-6);
        assert_eq!(record.status, ParlayStatus::Pending);
        assert_eq!(record.date, day(17));
    }
    assert_eq!(records[0].result.platform, "draftkings");
    assert_eq!(records[1].result.platform, "fanduel");
    assert_eq!(source.calls().len(), 4);

    let text = format_parlays(records.iter().map(|r| &r.result));
    assert!(text.contains("**Draftkings Parlay:**"));
    assert!(text.contains("**Fanduel Parlay:**"));
    assert!(text.contains("Estimated Hit Rate: 36.00%"));
}

#[tokio::test]
async fn test_failed_sport_still_produces_parlay() {
    let source = MockSource::default_slate().failing("baseball_mlb");
    let store = ParlayStore::in_memory().await.unwrap();

    let report = run_generation(
        &source,
        &constant_engine(),
        Some(&store),
        &strings(&["basketball_nba", "baseball_mlb"]),
        &strings(&["draftkings"]),
        day(17),
    )
    .await
    .unwrap();

    assert_eq!(report.failed_fetches, 1);
    let records = report.records();
    assert_eq!(records.len(), 1);
    // No NBA pair reaches 11.0; the first qualifying triple wins.
    assert_eq!(
        records[0].result.bets,
        vec![
            "Celtics vs Knicks - Celtics",
            "Celtics vs Knicks - Knicks",
            "Nuggets vs Jazz - Jazz",
        ]
    );
}

#[tokio::test]
async fn test_implied_estimator_hit_rate_matches_price() {
    let source = MockSource::default_slate();
    let engine = ParlayEngine::new(Arc::new(ImpliedProbabilityEstimator), SelectorConfig::default());

    let report = run_generation(
        &source,
        &engine,
        None,
        &strings(&["basketball_nba", "baseball_mlb"]),
        &strings(&["draftkings"]),
        day(17),
    )
    .await
    .unwrap();

    let record = report.records()[0].clone();
    let joint_decimal = american_to_decimal(record.result.american_odds).unwrap();
    assert!(joint_decimal >= 11.0 - 1e-9);
    assert!((record.result.hit_rate * joint_decimal - 1.0).abs() < 1e-9);
    assert!(record.id.is_none());
}

#[tokio::test]
async fn test_unfavourable_market_returns_no_parlay() {
    let source = MockSource::new().with_event("basketball_nba", "Lakers", "Spurs", -120.0, 100.0);
    let store = ParlayStore::in_memory().await.unwrap();

    let report = run_generation(
        &source,
        &constant_engine(),
        Some(&store),
        &strings(&["basketball_nba"]),
        &strings(&["draftkings"]),
        day(17),
    )
    .await
    .unwrap();

    assert!(report.records().is_empty());
    assert_eq!(format_parlays(report.records().iter().map(|r| &r.result)), NO_PARLAYS);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_history_after_two_days() {
    let source = MockSource::default_slate();
    let store = ParlayStore::in_memory().await.unwrap();
    assert_eq!(format_history(&store.recent(10).await.unwrap()), NO_HISTORY);

    for d in [16, 17] {
        run_generation(
            &source,
            &constant_engine(),
            Some(&store),
            &strings(&["basketball_nba", "baseball_mlb"]),
            &strings(&["draftkings"]),
            day(d),
        )
        .await
        .unwrap();
    }

    let records = store.recent(10).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, day(17));
    assert_eq!(records[1].date, day(16));

    let text = format_history(&records);
    assert!(text.starts_with("Recent Parlays:"));
    assert!(text.find("2026-10-17").unwrap() < text.find("2026-10-16").unwrap());
    assert!(text.contains("**Outcome**: pending"));
    assert!(text.contains("**Bets**: Nuggets vs Jazz - Jazz, Dodgers vs Rockies - Rockies"));
}
