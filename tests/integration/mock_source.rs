//! Mock odds feed for integration testing.
//!
//! Provides a deterministic `MarketDataSource` that serves canned events
//! per sport and can be told to fail specific sports, all in-memory.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use parlay::data::{Bookmaker, BookmakerMarket, MarketDataSource, OddsEvent, PricedOutcome};

/// A mock odds feed keyed by sport.
///
/// Every event is quoted by every bookmaker it is asked about, with the
/// same prices, so per-bookmaker results are directly comparable.
pub struct MockSource {
    events: HashMap<String, Vec<(String, String, Vec<(String, f64)>)>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a head-to-head event to `sport`.
    pub fn with_event(mut self, sport: &str, home: &str, away: &str, home_price: f64, away_price: f64) -> Self {
        self.events.entry(sport.to_string()).or_default().push((
            home.to_string(),
            away.to_string(),
            vec![(home.to_string(), home_price), (away.to_string(), away_price)],
        ));
        self
    }

    /// Make every fetch for `sport` fail.
    pub fn failing(mut self, sport: &str) -> Self {
        self.failing.insert(sport.to_string());
        self
    }

    /// (sport, bookmaker) pairs requested so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// A small slate across two sports with a clear best parlay.
    pub fn default_slate() -> Self {
        Self::new()
            .with_event("basketball_nba", "Celtics", "Knicks", -150.0, 130.0)
            .with_event("basketball_nba", "Nuggets", "Jazz", -400.0, 320.0)
            .with_event("baseball_mlb", "Dodgers", "Rockies", -250.0, 210.0)
            .with_event("baseball_mlb", "Yankees", "Orioles", 105.0, -125.0)
    }
}

#[async_trait]
impl MarketDataSource for MockSource {
    async fn fetch_odds(&self, sport: &str, bookmaker: &str) -> Result<Vec<OddsEvent>> {
        self.calls
            .lock()
            .unwrap()
            .push((sport.to_string(), bookmaker.to_string()));

        if self.failing.contains(sport) {
            return Err(anyhow!("mock upstream failure for {sport}"));
        }

        let events = self.events.get(sport).cloned().unwrap_or_default();
        Ok(events
            .into_iter()
            .enumerate()
            .map(|(i, (home, away, prices))| OddsEvent {
                id: format!("{sport}-{i}"),
                sport_key: sport.to_string(),
                commence_time: None,
                home_team: home,
                away_team: away,
                bookmakers: vec![Bookmaker {
                    key: bookmaker.to_string(),
                    title: bookmaker.to_string(),
                    markets: vec![BookmakerMarket {
                        key: "h2h".to_string(),
                        outcomes: prices
                            .into_iter()
                            .map(|(name, price)| PricedOutcome { name, price, point: None })
                            .collect(),
                    }],
                }],
            })
            .collect())
    }
}
