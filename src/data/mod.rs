//! Market-data sources.
//!
//! Defines the `MarketDataSource` trait, the nested event → bookmaker →
//! market → outcome feed shape, and the flattening of that feed into the
//! `RawOutcome`s the engine consumes.

pub mod odds_api;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::RawOutcome;

/// Abstraction over odds feeds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch upcoming events with odds for one sport, limited to one bookmaker.
    async fn fetch_odds(&self, sport: &str, bookmaker: &str) -> Result<Vec<OddsEvent>>;
}

// ---------------------------------------------------------------------------
// Feed shape
// ---------------------------------------------------------------------------

/// One upcoming event with the odds each bookmaker offers on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsEvent {
    pub id: String,
    #[serde(default)]
    pub sport_key: String,
    #[serde(default)]
    pub commence_time: Option<String>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmaker {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub markets: Vec<BookmakerMarket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmakerMarket {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<PricedOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedOutcome {
    pub name: String,
    /// American odds (the client requests `oddsFormat=american`).
    pub price: f64,
    /// Handicap/total line for spread and totals markets.
    #[serde(default)]
    pub point: Option<f64>,
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Label shown for one pick: "Home vs Away - Outcome".
pub fn outcome_label(event: &OddsEvent, outcome: &PricedOutcome) -> String {
    match outcome.point {
        Some(point) => format!(
            "{} vs {} - {} {:+}",
            event.home_team, event.away_team, outcome.name, point
        ),
        None => format!("{} vs {} - {}", event.home_team, event.away_team, outcome.name),
    }
}

/// Flatten events into raw outcomes for `bookmaker`, in feed order.
///
/// Bookmakers other than `bookmaker` are ignored.
pub fn flatten_events(events: &[OddsEvent], bookmaker: &str) -> Vec<RawOutcome> {
    let mut out = Vec::new();
    for event in events {
        for book in event.bookmakers.iter().filter(|b| b.key == bookmaker) {
            for market in &book.markets {
                for outcome in &market.outcomes {
                    out.push(RawOutcome {
                        label: outcome_label(event, outcome),
                        american_odds: outcome.price,
                        sport: event.sport_key.clone(),
                        event_id: event.id.clone(),
                        market: market.key.clone(),
                    });
                }
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
