//! The Odds API v4 client.
//!
//! API docs: https://the-odds-api.com/liveapi/guides/v4/
//! Base URL: https://api.the-odds-api.com/v4
//! Auth: `apiKey` query parameter. Every odds request spends quota;
//! the remaining allowance comes back in `x-requests-remaining`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, info};

use super::{MarketDataSource, OddsEvent};
use crate::config::OddsApiConfig;

pub const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com/v4";
const SOURCE_NAME: &str = "the-odds-api";

/// Client for `/sports/{sport}/odds`.
pub struct OddsApiClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    regions: String,
    markets: String,
}

impl OddsApiClient {
    pub fn new(api_key: SecretString, config: &OddsApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("PARLAY/0.1.0")
            .build()
            .context("Failed to build HTTP client for The Odds API")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            regions: config.regions.clone(),
            markets: config.markets.clone(),
        })
    }

    /// Request URL without the API key (safe to log).
    fn odds_path(&self, sport: &str, bookmaker: &str) -> String {
        format!(
            "{}/sports/{}/odds/?regions={}&markets={}&bookmakers={}&oddsFormat=american",
            self.base_url,
            urlencoding::encode(sport),
            urlencoding::encode(&self.regions),
            urlencoding::encode(&self.markets),
            urlencoding::encode(bookmaker),
        )
    }

    fn odds_url(&self, sport: &str, bookmaker: &str) -> String {
        format!(
            "{}&apiKey={}",
            self.odds_path(sport, bookmaker),
            urlencoding::encode(self.api_key.expose_secret()),
        )
    }
}

#[async_trait]
impl MarketDataSource for OddsApiClient {
    async fn fetch_odds(&self, sport: &str, bookmaker: &str) -> Result<Vec<OddsEvent>> {
        debug!(url = %self.odds_path(sport, bookmaker), "Fetching odds");

        let resp = self
            .http
            .get(self.odds_url(sport, bookmaker))
            .send()
            .await
            .with_context(|| format!("{SOURCE_NAME} request failed for {sport}/{bookmaker}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("{SOURCE_NAME} error {status} for {sport}/{bookmaker}: {body}");
        }

        let remaining = resp
            .headers()
            .get("x-requests-remaining")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let events: Vec<OddsEvent> = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse {SOURCE_NAME} odds for {sport}/{bookmaker}"))?;

        info!(
            sport,
            bookmaker,
            events = events.len(),
            quota_remaining = remaining.as_deref().unwrap_or("?"),
            "Odds fetched"
        );

        Ok(events)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
