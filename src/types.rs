//! Shared types for the PARLAY engine.
//!
//! These types form the data model used across all modules: raw outcomes
//! as they arrive from the odds feed, validated candidate outcomes, the
//! selector's output, and the persisted parlay record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// A single priced outcome as flattened out of the market feed,
/// before any probability has been attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOutcome {
    /// Human-readable pick, e.g. "Lakers vs Celtics - Lakers".
    pub label: String,
    /// Raw American odds as quoted by the bookmaker.
    pub american_odds: f64,
    /// Sport key the event belongs to ("basketball_nba", ...).
    pub sport: String,
    /// Upstream event identifier.
    pub event_id: String,
    /// Market key ("h2h", "spreads", ...).
    pub market: String,
}

impl RawOutcome {
    /// Minimal outcome with only label and price (sport/event left empty).
    pub fn new(label: impl Into<String>, american_odds: f64) -> Self {
        Self {
            label: label.into(),
            american_odds,
            sport: String::new(),
            event_id: String::new(),
            market: String::new(),
        }
    }
}

impl fmt::Display for RawOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:+})", self.label, self.american_odds)
    }
}

/// A candidate leg: label, estimated win probability and prices.
///
/// Constructed once per generation run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub label: String,
    /// Estimated win probability in (0, 1].
    pub probability: f64,
    /// Decimal odds (>= 1), derived from `american_odds`.
    pub decimal_odds: f64,
    /// Raw American odds, kept for display and audit.
    pub american_odds: f64,
}

impl Outcome {
    /// Whether both probability and odds are usable in products/comparisons.
    pub fn is_finite(&self) -> bool {
        self.probability.is_finite() && self.decimal_odds.is_finite()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | p={:.1}% dec={:.3} ({:+})",
            self.label,
            self.probability * 100.0,
            self.decimal_odds,
            self.american_odds,
        )
    }
}

// ---------------------------------------------------------------------------
// Selection & results
// ---------------------------------------------------------------------------

/// The combination chosen by the selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Chosen legs in selection order.
    pub legs: Vec<Outcome>,
    /// Product of leg probabilities (the hit rate).
    pub joint_probability: f64,
    /// Product of leg decimal odds.
    pub joint_decimal_odds: f64,
}

impl Selection {
    pub fn labels(&self) -> Vec<String> {
        self.legs.iter().map(|l| l.label.clone()).collect()
    }
}

/// A parlay built for one platform, ready to be shown or persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlayResult {
    pub platform: String,
    /// Leg labels in selection order.
    pub bets: Vec<String>,
    /// Joint odds in American format.
    pub american_odds: f64,
    /// Joint probability of every leg winning.
    pub hit_rate: f64,
}

impl fmt::Display for ParlayResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} legs @ {:+.0} | hit rate {:.2}%",
            self.platform,
            self.bets.len(),
            self.american_odds,
            self.hit_rate * 100.0,
        )
    }
}

/// Settlement state of a stored parlay.
///
/// The engine only ever writes `Pending`; `Won`/`Lost` belong to grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParlayStatus {
    Pending,
    Won,
    Lost,
}

impl ParlayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParlayStatus::Pending => "pending",
            ParlayStatus::Won => "won",
            ParlayStatus::Lost => "lost",
        }
    }
}

impl fmt::Display for ParlayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParlayStatus {
    type Err = ParlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ParlayStatus::Pending),
            "won" => Ok(ParlayStatus::Won),
            "lost" => Ok(ParlayStatus::Lost),
            _ => Err(ParlayError::Storage(format!("Unknown parlay outcome: {s}"))),
        }
    }
}

/// A persisted parlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlayRecord {
    /// Store-assigned row id; `None` until inserted.
    pub id: Option<i64>,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub result: ParlayResult,
    pub status: ParlayStatus,
}

impl fmt::Display for ParlayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.date, self.result, self.status)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for PARLAY.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParlayError {
    #[error("Invalid odds {value}: {reason}")]
    InvalidOdds { value: f64, reason: &'static str },

    #[error("Invalid probability {value} for '{label}': must be in (0, 1]")]
    InvalidProbability { label: String, value: f64 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(label: &str, p: f64, d: f64) -> Outcome {
        Outcome {
            label: label.into(),
            probability: p,
            decimal_odds: d,
            american_odds: 0.0,
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [ParlayStatus::Pending, ParlayStatus::Won, ParlayStatus::Lost] {
            let parsed: ParlayStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert_eq!("WON".parse::<ParlayStatus>().unwrap(), ParlayStatus::Won);
    }

    #[test]
    fn test_status_unknown_rejected() {
        assert!("void".parse::<ParlayStatus>().is_err());
    }

    #[test]
    fn test_outcome_is_finite() {
        assert!(leg("a", 0.5, 2.0).is_finite());
        assert!(!leg("a", f64::NAN, 2.0).is_finite());
        assert!(!leg("a", 0.5, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_selection_labels_keep_order() {
        let sel = Selection {
            legs: vec![leg("b", 0.5, 2.0), leg("a", 0.5, 2.0)],
            joint_probability: 0.25,
            joint_decimal_odds: 4.0,
        };
        assert_eq!(sel.labels(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = ParlayRecord {
            id: None,
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            result: ParlayResult {
                platform: "draftkings".into(),
                bets: vec!["x".into()],
                american_odds: 1050.0,
                hit_rate: 0.09,
            },
            status: ParlayStatus::Pending,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["platform"], "draftkings");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["date"], "2026-10-17");
    }

    #[test]
    fn test_error_display() {
        let e = ParlayError::InvalidProbability { label: "x".into(), value: 1.5 };
        assert!(e.to_string().contains("1.5"));
    }
}
