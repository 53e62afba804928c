//! Win-probability estimation for individual outcomes.
//!
//! Defines the `ProbabilityEstimator` trait and two simple
//! implementations. The engine only depends on the trait, so a real
//! model can be dropped in without touching selection.

use crate::odds;
use crate::types::{ParlayError, RawOutcome};

/// Abstraction over per-outcome probability models.
///
/// Implementors must be deterministic for a given outcome within one
/// generation run; the selector relies on probabilities staying fixed
/// for the whole search.
pub trait ProbabilityEstimator: Send + Sync {
    /// Estimate the probability that `outcome` wins. Expected in (0, 1].
    fn estimate(&self, outcome: &RawOutcome) -> f64;

    /// Model identifier for logging.
    fn name(&self) -> &str;
}

/// Reject estimates outside (0, 1] (NaN included).
pub fn validate_probability(label: &str, p: f64) -> Result<f64, ParlayError> {
    if p > 0.0 && p <= 1.0 {
        Ok(p)
    } else {
        Err(ParlayError::InvalidProbability {
            label: label.to_string(),
            value: p,
        })
    }
}

// ---------------------------------------------------------------------------
// Constant
// ---------------------------------------------------------------------------

/// Returns the same probability for every outcome.
#[derive(Debug, Clone)]
pub struct ConstantEstimator {
    probability: f64,
}

impl ConstantEstimator {
    /// Placeholder value used until a real model exists.
    pub const DEFAULT_PROBABILITY: f64 = 0.6;

    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl Default for ConstantEstimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROBABILITY)
    }
}

impl ProbabilityEstimator for ConstantEstimator {
    fn estimate(&self, _outcome: &RawOutcome) -> f64 {
        self.probability
    }

    fn name(&self) -> &str {
        "constant"
    }
}

// ---------------------------------------------------------------------------
// Implied
// ---------------------------------------------------------------------------

/// Uses the bookmaker's own price: `p = 1 / decimal_odds`.
///
/// Vig is not removed, so probabilities across one market sum above 1.
/// An unparseable price yields NaN, which validation then rejects.
#[derive(Debug, Clone, Default)]
pub struct ImpliedProbabilityEstimator;

impl ProbabilityEstimator for ImpliedProbabilityEstimator {
    fn estimate(&self, outcome: &RawOutcome) -> f64 {
        odds::american_to_decimal(outcome.american_odds)
            .and_then(odds::implied_probability)
            .unwrap_or(f64::NAN)
    }

    fn name(&self) -> &str {
        "implied"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
