//! Candidate set construction.
//!
//! Turns flattened raw outcomes into validated `Outcome`s: converts the
//! American price, asks the estimator for a probability and drops any
//! outcome that fails either step. A bad outcome never reaches the
//! selector, and the caller gets the list of what was dropped.

use tracing::{debug, warn};

use crate::estimator::{validate_probability, ProbabilityEstimator};
use crate::odds;
use crate::types::{Outcome, ParlayError, RawOutcome};

/// An outcome that was left out of the candidate set, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedOutcome {
    pub label: String,
    pub error: ParlayError,
}

/// Validated outcomes for one bookmaker on one run, in feed order.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub outcomes: Vec<Outcome>,
    pub dropped: Vec<DroppedOutcome>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

/// Build one candidate from a raw outcome.
///
/// Odds are checked before the estimator is consulted.
pub fn to_outcome(
    raw: &RawOutcome,
    estimator: &dyn ProbabilityEstimator,
) -> Result<Outcome, ParlayError> {
    let decimal_odds = odds::american_to_decimal(raw.american_odds)?;
    let probability = validate_probability(&raw.label, estimator.estimate(raw))?;

    Ok(Outcome {
        label: raw.label.clone(),
        probability,
        decimal_odds,
        american_odds: raw.american_odds,
    })
}

/// Build the candidate set, keeping the input order.
pub fn build_candidates(raw: &[RawOutcome], estimator: &dyn ProbabilityEstimator) -> CandidateSet {
    let mut set = CandidateSet {
        outcomes: Vec::with_capacity(raw.len()),
        dropped: Vec::new(),
    };

    for r in raw {
        match to_outcome(r, estimator) {
            Ok(outcome) => set.outcomes.push(outcome),
            Err(error) => {
                warn!(outcome = %r, error = %error, "Dropping outcome");
                set.dropped.push(DroppedOutcome {
                    label: r.label.clone(),
                    error,
                });
            }
        }
    }

    debug!(
        estimator = estimator.name(),
        candidates = set.outcomes.len(),
        dropped = set.dropped.len(),
        "Candidate set built"
    );

    set
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
