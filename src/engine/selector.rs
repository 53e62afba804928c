//! Combinatorial parlay selection.
//!
//! Enumerates every combination of 1..=`max_legs` candidates whose joint
//! decimal odds reach the configured minimum and keeps the one with the
//! highest joint probability (legs treated as independent).
//!
//! Order of enumeration is fixed: by leg count, then lexicographically by
//! position in the candidate set. A combination replaces the current best
//! only if its probability is strictly greater, so among exact ties the
//! earliest one wins.
//!
//! Two cuts keep the search cheap without changing the answer:
//! - a prefix whose probability is already no better than the best found
//!   cannot improve, since every further leg multiplies by at most 1;
//! - a prefix whose odds cannot reach the minimum even with the longest
//!   remaining prices is skipped.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{Outcome, ParlayError, Selection};

/// Relative slack on the odds ceiling so float rounding never prunes a
/// combination whose computed product would land exactly on the minimum.
const ODDS_CEILING_SLACK: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Largest number of legs in a parlay.
    #[serde(default = "default_max_legs")]
    pub max_legs: usize,
    /// Joint decimal odds a parlay must reach (11.0 ≈ +1000).
    #[serde(default = "default_min_odds")]
    pub min_combined_decimal_odds: f64,
}

fn default_max_legs() -> usize {
    5
}

fn default_min_odds() -> f64 {
    11.0
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_legs: default_max_legs(),
            min_combined_decimal_odds: default_min_odds(),
        }
    }
}

impl SelectorConfig {
    pub fn validate(&self) -> Result<(), ParlayError> {
        if self.max_legs == 0 {
            return Err(ParlayError::Config("max_legs must be at least 1".into()));
        }
        if !self.min_combined_decimal_odds.is_finite() || self.min_combined_decimal_odds <= 1.0 {
            return Err(ParlayError::Config(format!(
                "min_combined_decimal_odds must be finite and greater than 1, got {}",
                self.min_combined_decimal_odds
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

pub struct ParlaySelector {
    config: SelectorConfig,
}

impl ParlaySelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// Pick the eligible combination with the greatest joint probability.
    ///
    /// Returns `None` when nothing qualifies (including empty input).
    /// Outcomes with non-finite values, a probability outside (0, 1] or
    /// decimal odds below 1 are skipped before the search.
    pub fn select(&self, candidates: &[Outcome]) -> Option<Selection> {
        let pool: Vec<&Outcome> = candidates
            .iter()
            .filter(|o| {
                let usable = o.is_finite()
                    && o.probability > 0.0
                    && o.probability <= 1.0
                    && o.decimal_odds >= 1.0;
                if !usable {
                    warn!(
                        label = %o.label,
                        probability = o.probability,
                        decimal_odds = o.decimal_odds,
                        "Skipping unusable outcome"
                    );
                }
                usable
            })
            .collect();

        if pool.is_empty() || self.config.max_legs == 0 {
            return None;
        }

        let max_legs = self.config.max_legs.min(pool.len());

        // suffix_max[i]: longest price among pool[i..]
        let mut suffix_max = vec![1.0_f64; pool.len() + 1];
        for i in (0..pool.len()).rev() {
            suffix_max[i] = pool[i].decimal_odds.max(suffix_max[i + 1]);
        }

        let mut search = Search {
            pool: &pool,
            suffix_max: &suffix_max,
            min_odds: self.config.min_combined_decimal_odds,
            stack: Vec::with_capacity(max_legs),
            best: None,
            best_probability: 0.0,
            evaluated: 0,
        };

        for size in 1..=max_legs {
            search.visit(0, size, 1.0, 1.0);
        }

        debug!(
            pool = pool.len(),
            max_legs,
            evaluated = search.evaluated,
            found = search.best.is_some(),
            "Selector search finished"
        );

        let best = search.best?;
        Some(Selection {
            legs: best.indices.iter().map(|&i| pool[i].clone()).collect(),
            joint_probability: best.probability,
            joint_decimal_odds: best.decimal_odds,
        })
    }
}

struct Best {
    indices: Vec<usize>,
    probability: f64,
    decimal_odds: f64,
}

/// Depth-first walk over fixed-size index combinations.
struct Search<'a> {
    pool: &'a [&'a Outcome],
    suffix_max: &'a [f64],
    min_odds: f64,
    stack: Vec<usize>,
    best: Option<Best>,
    best_probability: f64,
    evaluated: u64,
}

impl Search<'_> {
    fn visit(&mut self, start: usize, remaining: usize, probability: f64, decimal_odds: f64) {
        if remaining == 0 {
            self.evaluated += 1;
            if decimal_odds >= self.min_odds && probability > self.best_probability {
                self.best_probability = probability;
                self.best = Some(Best {
                    indices: self.stack.clone(),
                    probability,
                    decimal_odds,
                });
            }
            return;
        }

        // Leave room for the legs still to be chosen after this one.
        let last = self.pool.len() - remaining;
        for i in start..=last {
            let leg = self.pool[i];
            let p = probability * leg.probability;
            if p <= self.best_probability {
                continue;
            }

            let d = decimal_odds * leg.decimal_odds;
            let rest = remaining - 1;
            if rest > 0 {
                let ceiling = d * self.suffix_max[i + 1].powi(rest as i32);
                if ceiling * (1.0 + ODDS_CEILING_SLACK) < self.min_odds {
                    continue;
                }
            }

            self.stack.push(i);
            self.visit(i + 1, rest, p, d);
            self.stack.pop();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
