//! Core engine: flatten → estimate → select → build, once per bookmaker.
//!
//! `ParlayEngine::run` holds no mutable state. Whole generation runs
//! share one engine and take its generation lock, so a scheduled run and
//! a dashboard request never overlap.

pub mod builder;
pub mod candidates;
pub mod cycle;
pub mod selector;

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::estimator::ProbabilityEstimator;
use crate::types::{ParlayError, ParlayRecord, RawOutcome};
use candidates::build_candidates;
use selector::{ParlaySelector, SelectorConfig};

/// What one engine run produced for one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineReport {
    pub platform: String,
    /// Outcomes that made it into the candidate set.
    pub candidates: usize,
    /// Outcomes dropped for bad odds or a bad probability.
    pub dropped: usize,
    /// `None` when no combination reached the minimum odds.
    pub record: Option<ParlayRecord>,
}

pub struct ParlayEngine {
    estimator: Arc<dyn ProbabilityEstimator>,
    selector: ParlaySelector,
    generation: Mutex<()>,
}

impl ParlayEngine {
    pub fn new(estimator: Arc<dyn ProbabilityEstimator>, config: SelectorConfig) -> Self {
        Self {
            estimator,
            selector: ParlaySelector::new(config),
            generation: Mutex::new(()),
        }
    }

    /// Held for the length of one generation run.
    pub async fn lock_generation(&self) -> MutexGuard<'_, ()> {
        self.generation.lock().await
    }

    pub fn estimator_name(&self) -> &str {
        self.estimator.name()
    }

    /// Build the best parlay for `platform` from its flattened outcomes.
    ///
    /// Only fails if the chosen combination's joint odds cannot be
    /// expressed in American format, which a minimum above 1 rules out.
    pub fn run(
        &self,
        platform: &str,
        raw: &[RawOutcome],
        date: NaiveDate,
    ) -> Result<EngineReport, ParlayError> {
        let set = build_candidates(raw, self.estimator.as_ref());

        let record = match self.selector.select(&set.outcomes) {
            Some(selection) => {
                let record = builder::build_record(&selection, platform, date)?;
                for leg in &selection.legs {
                    debug!(platform, leg = %leg, "Parlay leg");
                }
                info!(
                    platform,
                    legs = selection.legs.len(),
                    odds = format!("{:+.0}", record.result.american_odds),
                    hit_rate = format!("{:.2}%", selection.joint_probability * 100.0),
                    "Parlay selected"
                );
                Some(record)
            }
            None if set.is_empty() => {
                debug!(platform, "No candidates to combine");
                None
            }
            None => {
                debug!(platform, candidates = set.len(), "No eligible combination");
                None
            }
        };

        Ok(EngineReport {
            platform: platform.to_string(),
            candidates: set.len(),
            dropped: set.dropped_count(),
            record,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
