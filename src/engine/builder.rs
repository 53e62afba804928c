//! Parlay record builder.
//!
//! Wraps a selection into the result/record shapes handed to the store
//! and the message formatter. No side effects.

use chrono::{Local, NaiveDate};

use crate::odds;
use crate::types::{ParlayError, ParlayRecord, ParlayResult, ParlayStatus, Selection};

/// Convert a selection into a displayable result for `platform`.
pub fn build_result(selection: &Selection, platform: &str) -> Result<ParlayResult, ParlayError> {
    Ok(ParlayResult {
        platform: platform.to_string(),
        bets: selection.labels(),
        american_odds: odds::decimal_to_american(selection.joint_decimal_odds)?,
        hit_rate: selection.joint_probability,
    })
}

/// Build a new pending record dated `date`.
pub fn build_record(
    selection: &Selection,
    platform: &str,
    date: NaiveDate,
) -> Result<ParlayRecord, ParlayError> {
    Ok(ParlayRecord {
        id: None,
        date,
        result: build_result(selection, platform)?,
        status: ParlayStatus::Pending,
    })
}

/// Today's local calendar date, the day a generation run is stamped with.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
