//! Odds format conversion.
//!
//! American odds quote profit per $100 staked (positive) or the stake
//! needed to profit $100 (negative). Decimal odds are the total payout
//! per unit staked, stake included.

use crate::types::ParlayError;

/// Convert American odds to decimal odds.
///
/// `+150` → `2.5`, `-200` → `1.5`. Zero is not a valid American price.
pub fn american_to_decimal(odds: f64) -> Result<f64, ParlayError> {
    if !odds.is_finite() {
        return Err(ParlayError::InvalidOdds {
            value: odds,
            reason: "American odds must be finite",
        });
    }
    if odds == 0.0 {
        return Err(ParlayError::InvalidOdds {
            value: odds,
            reason: "American odds cannot be zero",
        });
    }

    if odds > 0.0 {
        Ok(1.0 + odds / 100.0)
    } else {
        // odds < 0, so the quotient is negative and the result is > 1.
        Ok(1.0 - 100.0 / odds)
    }
}

/// Convert decimal odds to American odds.
///
/// `2.5` → `+150`, `1.5` → `-200`. Decimal odds of exactly 1 pay nothing
/// and have no American equivalent.
pub fn decimal_to_american(decimal: f64) -> Result<f64, ParlayError> {
    if !decimal.is_finite() {
        return Err(ParlayError::InvalidOdds {
            value: decimal,
            reason: "decimal odds must be finite",
        });
    }
    if decimal == 1.0 {
        return Err(ParlayError::InvalidOdds {
            value: decimal,
            reason: "decimal odds of 1 have no payout",
        });
    }
    if decimal < 1.0 {
        return Err(ParlayError::InvalidOdds {
            value: decimal,
            reason: "decimal odds must be greater than 1",
        });
    }

    if decimal >= 2.0 {
        Ok((decimal - 1.0) * 100.0)
    } else {
        Ok(-100.0 / (decimal - 1.0))
    }
}

/// Bookmaker-implied win probability of a decimal price (`1 / d`).
pub fn implied_probability(decimal: f64) -> Result<f64, ParlayError> {
    if !decimal.is_finite() || decimal < 1.0 {
        return Err(ParlayError::InvalidOdds {
            value: decimal,
            reason: "decimal odds must be finite and at least 1",
        });
    }
    Ok(1.0 / decimal)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
