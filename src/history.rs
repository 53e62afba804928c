//! Text rendering for the command surface.
//!
//! `format_history` renders stored records for the history command and
//! `format_parlays` renders a fresh generation. Neither filters or sorts;
//! records are shown in the order given.

use crate::types::{ParlayRecord, ParlayResult};

pub const NO_HISTORY: &str = "No parlay history available yet.";
pub const NO_PARLAYS: &str = "No suitable parlays found today.";

/// "draftkings" → "Draftkings".
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// American odds with an explicit sign, rounded to whole units.
pub fn format_odds(american: f64) -> String {
    format!("{american:+.0}")
}

/// Probability as a percentage with two decimals.
pub fn format_hit_rate(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

/// Render stored records, one block each.
pub fn format_history(records: &[ParlayRecord]) -> String {
    if records.is_empty() {
        return NO_HISTORY.to_string();
    }

    let mut out = String::from("Recent Parlays:\n\n");
    for record in records {
        let r = &record.result;
        out.push_str(&format!("**Date**: {}, **Platform**: {}\n", record.date, r.platform));
        out.push_str(&format!(
            "**Odds**: {}, **Hit Rate**: {}, **Outcome**: {}\n",
            format_odds(r.american_odds),
            format_hit_rate(r.hit_rate),
            record.status,
        ));
        out.push_str(&format!("**Bets**: {}\n\n", r.bets.join(", ")));
    }
    out
}

/// Render the parlays of one generation run.
pub fn format_parlays<'a, I>(results: I) -> String
where
    I: IntoIterator<Item = &'a ParlayResult>,
{
    let mut out = String::from("Today's Parlays:\n\n");
    let mut any = false;

    for r in results {
        any = true;
        let platform = capitalize(&r.platform);
        out.push_str(&format!("**{platform} Parlay:**\n"));
        for (i, bet) in r.bets.iter().enumerate() {
            out.push_str(&format!("{}. {bet}\n", i + 1));
        }
        out.push_str(&format!("Odds: {}\n", format_odds(r.american_odds)));
        out.push_str(&format!("Estimated Hit Rate: {}\n\n", format_hit_rate(r.hit_rate)));
        out.push_str(&format!("Add these bets to your parlay slip manually on {platform}.\n\n"));
    }

    if any {
        out
    } else {
        NO_PARLAYS.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
