// SPDX-License-Identifier: CC-BY-NC-ND-4.0

//! Consecutive-zero-power streak computation

use chrono::NaiveDate;

use crate::error::Result;
use crate::ledger::Ledger;

/// Number of consecutive days, ending at and including `asof`, on which
/// `unit` was recorded at exactly 0% power.
///
/// A day with no record stops the walk the same way a nonzero reading
/// does: gaps in the source (a failed scrape, data not yet ingested) must
/// never inflate a streak. Returns 0 when the `asof` record itself is
/// absent or nonzero.
///
/// Read-only; the walk is iterative and terminates at the first missing
/// or nonzero day, which exists at or before the ledger's earliest day.
pub fn zero_streak(ledger: &dyn Ledger, unit: &str, asof: NaiveDate) -> Result<u32> {
    let mut streak = 0u32;
    let mut cursor = asof;

    loop {
        match ledger.power_on(unit, cursor)? {
            Some(0) => streak += 1,
            Some(_) | None => break,
        }
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            // Calendar floor; unreachable with any real ledger.
            None => break,
        }
    }

    Ok(streak)
}
