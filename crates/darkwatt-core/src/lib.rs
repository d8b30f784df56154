// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of DarkWatt.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! DarkWatt Tracking Core
//!
//! Time-series tracking and streak aggregation for nuclear generating
//! units reporting 0% power.
//!
//! ## Features
//!
//! - **Daily Ledger**: durable, idempotent per-(day, unit) history in SQLite
//! - **Streak Calculation**: consecutive-zero-day walks with conservative
//!   gap handling (a missing observation breaks a streak)
//! - **Plant Rollup**: unit-label normalization and per-plant maxima
//! - **Flagging**: deterministic threshold report for the output layer
//!
//! The core performs no network I/O and no formatting; fetching the status
//! page and rendering reports live in the `darkwatt` binary.

pub mod error;
pub mod ledger;
pub mod plant;
pub mod report;
pub mod streak;
pub mod types;

pub use error::{Result, TrackerError};
pub use ledger::{Ledger, SqliteLedger};
pub use plant::{PlantGroup, PlantResolver, SuffixResolver, group_by_plant};
pub use report::build_report;
pub use streak::zero_streak;
pub use types::*;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::info;

/// Run one day's cycle against the ledger: record the snapshot, recompute
/// every recorded unit's streak, and assemble the flagged-plant report.
///
/// Fails fast on storage errors or an empty snapshot; the only mutation is
/// the single atomic upsert, so a failed run leaves history exactly as the
/// failing step found it and no report is produced.
pub fn run_daily(
    ledger: &dyn Ledger,
    resolver: &dyn PlantResolver,
    report_date: NaiveDate,
    snapshot: &[UnitStatus],
    threshold_days: u32,
) -> Result<OutageReport> {
    ledger.ensure_schema()?;
    ledger.upsert_day(report_date, snapshot)?;
    info!("Recorded snapshot of {} units for {report_date}", snapshot.len());

    let mut unit_streaks = BTreeMap::new();
    for unit in ledger.units_on(report_date)? {
        let zero_days = zero_streak(ledger, &unit, report_date)?;
        unit_streaks.insert(unit, zero_days);
    }

    Ok(build_report(resolver, report_date, threshold_days, &unit_streaks))
}
