// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of DarkWatt.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One unit's reported output in a daily snapshot, as parsed from the
/// regulator's status page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStatus {
    /// Unit label exactly as reported (e.g. "Browns Ferry Unit 3").
    pub unit: String,
    /// Percent of rated power (0-100).
    pub power_pct: u8,
}

/// A persisted daily observation. At most one record per (date, unit);
/// re-ingesting a day overwrites that day only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDayRecord {
    pub date: NaiveDate,
    pub unit: String,
    pub power_pct: u8,
}

/// A unit listed under a flagged plant. Only units currently at zero
/// (`zero_days > 0`) appear in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedUnit {
    pub unit: String,
    pub zero_days: u32,
}

/// A plant whose longest current unit streak exceeds the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedPlant {
    pub plant: String,
    /// Longest consecutive-zero streak among the plant's units.
    pub max_zero_days: u32,
    /// Units with a nonzero streak, longest first.
    pub units: Vec<FlaggedUnit>,
}

/// The daily report handed to the output layer. An empty `flagged_plants`
/// list is a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageReport {
    pub report_date: NaiveDate,
    pub threshold_days: u32,
    pub flagged_count: usize,
    pub flagged_plants: Vec<FlaggedPlant>,
}
