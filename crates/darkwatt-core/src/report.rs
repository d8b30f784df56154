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

//! Flagged-plant report assembly

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::plant::{PlantResolver, group_by_plant};
use crate::types::{FlaggedPlant, FlaggedUnit, OutageReport};

/// Roll per-unit streaks up to plants and build the flagged-plant report.
///
/// A plant is flagged only when its longest unit streak strictly exceeds
/// `threshold_days`; a plant sitting exactly at the threshold is not
/// included. Within a flagged plant, only units with a nonzero streak are
/// listed. Ordering is deterministic: plants by `max_zero_days` descending
/// then plant ascending, units by `zero_days` descending then unit
/// ascending. An empty report is a normal outcome.
pub fn build_report(
    resolver: &dyn PlantResolver,
    report_date: NaiveDate,
    threshold_days: u32,
    unit_streaks: &BTreeMap<String, u32>,
) -> OutageReport {
    let groups = group_by_plant(resolver, unit_streaks);

    let mut flagged_plants: Vec<FlaggedPlant> = groups
        .into_iter()
        .filter(|(_, group)| group.max_zero_days > threshold_days)
        .map(|(plant, group)| {
            let mut units: Vec<FlaggedUnit> = group
                .units
                .into_iter()
                .filter(|(_, zero_days)| *zero_days > 0)
                .map(|(unit, zero_days)| FlaggedUnit { unit, zero_days })
                .collect();
            units.sort_by(|a, b| {
                b.zero_days
                    .cmp(&a.zero_days)
                    .then_with(|| a.unit.cmp(&b.unit))
            });
            FlaggedPlant {
                plant,
                max_zero_days: group.max_zero_days,
                units,
            }
        })
        .collect();

    flagged_plants.sort_by(|a, b| {
        b.max_zero_days
            .cmp(&a.max_zero_days)
            .then_with(|| a.plant.cmp(&b.plant))
    });

    debug!(
        "Flagged {} of {} tracked units' plants above {} day(s)",
        flagged_plants.len(),
        unit_streaks.len(),
        threshold_days
    );

    OutageReport {
        report_date,
        threshold_days,
        flagged_count: flagged_plants.len(),
        flagged_plants,
    }
}
