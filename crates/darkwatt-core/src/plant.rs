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

//! Unit-label to plant-identifier resolution and grouping

use std::collections::BTreeMap;

/// Derives a plant identifier from a raw unit label.
///
/// Kept behind a trait so the string heuristic can later be replaced by a
/// registry lookup without touching the aggregation code.
pub trait PlantResolver {
    fn plant_of(&self, unit_label: &str) -> String;
}

/// Label heuristic: a unit label is the plant name plus a trailing unit
/// number, either as a bare number ("Diablo Canyon 2") or a "Unit N"
/// phrase ("Browns Ferry Unit 3").
///
/// This is best-effort string matching, not a verified plant registry.
/// Two different plants sharing a normalized prefix would merge, and a
/// plant whose own name ends in a digit run loses that run. Both are
/// accepted limitations of the upstream label format.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixResolver;

impl PlantResolver for SuffixResolver {
    fn plant_of(&self, unit_label: &str) -> String {
        let label = unit_label.trim();

        // Locate the trailing ASCII digit run, if any.
        let digits_start = label
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i);

        let Some(digits_start) = digits_start else {
            return label.to_owned();
        };
        if digits_start == 0 {
            // Nothing but digits; leave it alone.
            return label.to_owned();
        }

        #[expect(clippy::string_slice, reason = "digits_start is a char boundary")]
        let head = &label[..digits_start];
        let head_trimmed = head.trim_end();

        // "<plant> Unit <n>", case-insensitive, whitespace optional.
        if head_trimmed.to_ascii_lowercase().ends_with("unit") {
            #[expect(clippy::string_slice, reason = "suffix is 4 ASCII bytes")]
            let base = &head_trimmed[..head_trimmed.len() - 4];
            return base.trim().to_owned();
        }

        // "<plant> <n>": whitespace between name and number is required,
        // so a name with a glued digit ("Reactor9") passes through.
        if head.len() != head_trimmed.len() {
            return head_trimmed.to_owned();
        }

        label.to_owned()
    }
}

/// Per-plant rollup of unit streaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantGroup {
    /// (unit label, streak) for every unit resolving to this plant.
    pub units: Vec<(String, u32)>,
    /// Longest streak among the plant's units.
    pub max_zero_days: u32,
}

/// Partition a unit-to-streak mapping into plant buckets.
pub fn group_by_plant(
    resolver: &dyn PlantResolver,
    unit_streaks: &BTreeMap<String, u32>,
) -> BTreeMap<String, PlantGroup> {
    let mut groups: BTreeMap<String, PlantGroup> = BTreeMap::new();
    for (unit, &streak) in unit_streaks {
        let plant = resolver.plant_of(unit);
        let group = groups.entry(plant).or_insert_with(|| PlantGroup {
            units: Vec::new(),
            max_zero_days: 0,
        });
        group.units.push((unit.clone(), streak));
        group.max_zero_days = group.max_zero_days.max(streak);
    }
    groups
}
