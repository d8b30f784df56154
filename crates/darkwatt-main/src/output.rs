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

//! Report serialization and summary rendering

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use darkwatt_core::OutageReport;
use tracing::info;

/// Write the report as pretty JSON at `path`, creating parent directories.
pub fn write_json_report(report: &OutageReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create report directory: {}", parent.display())
        })?;
    }

    let content = serde_json::to_string_pretty(report)?;

    // Atomic write
    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to move report into place at {}", path.display()))?;

    info!("Report written to {}", path.display());
    Ok(())
}

/// Human-readable summary for scheduler logs.
pub fn render_summary(report: &OutageReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Report date: {}", report.report_date);
    let _ = writeln!(out, "Threshold: > {} day(s) at 0%", report.threshold_days);

    if report.flagged_plants.is_empty() {
        let _ = writeln!(out, "FLAGGED: none");
        return out;
    }

    let _ = writeln!(out, "FLAGGED:");
    for plant in &report.flagged_plants {
        let _ = writeln!(out, "- {}: {} day(s)", plant.plant, plant.max_zero_days);
        for unit in &plant.units {
            let _ = writeln!(out, "    * {}: {} day(s)", unit.unit, unit.zero_days);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use darkwatt_core::{FlaggedPlant, FlaggedUnit};
    use tempfile::TempDir;

    fn sample_report() -> OutageReport {
        OutageReport {
            report_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            threshold_days: 40,
            flagged_count: 1,
            flagged_plants: vec![FlaggedPlant {
                plant: "Alpha".to_owned(),
                max_zero_days: 45,
                units: vec![FlaggedUnit {
                    unit: "Alpha Unit 1".to_owned(),
                    zero_days: 45,
                }],
            }],
        }
    }

    #[test]
    fn test_json_report_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("flagged.json");

        let report = sample_report();
        write_json_report(&report, &path).unwrap();

        let loaded: OutageReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, report);

        // The intermediate temp file must be gone after the rename.
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_json_field_names_are_stable() {
        let json = serde_json::to_string(&sample_report()).unwrap();

        // Downstream consumers key on these names.
        assert!(json.contains("\"report_date\":\"2025-03-10\""));
        assert!(json.contains("\"threshold_days\":40"));
        assert!(json.contains("\"flagged_count\":1"));
        assert!(json.contains("\"flagged_plants\""));
        assert!(json.contains("\"max_zero_days\":45"));
        assert!(json.contains("\"zero_days\":45"));
    }

    #[test]
    fn test_summary_lists_flagged_plants_and_units() {
        let summary = render_summary(&sample_report());

        assert!(summary.contains("Report date: 2025-03-10"));
        assert!(summary.contains("Threshold: > 40 day(s) at 0%"));
        assert!(summary.contains("- Alpha: 45 day(s)"));
        assert!(summary.contains("* Alpha Unit 1: 45 day(s)"));
    }

    #[test]
    fn test_summary_for_empty_report() {
        let report = OutageReport {
            report_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            threshold_days: 40,
            flagged_count: 0,
            flagged_plants: vec![],
        };

        let summary = render_summary(&report);
        assert!(summary.contains("FLAGGED: none"));
    }
}
