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

//! DarkWatt - Entry point for the daily tracking binary
//!
//! Intended to run once a day from a scheduler: fetch the regulator's
//! reactor status page, fold today's snapshot into the ledger, and emit
//! the flagged-plant report. Any failure aborts the run before the report
//! is written.

mod config;
mod ingest;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use darkwatt_core::{SqliteLedger, SuffixResolver, run_daily};
use tracing::info;

use crate::config::AppConfig;
use crate::ingest::{StatusPageClient, parse_unit_rows};
use crate::output::{render_summary, write_json_report};

#[derive(Parser)]
#[command(name = "darkwatt")]
#[command(about = "Track nuclear units at 0% power and flag extended outages", long_about = None)]
struct Cli {
    /// Path to the configuration file (default: ./config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the ledger database path
    #[arg(long)]
    database: Option<PathBuf>,

    /// Override the flagging threshold (days)
    #[arg(long)]
    threshold_days: Option<u32>,

    /// Override the JSON report path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Ingest a saved status page instead of fetching over HTTP
    #[arg(long)]
    snapshot_html: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("darkwatt=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.storage.database_path = database;
    }
    if let Some(threshold_days) = cli.threshold_days {
        config.monitor.threshold_days = threshold_days;
    }
    if let Some(report) = cli.report {
        config.output.report_path = report;
    }
    config.validate()?;

    info!(
        "Starting daily run: threshold > {} day(s), ledger at {}",
        config.monitor.threshold_days,
        config.storage.database_path.display()
    );

    let html = match cli.snapshot_html {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot file {}", path.display()))?,
        None => {
            let client = StatusPageClient::new(
                config.monitor.status_url.clone(),
                Duration::from_secs(config.monitor.request_timeout_secs),
            )?;
            client.fetch()?
        }
    };

    let snapshot = parse_unit_rows(&html)?;

    // Best effort: the page carries no machine-readable date.
    let report_date = chrono::Utc::now().date_naive();

    let ledger = SqliteLedger::open(&config.storage.database_path)?;
    let report = run_daily(
        &ledger,
        &SuffixResolver,
        report_date,
        &snapshot,
        config.monitor.threshold_days,
    )?;

    write_json_report(&report, &config.output.report_path)?;
    print!("{}", render_summary(&report));

    Ok(())
}
