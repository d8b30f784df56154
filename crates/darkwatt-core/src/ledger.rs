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

//! Durable daily ledger of per-unit power observations

use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::types::{UnitDayRecord, UnitStatus};

/// Source of truth for observation history.
///
/// This abstraction keeps the streak and rollup logic independent of the
/// storage engine; `SqliteLedger` is the embedded default.
pub trait Ledger: Send + Sync {
    /// Create the schema if it does not exist. Safe to call repeatedly;
    /// never destroys existing data.
    fn ensure_schema(&self) -> Result<()>;

    /// Record one day's snapshot. Replaces any existing records for the
    /// same (date, unit) pairs and leaves every other day untouched.
    /// Atomic per call: either the whole day commits or nothing does.
    fn upsert_day(&self, date: NaiveDate, units: &[UnitStatus]) -> Result<()>;

    /// Unit labels recorded for `date`, ordered lexicographically.
    fn units_on(&self, date: NaiveDate) -> Result<Vec<String>>;

    /// Stored power for (unit, date). `None` means no record exists,
    /// which is distinct from a recorded 0%.
    fn power_on(&self, unit: &str, date: NaiveDate) -> Result<Option<u8>>;

    /// All records for `date`, ordered by unit label.
    fn day_records(&self, date: NaiveDate) -> Result<Vec<UnitDayRecord>>;
}

#[derive(Debug)]
pub struct SqliteLedger {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteLedger {
    /// Open (or create) the ledger database at `path`, creating parent
    /// directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = rusqlite::Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory ledger for tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl Ledger for SqliteLedger {
    fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn.lock().expect("ledger mutex poisoned");
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS daily_power (
                day        TEXT NOT NULL,
                unit       TEXT NOT NULL,
                power_pct  INTEGER NOT NULL,
                PRIMARY KEY (day, unit)
            );

            CREATE INDEX IF NOT EXISTS idx_daily_power_unit_day
                ON daily_power(unit, day);",
        )?;
        Ok(())
    }

    fn upsert_day(&self, date: NaiveDate, units: &[UnitStatus]) -> Result<()> {
        if units.is_empty() {
            return Err(TrackerError::EmptySnapshot);
        }

        let mut conn = self.conn.lock().expect("ledger mutex poisoned");
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO daily_power (day, unit, power_pct)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(day, unit) DO UPDATE SET
                    power_pct = excluded.power_pct",
            )?;
            for status in units {
                stmt.execute(params![date, status.unit, status.power_pct])?;
            }
        }
        tx.commit()?;

        debug!("Recorded {} unit readings for {}", units.len(), date);
        Ok(())
    }

    fn units_on(&self, date: NaiveDate) -> Result<Vec<String>> {
        let conn = self.conn.lock().expect("ledger mutex poisoned");
        let mut stmt = conn.prepare("SELECT unit FROM daily_power WHERE day = ?1 ORDER BY unit")?;
        let units = stmt
            .query_map(params![date], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(units)
    }

    fn power_on(&self, unit: &str, date: NaiveDate) -> Result<Option<u8>> {
        let conn = self.conn.lock().expect("ledger mutex poisoned");
        let power = conn
            .query_row(
                "SELECT power_pct FROM daily_power WHERE unit = ?1 AND day = ?2",
                params![unit, date],
                |row| row.get(0),
            )
            .optional()?;
        Ok(power)
    }

    fn day_records(&self, date: NaiveDate) -> Result<Vec<UnitDayRecord>> {
        let conn = self.conn.lock().expect("ledger mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT day, unit, power_pct FROM daily_power WHERE day = ?1 ORDER BY unit",
        )?;
        let records = stmt
            .query_map(params![date], |row| {
                Ok(UnitDayRecord {
                    date: row.get(0)?,
                    unit: row.get(1)?,
                    power_pct: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
