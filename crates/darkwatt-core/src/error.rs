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

//! Error types for the tracking core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("empty snapshot: refusing to record a day with zero unit readings")]
    EmptySnapshot,
}

pub type Result<T> = std::result::Result<T, TrackerError>;
