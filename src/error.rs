// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

/// Why the parser dropped an input row.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    #[error("missing symbol")]
    MissingSymbol,
    #[error("missing action column")]
    MissingAction,
    #[error("missing date")]
    MissingDate,
    #[error("unrecognized date")]
    InvalidDate,
    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,
    #[error("price must be greater than zero")]
    NonPositivePrice,
}

#[derive(thiserror::Error, Debug)]
pub enum GainsError {
    #[error("No valid transactions found")]
    NoValidTransactions,
    #[error("{count} row(s) skipped, first at line {first_line}: {reason}")]
    SkippedRows {
        count: usize,
        first_line: usize,
        reason: SkipReason,
    },
    #[error("Tax bracket {0} must be between 0 and 1")]
    InvalidTaxBracket(Decimal),
    #[error("Invalid tax bracket '{0}', expected a rate like 0.24 or 24%")]
    InvalidRate(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine platform-specific config dir")]
    NoConfigDir,
    #[error("Failed to read config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write config {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
