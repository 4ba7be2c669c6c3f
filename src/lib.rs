// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod lots;
pub mod models;
pub mod parser;
pub mod summary;
pub mod utils;

pub use error::{ConfigError, GainsError, SkipReason};
pub use lots::{MatchOutcome, OverflowedMatch, UnmatchedSell, match_lots, match_lots_detailed};
pub use models::{Action, AssetType, CapitalGain, CapitalGainsSummary, TaxImplications, Term, Transaction};
pub use parser::{ParseOutcome, SkippedRow, parse_csv, parse_transactions};
pub use summary::{TaxBracket, calculate_capital_gains};
