// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Comma-separated transaction exports into typed [`Transaction`] records.
//!
//! Splitting is deliberately naive: lines split on `,` and every `"` is
//! removed from values, so a quoted field containing a comma mis-splits.
//! Rows that fail validation are dropped and reported in
//! [`ParseOutcome::skipped`] instead of failing the whole batch.

use crate::error::{GainsError, SkipReason};
use crate::models::{Action, AssetType, Transaction};
use crate::utils::{parse_number, parse_trade_date};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Symbol,
    Type,
    Action,
    Date,
    Quantity,
    Price,
    Fees,
    Description,
}

static HEADER_ALIASES: Lazy<HashMap<&'static str, Field>> = Lazy::new(|| {
    HashMap::from([
        ("symbol", Field::Symbol),
        ("ticker", Field::Symbol),
        ("type", Field::Type),
        ("action", Field::Action),
        ("side", Field::Action),
        ("date", Field::Date),
        ("trade_date", Field::Date),
        ("quantity", Field::Quantity),
        ("shares", Field::Quantity),
        ("amount", Field::Quantity),
        ("price", Field::Price),
        ("unit_price", Field::Price),
        ("fees", Field::Fees),
        ("commission", Field::Fees),
        ("description", Field::Description),
    ])
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line number in the input, header included.
    pub line: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseOutcome {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedRow>,
}

impl ParseOutcome {
    pub fn total_rows(&self) -> usize {
        self.transactions.len() + self.skipped.len()
    }

    /// Fails when any row was dropped.
    pub fn ensure_clean(&self) -> Result<(), GainsError> {
        match self.skipped.first() {
            Some(first) => Err(GainsError::SkippedRows {
                count: self.skipped.len(),
                first_line: first.line,
                reason: first.reason,
            }),
            None => Ok(()),
        }
    }

    pub fn into_strict(self) -> Result<Vec<Transaction>, GainsError> {
        self.ensure_clean()?;
        Ok(self.transactions)
    }

    /// Fails when nothing usable was found in the input.
    pub fn require_any(self) -> Result<Self, GainsError> {
        if self.transactions.is_empty() {
            Err(GainsError::NoValidTransactions)
        } else {
            Ok(self)
        }
    }
}

/// Collects one row's values. The first column mapped to a field wins.
#[derive(Debug, Default)]
struct TransactionBuilder {
    symbol: Option<String>,
    r#type: Option<AssetType>,
    action: Option<Action>,
    date: Option<String>,
    quantity: Option<Decimal>,
    price: Option<Decimal>,
    fees: Option<Decimal>,
    description: Option<String>,
}

fn set_once<T>(slot: &mut Option<T>, value: impl FnOnce() -> T) {
    if slot.is_none() {
        *slot = Some(value());
    }
}

impl TransactionBuilder {
    fn apply(&mut self, field: Field, value: &str) {
        match field {
            Field::Symbol => set_once(&mut self.symbol, || value.to_uppercase()),
            Field::Type => set_once(&mut self.r#type, || AssetType::from_label(value)),
            Field::Action => set_once(&mut self.action, || Action::from_label(value)),
            Field::Date => set_once(&mut self.date, || value.to_string()),
            Field::Quantity => set_once(&mut self.quantity, || parse_number(value)),
            Field::Price => set_once(&mut self.price, || parse_number(value)),
            Field::Fees => set_once(&mut self.fees, || parse_number(value)),
            Field::Description => set_once(&mut self.description, || value.to_string()),
        }
    }

    fn build(self, id: String) -> Result<Transaction, SkipReason> {
        let symbol = self
            .symbol
            .filter(|s| !s.is_empty())
            .ok_or(SkipReason::MissingSymbol)?;
        let action = self.action.ok_or(SkipReason::MissingAction)?;
        let date_raw = self
            .date
            .filter(|d| !d.is_empty())
            .ok_or(SkipReason::MissingDate)?;
        let date = parse_trade_date(&date_raw).ok_or(SkipReason::InvalidDate)?;

        let quantity = self.quantity.unwrap_or(Decimal::ZERO);
        if quantity <= Decimal::ZERO {
            return Err(SkipReason::NonPositiveQuantity);
        }
        let price = self.price.unwrap_or(Decimal::ZERO);
        if price <= Decimal::ZERO {
            return Err(SkipReason::NonPositivePrice);
        }
        let mut fees = self.fees.unwrap_or(Decimal::ZERO);
        if fees < Decimal::ZERO {
            debug!(%symbol, %fees, "negative fee clamped to zero");
            fees = Decimal::ZERO;
        }

        Ok(Transaction {
            id,
            r#type: self.r#type.unwrap_or_default(),
            symbol,
            action,
            date,
            quantity,
            price,
            fees,
            description: self.description.filter(|d| !d.is_empty()),
        })
    }
}

/// Parses a header line plus data lines, keeping every valid row in file order.
pub fn parse_csv(content: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let content = content.trim();
    if content.is_empty() {
        return outcome;
    }

    let mut lines = content.split('\n');
    let Some(header_line) = lines.next() else {
        return outcome;
    };
    let columns: Vec<Option<Field>> = header_line
        .to_lowercase()
        .split(',')
        .map(|h| HEADER_ALIASES.get(h.trim()).copied())
        .collect();

    for (index, line) in lines.enumerate() {
        let values: Vec<String> = line
            .split(',')
            .map(|v| v.trim().replace('"', ""))
            .collect();

        let mut builder = TransactionBuilder::default();
        for (col, field) in columns.iter().enumerate() {
            if let Some(field) = field {
                let value = values.get(col).map(String::as_str).unwrap_or("");
                builder.apply(*field, value);
            }
        }

        let line_no = index + 2;
        match builder.build(format!("csv-{}", index)) {
            Ok(tx) => outcome.transactions.push(tx),
            Err(reason) => {
                debug!(line = line_no, %reason, "skipping transaction row");
                outcome.skipped.push(SkippedRow {
                    line: line_no,
                    reason,
                });
            }
        }
    }

    info!(
        kept = outcome.transactions.len(),
        skipped = outcome.skipped.len(),
        "parsed transaction rows"
    );
    outcome
}

/// Lenient entry point: the valid transactions only, never an error.
pub fn parse_transactions(content: &str) -> Vec<Transaction> {
    parse_csv(content).transactions
}
