// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::CapitalGainsSummary;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Upload ceiling for transaction files.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

static NUMBER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?)(\d+(?:\.\d+)?|\.\d+)(?:[eE]([+-]?\d+))?").expect("valid number regex")
});

pub fn parse_trade_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Reads the leading numeric prefix of `s` ("12.5 shares" is 12.5).
/// Text without a numeric prefix, or one that overflows, reads as zero.
pub fn parse_number(s: &str) -> Decimal {
    let Some(caps) = NUMBER_PREFIX.captures(s.trim()) else {
        return Decimal::ZERO;
    };
    let mut text = String::new();
    if &caps[1] == "-" {
        text.push('-');
    }
    let mantissa = &caps[2];
    if mantissa.starts_with('.') {
        text.push('0');
    }
    text.push_str(mantissa);

    let parsed = match caps.get(3) {
        Some(exp) => {
            let exp = exp.as_str().trim_start_matches('+');
            Decimal::from_scientific(&format!("{}e{}", text, exp))
        }
        None => Decimal::from_str(&text),
    };
    parsed.unwrap_or(Decimal::ZERO)
}

/// US dollar formatting: `$1,510.02`, `-$1,234.50`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, cents)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_rate(rate: Decimal) -> String {
    let pct = (rate * Decimal::ONE_HUNDRED).round_dp(0).normalize();
    format!("{}%", pct)
}

/// Notification text shown after a batch of transactions has been processed.
pub fn summary_message(summary: &CapitalGainsSummary, transaction_count: usize) -> String {
    format!(
        "Processed {} transactions and calculated your capital gains.\n\
         Short-term gains/losses: {}\n\
         Long-term gains/losses: {}\n\
         Net capital gain/loss: {}\n\
         Estimated tax: {}",
        transaction_count,
        format_currency(summary.total_short_term_gain_loss),
        format_currency(summary.total_long_term_gain_loss),
        format_currency(summary.net_capital_gain_loss),
        format_currency(summary.tax_implications.estimated_tax),
    )
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Reads a transaction export, applying the upload guards (`.csv` only, 5 MiB ceiling).
pub fn read_transactions_file(path: &str) -> Result<String> {
    let p = Path::new(path);
    let is_csv = p
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        bail!("Please upload a CSV file only: {}", path);
    }
    let meta = fs::metadata(p).with_context(|| format!("Open CSV {}", path))?;
    if meta.len() > MAX_UPLOAD_BYTES {
        bail!("File size must be less than 5MB: {}", path);
    }
    fs::read_to_string(p).with_context(|| format!("Read CSV {}", path))
}
