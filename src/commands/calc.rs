// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::models::{CapitalGain, CapitalGainsSummary, Transaction};
use crate::parser::parse_csv;
use crate::summary::{TaxBracket, calculate_capital_gains};
use crate::utils::{
    format_currency, format_date, format_rate, maybe_print_json, pretty_table,
    read_transactions_file, summary_message,
};
use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::warn;

pub fn handle(cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let path = required_path(sub)?;
    let strict = sub.get_flag("strict") || cfg.strict;
    let bracket = resolve_bracket(cfg, sub)?;

    let transactions = load_transactions(path, strict)?;
    let summary = calculate_capital_gains(&transactions, bracket);

    if sub.get_flag("message") {
        println!("{}", summary_message(&summary, transactions.len()));
        return Ok(());
    }
    if sub.get_flag("jsonl") {
        let gains: Vec<&CapitalGain> = summary
            .short_term_gains
            .iter()
            .chain(&summary.long_term_gains)
            .collect();
        maybe_print_json(false, true, &gains)?;
        return Ok(());
    }
    if maybe_print_json(sub.get_flag("json"), false, &summary)? {
        return Ok(());
    }

    if summary.gain_count() == 0 {
        println!("No sells could be matched against purchases.");
    } else {
        println!("{}", gains_table(&summary));
    }
    println!("{}", totals_table(&summary));
    Ok(())
}

pub fn required_path(sub: &clap::ArgMatches) -> Result<&str> {
    sub.get_one::<String>("path")
        .map(|s| s.trim())
        .context("--path is required")
}

/// `--bracket` wins over the saved default.
pub fn resolve_bracket(cfg: &Config, sub: &clap::ArgMatches) -> Result<TaxBracket> {
    match sub.get_one::<String>("bracket") {
        Some(raw) => raw
            .parse::<TaxBracket>()
            .with_context(|| format!("Invalid --bracket '{}'", raw.trim())),
        None => Ok(cfg.tax_bracket),
    }
}

/// Reads and parses a transaction file. An empty result is always an error;
/// skipped rows are only an error when `strict` is set.
pub fn load_transactions(path: &str, strict: bool) -> Result<Vec<Transaction>> {
    let content = read_transactions_file(path)?;
    let outcome = parse_csv(&content).require_any()?;
    if strict {
        return Ok(outcome.into_strict()?);
    }
    if !outcome.skipped.is_empty() {
        warn!(
            path,
            skipped = outcome.skipped.len(),
            "ignoring rows that are not valid transactions"
        );
    }
    Ok(outcome.transactions)
}

fn signed_currency(amount: rust_decimal::Decimal) -> String {
    if amount.is_sign_negative() {
        format_currency(amount)
    } else {
        format!("+{}", format_currency(amount))
    }
}

pub fn gains_table(summary: &CapitalGainsSummary) -> Table {
    let rows = summary
        .short_term_gains
        .iter()
        .chain(&summary.long_term_gains)
        .map(|g| {
            vec![
                g.symbol.clone(),
                g.term.to_string(),
                format_date(g.buy_date),
                format_date(g.sell_date),
                g.quantity.normalize().to_string(),
                format_currency(g.sale_proceeds),
                format_currency(g.cost_basis),
                signed_currency(g.gain_loss),
            ]
        })
        .collect();
    pretty_table(
        &[
            "Symbol",
            "Term",
            "Bought",
            "Sold",
            "Qty",
            "Proceeds",
            "Cost Basis",
            "Gain/Loss",
        ],
        rows,
    )
}

pub fn totals_table(summary: &CapitalGainsSummary) -> Table {
    let tax = &summary.tax_implications;
    let rows = vec![
        vec![
            "Short-term gain/loss".to_string(),
            format_currency(summary.total_short_term_gain_loss),
            format_rate(tax.short_term_tax_rate),
        ],
        vec![
            "Long-term gain/loss".to_string(),
            format_currency(summary.total_long_term_gain_loss),
            format_rate(tax.long_term_tax_rate),
        ],
        vec![
            "Net capital gain/loss".to_string(),
            format_currency(summary.net_capital_gain_loss),
            String::new(),
        ],
        vec![
            "Estimated tax".to_string(),
            format_currency(tax.estimated_tax),
            String::new(),
        ],
    ];
    pretty_table(&["Total", "Amount", "Rate"], rows)
}
