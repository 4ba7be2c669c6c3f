// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::calc::required_path;
use crate::config::Config;
use crate::parser::parse_csv;
use crate::utils::{format_currency, maybe_print_json, pretty_table, read_transactions_file};
use anyhow::Result;

pub fn handle(cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let path = required_path(sub)?;
    let content = read_transactions_file(path)?;
    let outcome = parse_csv(&content);
    if sub.get_flag("strict") || cfg.strict {
        outcome.ensure_clean()?;
    }

    if maybe_print_json(sub.get_flag("json"), false, &outcome)? {
        return Ok(());
    }

    let rows = outcome
        .transactions
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.symbol.clone(),
                t.r#type.to_string(),
                t.action.to_string(),
                t.date.to_string(),
                t.quantity.normalize().to_string(),
                format_currency(t.price),
                format_currency(t.fees),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Symbol", "Type", "Action", "Date", "Qty", "Price", "Fees"],
            rows
        )
    );

    if outcome.skipped.is_empty() {
        println!("All {} rows parsed", outcome.total_rows());
    } else {
        let skipped = outcome
            .skipped
            .iter()
            .map(|s| vec![s.line.to_string(), s.reason.to_string()])
            .collect();
        println!("{}", pretty_table(&["Line", "Skipped because"], skipped));
    }
    Ok(())
}
