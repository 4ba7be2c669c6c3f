// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::calc::{load_transactions, required_path, resolve_bracket};
use crate::config::Config;
use crate::lots::match_lots;
use crate::models::CapitalGainsSummary;
use anyhow::{Context, Result, bail};

pub fn handle(cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let path = required_path(sub)?;
    let out = sub
        .get_one::<String>("out")
        .map(|s| s.trim())
        .context("--out is required")?;
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let strict = sub.get_flag("strict") || cfg.strict;

    let transactions = load_transactions(path, strict)?;
    let gains = match_lots(&transactions);

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            for gain in &gains {
                wtr.serialize(gain)?;
            }
            wtr.flush()?;
        }
        "json" => {
            let bracket = resolve_bracket(cfg, sub)?;
            let summary = CapitalGainsSummary::from_gains(gains, bracket);
            std::fs::write(out, serde_json::to_string_pretty(&summary)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported capital gains to {}", out);
    Ok(())
}
