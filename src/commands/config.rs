// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::summary::TaxBracket;
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle(path: &Path, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => println!("{}", serde_json::to_string_pretty(cfg)?),
        Some(("path", _)) => println!("{}", path.display()),
        Some(("set", sub)) => {
            let updated = apply_updates(cfg, sub)?;
            updated.save_to(path)?;
            println!("Saved config to {}", path.display());
        }
        _ => {}
    }
    Ok(())
}

fn apply_updates(cfg: &Config, sub: &clap::ArgMatches) -> Result<Config> {
    let mut updated = cfg.clone();
    if let Some(raw) = sub.get_one::<String>("bracket") {
        updated.tax_bracket = raw
            .parse::<TaxBracket>()
            .with_context(|| format!("Invalid --bracket '{}'", raw.trim()))?;
    }
    if let Some(strict) = sub.get_one::<bool>("strict") {
        updated.strict = *strict;
    }
    Ok(updated)
}
