// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;

use capgains::{cli, commands, config};

fn init_tracing() {
    // RUST_LOG overrides, e.g. `RUST_LOG=capgains=debug` to see skipped rows
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn config_override(matches: &clap::ArgMatches) -> Option<PathBuf> {
    matches
        .get_one::<String>("config")
        .or_else(|| {
            matches
                .subcommand()
                .and_then(|(_, sub)| sub.get_one::<String>("config"))
        })
        .map(|p| PathBuf::from(p.trim()))
}

fn main() -> Result<()> {
    init_tracing();

    let matches = cli::build_cli().get_matches();
    let config_path = match config_override(&matches) {
        Some(path) => path,
        None => config::config_path()?,
    };
    let cfg = config::Config::load_from(&config_path)?;

    match matches.subcommand() {
        Some(("calc", sub)) => commands::calc::handle(&cfg, sub)?,
        Some(("parse", sub)) => commands::parse::handle(&cfg, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&cfg, sub)?,
        Some(("sample", sub)) => commands::sample::handle(sub)?,
        Some(("config", sub)) => commands::config::handle(&config_path, &cfg, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
