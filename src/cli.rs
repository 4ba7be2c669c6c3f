// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Command, arg, value_parser};

fn path_arg() -> clap::Arg {
    arg!(--path <FILE> "Transaction CSV (symbol, action, date, quantity, price, ...)").required(true)
}

fn bracket_arg() -> clap::Arg {
    arg!(--bracket <RATE> "Ordinary income tax bracket, e.g. 0.24 or 24%").required(false)
}

pub fn build_cli() -> Command {
    Command::new("capgains")
        .about("FIFO capital gains and tax estimates from broker transaction exports")
        .version(clap::crate_version!())
        .arg(
            arg!(--config <FILE> "Config file to use instead of the default location")
                .required(false)
                .global(true),
        )
        .subcommand(
            Command::new("calc")
                .about("Match lots and summarize short/long term gains")
                .arg(path_arg())
                .arg(bracket_arg())
                .arg(arg!(--strict "Fail if any row is skipped"))
                .arg(arg!(--json "Print the summary as JSON"))
                .arg(arg!(--jsonl "Print one matched gain per line"))
                .arg(arg!(--message "Print a short notification-style summary")),
        )
        .subcommand(
            Command::new("parse")
                .about("Show parsed transactions and skipped rows")
                .arg(path_arg())
                .arg(arg!(--strict "Fail if any row is skipped"))
                .arg(arg!(--json "Print as JSON")),
        )
        .subcommand(
            Command::new("export")
                .about("Write matched gains to a file")
                .arg(path_arg())
                .arg(arg!(--out <FILE> "Output file").required(true))
                .arg(
                    arg!(--format <FORMAT> "csv or json")
                        .required(false)
                        .default_value("csv"),
                )
                .arg(bracket_arg().help("Ordinary-income tax rate for the json summary"))
                .arg(arg!(--strict "Fail if any row is skipped")),
        )
        .subcommand(
            Command::new("sample")
                .about("Print or save a sample transaction CSV")
                .arg(arg!(--out <FILE> "Write to a file instead of stdout").required(false)),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change saved defaults")
                .subcommand(Command::new("show").about("Print the current config"))
                .subcommand(Command::new("path").about("Print the config file location"))
                .subcommand(
                    Command::new("set")
                        .about("Update saved defaults")
                        .arg(bracket_arg())
                        .arg(
                            arg!(--strict <BOOL> "Reject files with skipped rows")
                                .required(false)
                                .value_parser(value_parser!(bool)),
                        ),
                ),
        )
}
