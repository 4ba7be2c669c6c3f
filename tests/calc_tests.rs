// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use capgains::commands::{calc, sample::SAMPLE_CSV};
use capgains::config::Config;
use capgains::{Term, TaxBracket, calculate_capital_gains, cli, parse_transactions};
use rust_decimal::Decimal;
use std::io::Write;
use std::str::FromStr;
use tempfile::NamedTempFile;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

fn run_calc(cfg: &Config, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["capgains", "calc"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("calc", sub)) = matches.subcommand() {
        calc::handle(cfg, sub)
    } else {
        panic!("no calc subcommand");
    }
}

#[test]
fn sample_set_is_all_short_term() {
    let txs = parse_transactions(SAMPLE_CSV);
    assert_eq!(txs.len(), 8);

    let summary = calculate_capital_gains(&txs, TaxBracket::default());
    assert_eq!(summary.short_term_gains.len(), 4);
    assert!(summary.long_term_gains.is_empty());

    let ids: Vec<_> = summary.short_term_gains.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["csv-0-csv-1-0", "csv-2-csv-3-1", "csv-4-csv-5-2", "csv-6-csv-7-3"]
    );

    let aapl = &summary.short_term_gains[0];
    assert_eq!(aapl.quantity, dec("50"));
    assert_eq!(aapl.cost_basis, dec("7517.495"));
    assert_eq!(aapl.sale_proceeds, dec("9027.51"));
    assert_eq!(aapl.gain_loss, dec("1510.015"));
    assert_eq!(aapl.term, Term::Short);

    assert_eq!(summary.total_short_term_gain_loss, dec("8958.805"));
    assert_eq!(summary.total_long_term_gain_loss, Decimal::ZERO);
    assert_eq!(summary.net_capital_gain_loss, dec("8958.805"));
    assert_eq!(summary.tax_implications.estimated_tax, dec("2150.1132"));
}

#[test]
fn holding_boundary_through_csv() {
    let csv = "symbol,action,date,quantity,price\n\
               ONE,buy,2023-01-15,10,100\n\
               ONE,sell,2024-01-15,10,110\n\
               TWO,buy,2023-01-15,10,100\n\
               TWO,sell,2024-01-16,10,110";
    let summary = calculate_capital_gains(&parse_transactions(csv), TaxBracket::default());
    assert_eq!(summary.short_term_gains.len(), 1);
    assert_eq!(summary.short_term_gains[0].symbol, "ONE");
    assert_eq!(summary.long_term_gains.len(), 1);
    assert_eq!(summary.long_term_gains[0].symbol, "TWO");
    assert_eq!(summary.total_short_term_gain_loss, dec("100"));
    assert_eq!(summary.total_long_term_gain_loss, dec("100"));
    // 100 * 0.24 + 100 * 0.20
    assert_eq!(summary.tax_implications.estimated_tax, dec("44"));
}

#[test]
fn net_equals_sum_of_terms_with_mixed_results() {
    let csv = "symbol,action,date,quantity,price,fees\n\
               A,buy,2020-01-01,10,50,1\n\
               A,sell,2023-01-01,10,40,1\n\
               B,buy,2023-01-01,3,10,0\n\
               B,sell,2023-02-01,3,30,0";
    let summary = calculate_capital_gains(&parse_transactions(csv), TaxBracket::default());
    assert_eq!(summary.total_long_term_gain_loss, dec("-102"));
    assert_eq!(summary.total_short_term_gain_loss, dec("60"));
    assert_eq!(
        summary.net_capital_gain_loss,
        summary.total_short_term_gain_loss + summary.total_long_term_gain_loss
    );
    assert_eq!(summary.tax_implications.estimated_tax, dec("14.4"));
}

#[test]
fn calc_runs_against_sample_file() {
    let file = csv_file(SAMPLE_CSV);
    let path = file.path().to_str().unwrap().to_string();
    run_calc(&Config::default(), &["--path", &path]).unwrap();
    run_calc(&Config::default(), &["--path", &path, "--json"]).unwrap();
    run_calc(&Config::default(), &["--path", &path, "--message", "--bracket", "22%"]).unwrap();
}

#[test]
fn calc_trims_cli_path_argument() {
    let file = csv_file(SAMPLE_CSV);
    let padded = format!("  {}  ", file.path().to_str().unwrap());
    run_calc(&Config::default(), &["--path", &padded]).unwrap();
}

#[test]
fn calc_reports_no_valid_transactions() {
    let file = csv_file("symbol,action,date,quantity,price\nAAPL,buy,2023-01-01,,\n");
    let path = file.path().to_str().unwrap().to_string();
    let err = run_calc(&Config::default(), &["--path", &path]).unwrap_err();
    assert!(err.to_string().contains("No valid transactions found"));
}

#[test]
fn calc_strict_rejects_skipped_rows() {
    let file = csv_file("symbol,action,date,quantity,price\nA,buy,2023-01-01,1,10\nB,buy,bad,1,10\n");
    let path = file.path().to_str().unwrap().to_string();
    run_calc(&Config::default(), &["--path", &path]).unwrap();

    let err = run_calc(&Config::default(), &["--path", &path, "--strict"]).unwrap_err();
    assert!(err.to_string().contains("first at line 3"));

    let strict_cfg = Config {
        strict: true,
        ..Config::default()
    };
    assert!(run_calc(&strict_cfg, &["--path", &path]).is_err());
}

#[test]
fn calc_rejects_invalid_bracket() {
    let file = csv_file(SAMPLE_CSV);
    let path = file.path().to_str().unwrap().to_string();
    let err = run_calc(&Config::default(), &["--path", &path, "--bracket", "2"]).unwrap_err();
    assert!(err.to_string().contains("Invalid --bracket '2'"));
}

#[test]
fn calc_rejects_non_csv_files() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(file, "{}", SAMPLE_CSV).unwrap();
    let path = file.path().to_str().unwrap().to_string();
    let err = run_calc(&Config::default(), &["--path", &path]).unwrap_err();
    assert!(err.to_string().contains("Please upload a CSV file only"));
}

#[test]
fn resolve_bracket_prefers_flag_over_config() {
    let cfg = Config {
        tax_bracket: "0.10".parse().unwrap(),
        strict: false,
    };
    let matches = cli::build_cli().get_matches_from(["capgains", "calc", "--path", "x.csv"]);
    let (_, sub) = matches.subcommand().unwrap();
    assert_eq!(calc::resolve_bracket(&cfg, sub).unwrap(), cfg.tax_bracket);

    let matches = cli::build_cli().get_matches_from([
        "capgains", "calc", "--path", "x.csv", "--bracket", "0.35",
    ]);
    let (_, sub) = matches.subcommand().unwrap();
    assert_eq!(calc::resolve_bracket(&cfg, sub).unwrap().rate(), dec("0.35"));
}
