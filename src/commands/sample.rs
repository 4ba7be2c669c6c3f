// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

/// Template offered to users who are unsure of the expected columns.
pub const SAMPLE_CSV: &str = "symbol,type,action,date,quantity,price,fees,description
AAPL,stock,buy,2023-01-15,100,150.25,9.99,Apple Inc
AAPL,stock,sell,2023-06-20,50,180.75,9.99,Apple Inc
TSLA,stock,buy,2023-02-10,25,200.50,9.99,Tesla Inc
TSLA,stock,sell,2023-11-15,25,240.25,9.99,Tesla Inc
BTC,crypto,buy,2023-03-01,0.5,25000,25,Bitcoin
BTC,crypto,sell,2023-08-15,0.25,30000,30,Bitcoin
MSFT,stock,buy,2022-12-01,75,250.00,9.99,Microsoft Corp
MSFT,stock,sell,2023-09-10,75,320.50,9.99,Microsoft Corp
";

pub fn handle(sub: &clap::ArgMatches) -> Result<()> {
    match sub.get_one::<String>("out").map(|s| s.trim()) {
        Some(out) => {
            std::fs::write(out, SAMPLE_CSV).with_context(|| format!("Write {}", out))?;
            println!("Wrote sample transactions to {}", out);
        }
        None => print!("{}", SAMPLE_CSV),
    }
    Ok(())
}
