// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[default]
    Stock,
    Crypto,
}

impl AssetType {
    /// Anything mentioning "crypto" is crypto, everything else is a stock.
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("crypto") {
            AssetType::Crypto
        } else {
            AssetType::Stock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "stock",
            AssetType::Crypto => "crypto",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    /// Anything mentioning "sell" is a sell, everything else (including blank) is a buy.
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("sell") {
            Action::Sell
        } else {
            Action::Buy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "buy",
            Action::Sell => "sell",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    Short,
    Long,
}

impl Term {
    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Short => "short",
            Term::Long => "long",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub r#type: AssetType,
    pub symbol: String,
    pub action: Action,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub fees: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One chunk of a sell matched against one buy lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalGain {
    pub id: String,
    pub symbol: String,
    pub r#type: AssetType,
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,
    pub quantity: Decimal,
    pub cost_basis: Decimal,
    pub sale_proceeds: Decimal,
    pub gain_loss: Decimal,
    pub term: Term,
    pub fees: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxImplications {
    pub short_term_tax_rate: Decimal,
    pub long_term_tax_rate: Decimal,
    pub estimated_tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalGainsSummary {
    pub short_term_gains: Vec<CapitalGain>,
    pub long_term_gains: Vec<CapitalGain>,
    pub total_short_term_gain_loss: Decimal,
    pub total_long_term_gain_loss: Decimal,
    pub net_capital_gain_loss: Decimal,
    pub tax_implications: TaxImplications,
}
