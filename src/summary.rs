// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::GainsError;
use crate::lots::match_lots;
use crate::models::{CapitalGain, CapitalGainsSummary, TaxImplications, Term, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Ordinary-income tax bracket, a rate between 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct TaxBracket(Decimal);

impl TaxBracket {
    pub fn new(rate: Decimal) -> Result<Self, GainsError> {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(GainsError::InvalidTaxBracket(rate));
        }
        Ok(TaxBracket(rate))
    }

    pub fn rate(&self) -> Decimal {
        self.0
    }

    /// Short-term gains are taxed as ordinary income.
    pub fn short_term_rate(&self) -> Decimal {
        self.0
    }

    pub fn long_term_rate(&self) -> Decimal {
        if self.0 <= Decimal::new(12, 2) {
            Decimal::ZERO
        } else if self.0 <= Decimal::new(22, 2) {
            Decimal::new(15, 2)
        } else {
            Decimal::new(20, 2)
        }
    }
}

impl Default for TaxBracket {
    fn default() -> Self {
        TaxBracket(Decimal::new(24, 2))
    }
}

impl TryFrom<Decimal> for TaxBracket {
    type Error = GainsError;

    fn try_from(rate: Decimal) -> Result<Self, Self::Error> {
        TaxBracket::new(rate)
    }
}

impl From<TaxBracket> for Decimal {
    fn from(bracket: TaxBracket) -> Self {
        bracket.0
    }
}

/// Accepts `0.24` or `24%`.
impl FromStr for TaxBracket {
    type Err = GainsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || GainsError::InvalidRate(s.to_string());
        let rate = match s.strip_suffix('%') {
            Some(pct) => {
                Decimal::from_str(pct.trim()).map_err(|_| invalid())? / Decimal::ONE_HUNDRED
            }
            None => Decimal::from_str(s).map_err(|_| invalid())?,
        };
        TaxBracket::new(rate)
    }
}

impl fmt::Display for TaxBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl CapitalGainsSummary {
    pub fn from_gains(gains: Vec<CapitalGain>, bracket: TaxBracket) -> Self {
        let (short_term_gains, long_term_gains): (Vec<_>, Vec<_>) =
            gains.into_iter().partition(|g| g.term == Term::Short);

        let total_short_term_gain_loss = total_gain_loss(&short_term_gains);
        let total_long_term_gain_loss = total_gain_loss(&long_term_gains);

        let short_term_tax_rate = bracket.short_term_rate();
        let long_term_tax_rate = bracket.long_term_rate();

        // Losses never produce a negative tax
        let mut estimated_tax = Decimal::ZERO;
        if total_short_term_gain_loss > Decimal::ZERO {
            estimated_tax = estimated_tax
                .saturating_add(total_short_term_gain_loss.saturating_mul(short_term_tax_rate));
        }
        if total_long_term_gain_loss > Decimal::ZERO {
            estimated_tax = estimated_tax
                .saturating_add(total_long_term_gain_loss.saturating_mul(long_term_tax_rate));
        }

        CapitalGainsSummary {
            short_term_gains,
            long_term_gains,
            total_short_term_gain_loss,
            total_long_term_gain_loss,
            net_capital_gain_loss: total_short_term_gain_loss
                .saturating_add(total_long_term_gain_loss),
            tax_implications: TaxImplications {
                short_term_tax_rate,
                long_term_tax_rate,
                estimated_tax: estimated_tax.max(Decimal::ZERO),
            },
        }
    }

    pub fn gain_count(&self) -> usize {
        self.short_term_gains.len() + self.long_term_gains.len()
    }
}

/// Signed sum that clamps at the `Decimal` bounds instead of overflowing.
fn total_gain_loss(gains: &[CapitalGain]) -> Decimal {
    gains.iter().fold(Decimal::ZERO, |acc, g| {
        acc.checked_add(g.gain_loss).unwrap_or_else(|| {
            warn!(gain_id = %g.id, "gain total overflows; clamped");
            acc.saturating_add(g.gain_loss)
        })
    })
}

/// Matches lots and aggregates the result in one call.
pub fn calculate_capital_gains(
    transactions: &[Transaction],
    bracket: TaxBracket,
) -> CapitalGainsSummary {
    CapitalGainsSummary::from_gains(match_lots(transactions), bracket)
}
