// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! FIFO lot matching of sells against buys, one symbol at a time.

use crate::models::{Action, CapitalGain, Term, Transaction};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, hash_map::Entry};
use tracing::warn;

/// Part of a sell left over once every buy lot for the symbol was used up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedSell {
    pub sell_id: String,
    pub symbol: String,
    pub sell_date: NaiveDate,
    pub quantity: Decimal,
}

/// A matched chunk whose amounts fell outside the `Decimal` range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverflowedMatch {
    pub buy_id: String,
    pub sell_id: String,
    pub symbol: String,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchOutcome {
    pub gains: Vec<CapitalGain>,
    pub unmatched: Vec<UnmatchedSell>,
    pub overflowed: Vec<OverflowedMatch>,
}

/// Long term means held for more than one year: the sell must land on or
/// after the buy date plus one year plus one day.
pub fn is_long_term(buy_date: NaiveDate, sell_date: NaiveDate) -> bool {
    buy_date
        .checked_add_months(Months::new(12))
        .and_then(|d| d.succ_opt())
        .is_some_and(|threshold| sell_date >= threshold)
}

pub fn holding_term(buy_date: NaiveDate, sell_date: NaiveDate) -> Term {
    if is_long_term(buy_date, sell_date) {
        Term::Long
    } else {
        Term::Short
    }
}

pub fn match_lots(transactions: &[Transaction]) -> Vec<CapitalGain> {
    match_lots_detailed(transactions).gains
}

/// Symbols are processed in order of first appearance; within a symbol,
/// gains follow the sells in date order.
pub fn match_lots_detailed(transactions: &[Transaction]) -> MatchOutcome {
    let mut order: Vec<&str> = Vec::new();
    let mut holdings: HashMap<&str, Vec<&Transaction>> = HashMap::new();
    for tx in transactions {
        match holdings.entry(tx.symbol.as_str()) {
            Entry::Occupied(entry) => entry.into_mut().push(tx),
            Entry::Vacant(entry) => {
                order.push(tx.symbol.as_str());
                entry.insert(vec![tx]);
            }
        }
    }

    let mut outcome = MatchOutcome::default();
    for symbol in order {
        if let Some(txs) = holdings.remove(symbol) {
            match_symbol(symbol, &txs, &mut outcome);
        }
    }
    outcome
}

fn match_symbol(symbol: &str, txs: &[&Transaction], outcome: &mut MatchOutcome) {
    let mut buys: Vec<&Transaction> = txs
        .iter()
        .copied()
        .filter(|t| t.action == Action::Buy)
        .collect();
    let mut sells: Vec<&Transaction> = txs
        .iter()
        .copied()
        .filter(|t| t.action == Action::Sell)
        .collect();
    // Stable: same-day trades keep input order
    buys.sort_by_key(|t| t.date);
    sells.sort_by_key(|t| t.date);

    let mut buy_idx = 0;
    let mut remaining_buy = buys.first().map_or(Decimal::ZERO, |b| b.quantity);

    for sell in sells {
        let mut remaining_sell = sell.quantity;

        while remaining_sell > Decimal::ZERO && buy_idx < buys.len() {
            let buy = buys[buy_idx];
            let matched = remaining_sell.min(remaining_buy);
            if matched > Decimal::ZERO {
                let seq = outcome.gains.len();
                match realize(symbol, buy, sell, matched, seq) {
                    Some(gain) => outcome.gains.push(gain),
                    None => {
                        warn!(
                            symbol,
                            buy_id = %buy.id,
                            sell_id = %sell.id,
                            quantity = %matched,
                            "matched amounts overflow; lot skipped"
                        );
                        outcome.overflowed.push(OverflowedMatch {
                            buy_id: buy.id.clone(),
                            sell_id: sell.id.clone(),
                            symbol: symbol.to_string(),
                            quantity: matched,
                        });
                    }
                }
            }
            remaining_sell -= matched;
            remaining_buy -= matched;

            if remaining_buy <= Decimal::ZERO {
                buy_idx += 1;
                remaining_buy = buys.get(buy_idx).map_or(Decimal::ZERO, |b| b.quantity);
            }
        }

        if remaining_sell > Decimal::ZERO {
            warn!(
                symbol,
                sell_id = %sell.id,
                sell_date = %sell.date,
                quantity = %remaining_sell,
                "sell exceeds available buy lots; unmatched quantity dropped"
            );
            outcome.unmatched.push(UnmatchedSell {
                sell_id: sell.id.clone(),
                symbol: symbol.to_string(),
                sell_date: sell.date,
                quantity: remaining_sell,
            });
        }
    }
}

/// Fees are prorated against each side's own original quantity. Returns
/// `None` when any amount leaves the `Decimal` range.
fn realize(
    symbol: &str,
    buy: &Transaction,
    sell: &Transaction,
    matched: Decimal,
    seq: usize,
) -> Option<CapitalGain> {
    let buy_share = matched.checked_div(buy.quantity)?;
    let sell_share = matched.checked_div(sell.quantity)?;
    let cost_basis = buy
        .price
        .checked_mul(matched)?
        .checked_add(buy.fees.checked_mul(buy_share)?)?;
    let sale_proceeds = sell
        .price
        .checked_mul(matched)?
        .checked_sub(sell.fees.checked_mul(sell_share)?)?;
    let gain_loss = sale_proceeds.checked_sub(cost_basis)?;
    let fees = buy
        .fees
        .checked_add(sell.fees)?
        .checked_mul(matched.checked_div(buy.quantity.max(sell.quantity))?)?;

    Some(CapitalGain {
        id: format!("{}-{}-{}", buy.id, sell.id, seq),
        symbol: symbol.to_string(),
        r#type: buy.r#type,
        buy_date: buy.date,
        sell_date: sell.date,
        quantity: matched,
        cost_basis,
        sale_proceeds,
        gain_loss,
        term: holding_term(buy.date, sell.date),
        fees,
    })
}
