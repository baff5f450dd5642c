// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-side views over the expense collection.
//!
//! Monthly totals add amounts across currencies without conversion. That combined
//! figure drives the most-expensive-month pick; display code uses the per-currency
//! breakdown instead.

use std::collections::BTreeMap;

use crate::config::currency_symbol;
use crate::models::{CurrencyTotal, ExpenseRecord, MonthSummary, MonthTotal, Stats};

pub fn monthly_totals(records: &[ExpenseRecord]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for rec in records {
        *totals.entry(rec.month.clone()).or_insert(0.0) += rec.amount;
    }
    totals
}

/// Month with the highest combined total. Equal totals resolve to the latest month.
pub fn most_expensive_month(records: &[ExpenseRecord]) -> Option<MonthTotal> {
    let mut best: Option<MonthTotal> = None;
    // Ascending month order, so `>=` lets a later month take over a tie.
    for (month, total) in monthly_totals(records) {
        if best.as_ref().is_none_or(|b| total >= b.total) {
            best = Some(MonthTotal { month, total });
        }
    }
    best
}

pub fn month_total(records: &[ExpenseRecord], month: &str) -> f64 {
    records
        .iter()
        .filter(|r| r.month == month)
        .map(|r| r.amount)
        .sum()
}

/// Per-currency totals for one month, largest first. Empty codes count as `default_currency`.
pub fn currency_breakdown(
    records: &[ExpenseRecord],
    month: &str,
    default_currency: &str,
) -> Vec<CurrencyTotal> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for rec in records.iter().filter(|r| r.month == month) {
        let ccy = if rec.currency.is_empty() {
            default_currency
        } else {
            rec.currency.as_str()
        };
        match totals.iter_mut().find(|(c, _)| c == ccy) {
            Some((_, t)) => *t += rec.amount,
            None => totals.push((ccy.to_string(), rec.amount)),
        }
    }
    let mut out: Vec<CurrencyTotal> = totals
        .into_iter()
        .map(|(currency, total)| CurrencyTotal {
            symbol: currency_symbol(&currency).to_string(),
            currency,
            total,
        })
        .collect();
    out.sort_by(|a, b| b.total.total_cmp(&a.total));
    out
}

pub fn is_mixed_currency(records: &[ExpenseRecord], month: &str, default_currency: &str) -> bool {
    currency_breakdown(records, month, default_currency).len() > 1
}

pub fn total_amount(records: &[ExpenseRecord]) -> f64 {
    records.iter().map(|r| r.amount).sum()
}

/// Total spend divided by the number of distinct months that have any expense.
pub fn average_per_active_period(records: &[ExpenseRecord]) -> f64 {
    let active = count_by_month(records).len();
    if active == 0 {
        return 0.0;
    }
    total_amount(records) / active as f64
}

pub fn count_by_month(records: &[ExpenseRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for rec in records {
        *counts.entry(rec.month.clone()).or_insert(0) += 1;
    }
    counts
}

pub fn total_count(records: &[ExpenseRecord]) -> usize {
    records.len()
}

pub fn stats(records: &[ExpenseRecord]) -> Stats {
    Stats {
        total_count: total_count(records),
        average_per_active_period: average_per_active_period(records),
        most_expensive: most_expensive_month(records),
    }
}

/// Twelve summaries for `year`, January first, including empty months.
pub fn year_summaries(records: &[ExpenseRecord], year: i32, default_currency: &str) -> Vec<MonthSummary> {
    (1..=12)
        .map(|m| {
            let month = format!("{:04}-{:02}", year, m);
            let count = records.iter().filter(|r| r.month == month).count();
            let breakdown = currency_breakdown(records, &month, default_currency);
            MonthSummary {
                is_mixed: breakdown.len() > 1,
                month,
                count,
                breakdown,
            }
        })
        .collect()
}
