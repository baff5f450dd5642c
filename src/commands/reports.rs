// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{currency_breakdown, stats};
use crate::book::ExpenseBook;
use crate::config::currency_symbol;
use crate::models::ExpenseRecord;
use crate::store::KeyValueStore;
use crate::utils::{fmt_money, maybe_print_json, month_name, pretty_table};
use anyhow::Result;

pub fn handle<S: KeyValueStore>(book: &ExpenseBook<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let records = book.records();
    let data = stats(records);
    if maybe_print_json(json_flag, &data)? {
        return Ok(());
    }

    let default_ccy = book.config().default_currency.as_str();
    let preferred = book.currency_preference();
    let this_month = chrono::Local::now().format("%Y-%m").to_string();
    let this_month_total = match month_amount(records, &this_month, default_ccy) {
        Some(text) => text,
        None => fmt_money(currency_symbol(&preferred), 0.0),
    };
    let most = match &data.most_expensive {
        Some(m) => format!(
            "{} ({})",
            month_name(&m.month),
            month_amount(records, &m.month, default_ccy).unwrap_or_else(|| "-".to_string())
        ),
        None => "-".to_string(),
    };
    let average = match single_currency(records) {
        Some(code) => fmt_money(currency_symbol(code), data.average_per_active_period),
        None => format!("{:.2}", data.average_per_active_period),
    };
    let rows = vec![
        vec!["This month".to_string(), this_month_total],
        vec!["Most expensive month".to_string(), most],
        vec!["Total expenses".to_string(), data.total_count.to_string()],
        vec!["Average per active month".to_string(), average],
    ];
    println!("{}", pretty_table(&["Statistic", "Value"], rows));
    Ok(())
}

/// Total for `month` in its own currency, `"Mixed"` when it spans several,
/// `None` when the month has no expenses.
pub fn month_amount(records: &[ExpenseRecord], month: &str, default_currency: &str) -> Option<String> {
    match currency_breakdown(records, month, default_currency).as_slice() {
        [] => None,
        [only] => Some(fmt_money(&only.symbol, only.total)),
        _ => Some("Mixed".to_string()),
    }
}

fn single_currency(records: &[ExpenseRecord]) -> Option<&str> {
    let first = records.first()?.currency.as_str();
    records
        .iter()
        .all(|r| r.currency == first)
        .then_some(first)
}
