// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::year_summaries;
use crate::book::ExpenseBook;
use crate::commands::{arg, invalid};
use crate::models::{ExpenseRecord, MonthSummary};
use crate::store::KeyValueStore;
use crate::utils::{fmt_money, maybe_print_json, month_name, pretty_table};
use crate::validation::{DescriptionInput, NewExpense};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn add<S: KeyValueStore>(book: &mut ExpenseBook<S>, sub: &clap::ArgMatches) -> Result<ExpenseRecord> {
    let description = match (
        sub.get_one::<String>("description"),
        sub.get_one::<String>("category"),
    ) {
        (Some(text), _) => DescriptionInput::Text(text.clone()),
        (None, Some(cat)) => DescriptionInput::Category(cat.clone()),
        (None, None) => bail!("either --description or --category is required"),
    };
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.clone(),
        None => book.currency_preference(),
    };
    let input = NewExpense {
        month: arg(sub, "month")?.clone(),
        description,
        amount: arg(sub, "amount")?.clone(),
        currency,
    };
    let rec = book.submit(&input).map_err(invalid)?;
    println!(
        "Recorded {} {:.2} for {} ({})",
        rec.currency,
        rec.amount,
        month_name(&rec.month),
        rec.description
    );
    Ok(rec)
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub month: String,
    pub description: String,
    pub amount: String,
    pub currency: String,
}

impl From<&ExpenseRecord> for ExpenseRow {
    fn from(r: &ExpenseRecord) -> Self {
        Self {
            month: r.month.clone(),
            description: r.description.clone(),
            amount: format!("{:.2}", r.amount),
            currency: r.currency.clone(),
        }
    }
}

/// Rows for `list`: one month ordered by creation time, or the whole collection.
pub fn query_rows<S: KeyValueStore>(book: &ExpenseBook<S>, month: Option<&str>) -> Vec<ExpenseRow> {
    match month {
        Some(m) => {
            let mut recs = book.by_month(m);
            recs.sort_by_key(|r| r.timestamp);
            recs.into_iter().map(ExpenseRow::from).collect()
        }
        None => book.records().iter().map(ExpenseRow::from).collect(),
    }
}

pub fn list<S: KeyValueStore>(book: &ExpenseBook<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    if let Some(year) = sub.get_one::<i32>("year") {
        let data = year_summaries(book.records(), *year, &book.config().default_currency);
        if !maybe_print_json(json_flag, &data)? {
            let rows = data.iter().map(summary_row).collect();
            println!("{}", pretty_table(&["Month", "Expenses", "Total"], rows));
        }
        return Ok(());
    }

    let data = query_rows(book, sub.get_one::<String>("month").map(|s| s.as_str()));
    if !maybe_print_json(json_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.month.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Description", "Amount", "CCY"], rows)
        );
    }
    Ok(())
}

fn summary_row(s: &MonthSummary) -> Vec<String> {
    let total = if s.is_mixed {
        "Mixed".to_string()
    } else {
        s.breakdown
            .first()
            .map(|c| fmt_money(&c.symbol, c.total))
            .unwrap_or_else(|| "-".to_string())
    };
    vec![month_name(&s.month), s.count.to_string(), total]
}

pub fn clear<S: KeyValueStore>(book: &mut ExpenseBook<S>, sub: &clap::ArgMatches) -> Result<()> {
    if !sub.get_flag("yes") {
        bail!("refusing to clear {} expenses without --yes", book.records().len());
    }
    let n = book.records().len();
    book.clear();
    println!("Cleared {} expenses", n);
    Ok(())
}
