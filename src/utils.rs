// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use rust_decimal::Decimal;

static MONTH_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("valid regex"));

/// True for `YYYY-MM` strings. Calendar limits are not checked.
pub fn is_month_key(s: &str) -> bool {
    MONTH_KEY.is_match(s)
}

/// Splits a `YYYY-MM` key into `(year, month)` parts.
pub fn split_month(month: &str) -> (&str, &str) {
    month.split_once('-').unwrap_or((month, ""))
}

/// "January 2025" style name; falls back to the raw key when it is not a real month.
pub fn month_name(month: &str) -> String {
    let (y, m) = split_month(month);
    match (y.parse::<i32>(), m.parse::<u32>()) {
        (Ok(y), Ok(m)) => NaiveDate::from_ymd_opt(y, m, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| month.to_string()),
        _ => month.to_string(),
    }
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(symbol: &str, amount: f64) -> String {
    format!("{}{:.2}", symbol, amount)
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// `<epoch-millis>-<9 base36 chars>`. Collisions are improbable, not impossible.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .filter_map(|_| std::char::from_digit(rng.gen_range(0..36), 36))
        .collect();
    format!("{}-{}", now_millis(), suffix)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}
