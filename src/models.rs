// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: String,
    pub month: String, // YYYY-MM
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: String,
    pub timestamp: i64, // epoch millis
}

/// Day-granularity, single-currency record from before months and currencies existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyExpenseRecord {
    pub id: String,
    pub date: String, // YYYY-MM-DD
    pub amount: f64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatableTemplate {
    pub category: String,
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyTotal {
    pub currency: String,
    pub total: f64,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub count: usize,
    pub breakdown: Vec<CurrencyTotal>,
    pub is_mixed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total_count: usize,
    pub average_per_active_period: f64,
    pub most_expensive: Option<MonthTotal>,
}
