// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Static lookup tables and the injected tracker configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyOption {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

pub const SUPPORTED_CURRENCIES: &[CurrencyOption] = &[
    CurrencyOption { code: "INR", symbol: "₹", name: "Indian Rupee" },
    CurrencyOption { code: "USD", symbol: "$", name: "US Dollar" },
    CurrencyOption { code: "EUR", symbol: "€", name: "Euro" },
    CurrencyOption { code: "GBP", symbol: "£", name: "British Pound" },
    CurrencyOption { code: "JPY", symbol: "¥", name: "Japanese Yen" },
    CurrencyOption { code: "CAD", symbol: "C$", name: "Canadian Dollar" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryOption {
    pub value: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

pub const EXPENSE_CATEGORIES: &[CategoryOption] = &[
    CategoryOption { value: "rent", label: "Rent", icon: "🏠" },
    CategoryOption { value: "utilities", label: "Utilities", icon: "💡" },
    CategoryOption { value: "groceries", label: "Groceries", icon: "🛒" },
    CategoryOption { value: "transportation", label: "Transportation", icon: "🚗" },
    CategoryOption { value: "healthcare", label: "Healthcare", icon: "🏥" },
    CategoryOption { value: "entertainment", label: "Entertainment", icon: "🎬" },
    CategoryOption { value: "dining", label: "Dining Out", icon: "🍽️" },
    CategoryOption { value: "shopping", label: "Shopping", icon: "🛍️" },
    CategoryOption { value: "subscriptions", label: "Subscriptions", icon: "📱" },
    CategoryOption { value: "insurance", label: "Insurance", icon: "🛡️" },
    CategoryOption { value: "education", label: "Education", icon: "📚" },
    CategoryOption { value: "fitness", label: "Fitness", icon: "💪" },
    CategoryOption { value: "travel", label: "Travel", icon: "✈️" },
    CategoryOption { value: "pets", label: "Pets", icon: "🐾" },
    CategoryOption { value: "gifts", label: "Gifts", icon: "🎁" },
    CategoryOption { value: "savings", label: "Savings", icon: "💰" },
    CategoryOption { value: "debt", label: "Debt Payment", icon: "💳" },
    CategoryOption { value: "other", label: "Other", icon: "📝" },
];

pub const DEFAULT_CATEGORY: &str = "other";

pub fn find_currency(code: &str) -> Option<&'static CurrencyOption> {
    SUPPORTED_CURRENCIES.iter().find(|c| c.code == code)
}

pub fn is_supported_currency(code: &str) -> bool {
    find_currency(code).is_some()
}

/// Symbol for a currency code; unknown codes are their own symbol.
pub fn currency_symbol(code: &str) -> &str {
    match find_currency(code) {
        Some(c) => c.symbol,
        None => code,
    }
}

pub fn find_category(value: &str) -> Option<&'static CategoryOption> {
    EXPENSE_CATEGORIES.iter().find(|c| c.value == value)
}

/// Label and icon for a category value, falling back to "Other".
pub fn category_display(value: &str) -> (&'static str, &'static str) {
    let cat = find_category(value)
        .or_else(|| find_category(DEFAULT_CATEGORY))
        .unwrap_or(&EXPENSE_CATEGORIES[EXPENSE_CATEGORIES.len() - 1]);
    (cat.label, cat.icon)
}

/// Description stored for category-based entries: `"<icon> <label>"`.
pub fn category_description(value: &str) -> String {
    let (label, icon) = category_display(value);
    format!("{} {}", icon, label)
}

/// Names under which each collection lives in the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    pub expenses: String,
    pub legacy_expenses: String,
    pub currency: String,
    pub templates: String,
    pub migration: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str, legacy_expenses: &str) -> Self {
        Self {
            expenses: format!("{}-expenses", prefix),
            legacy_expenses: legacy_expenses.to_string(),
            currency: format!("{}-currency", prefix),
            templates: format!("{}-repeatable", prefix),
            migration: format!("{}-migration", prefix),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_APP_PREFIX, "halloween-expenses")
    }
}

pub const DEFAULT_APP_PREFIX: &str = "expense-pumpkin";
pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Prefix used for export filenames.
    pub app_prefix: String,
    pub default_currency: String,
    pub keys: StorageKeys,
    /// Upper bound on stored bytes, mirroring browser storage limits.
    pub quota_bytes: Option<usize>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            app_prefix: DEFAULT_APP_PREFIX.to_string(),
            default_currency: DEFAULT_CURRENCY.to_string(),
            keys: StorageKeys::default(),
            quota_bytes: Some(5 * 1024 * 1024),
        }
    }
}

impl TrackerConfig {
    pub fn with_default_currency(mut self, code: &str) -> Self {
        self.default_currency = code.to_uppercase();
        self
    }

    pub fn with_quota(mut self, quota_bytes: Option<usize>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }
}
