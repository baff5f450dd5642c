// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::config::{category_description, find_category, is_supported_currency};
use crate::error::{Field, ValidationErrors};
use crate::utils::{is_month_key, parse_decimal};

pub const MAX_AMOUNT: i64 = 999_999_999;
pub const MAX_DESCRIPTION_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionInput {
    Text(String),
    /// A value from the category table; stored as `"<icon> <label>"`.
    Category(String),
}

/// Raw expense form input, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub month: String,
    pub description: DescriptionInput,
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidExpense {
    pub month: String,
    pub description: String,
    pub amount: f64,
    pub currency: String,
}

pub fn validate_amount(input: &str) -> Result<f64, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Please enter an expense amount".into());
    }
    let value: Decimal = parse_decimal(trimmed).map_err(|_| "Please enter a valid number".to_string())?;
    if value <= Decimal::ZERO {
        return Err("Amount must be greater than zero".into());
    }
    if value > Decimal::from(MAX_AMOUNT) {
        return Err("Amount cannot exceed 999,999,999".into());
    }
    if value.scale() > 2 {
        return Err("Amount can have at most 2 decimal places".into());
    }
    // Decimal vets the text; the stored value is the nearest float to what was typed.
    trimmed
        .parse::<f64>()
        .map_err(|_| "Please enter a valid number".to_string())
}

pub fn validate_month(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Please select a month".into());
    }
    if !is_month_key(trimmed) {
        return Err("Month must be in YYYY-MM format".into());
    }
    Ok(trimmed.to_string())
}

pub fn validate_description(input: &DescriptionInput) -> Result<String, String> {
    match input {
        DescriptionInput::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err("Please enter a description".into());
            }
            if trimmed.chars().count() > MAX_DESCRIPTION_CHARS {
                return Err(format!(
                    "Description must be {} characters or less",
                    MAX_DESCRIPTION_CHARS
                ));
            }
            Ok(trimmed.to_string())
        }
        DescriptionInput::Category(value) => match find_category(value.trim()) {
            Some(cat) => Ok(category_description(cat.value)),
            None => Err("Please select a category".into()),
        },
    }
}

pub fn validate_currency(input: &str) -> Result<String, String> {
    let code = input.trim().to_uppercase();
    if code.is_empty() {
        return Err("Please select a currency".into());
    }
    if !is_supported_currency(&code) {
        return Err(format!("Unsupported currency '{}'", code));
    }
    Ok(code)
}

/// Checks every field and reports all problems at once.
pub fn validate_expense(input: &NewExpense) -> Result<ValidExpense, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let month = validate_month(&input.month).map_err(|m| errors.insert(Field::Month, m));
    let description =
        validate_description(&input.description).map_err(|m| errors.insert(Field::Description, m));
    let amount = validate_amount(&input.amount).map_err(|m| errors.insert(Field::Amount, m));
    let currency = validate_currency(&input.currency).map_err(|m| errors.insert(Field::Currency, m));

    match (month, description, amount, currency) {
        (Ok(month), Ok(description), Ok(amount), Ok(currency)) => Ok(ValidExpense {
            month,
            description,
            amount,
            currency,
        }),
        _ => Err(errors),
    }
}
