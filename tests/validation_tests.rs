// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pumpkin::error::Field;
use pumpkin::validation::{
    DescriptionInput, NewExpense, validate_amount, validate_currency, validate_description,
    validate_expense, validate_month,
};

#[test]
fn amount_bounds_and_precision() {
    for bad in ["0", "-5", "1000000000", "10.999", "", "abc", "0.00"] {
        assert!(validate_amount(bad).is_err(), "{} should be rejected", bad);
    }
    assert_eq!(validate_amount("10"), Ok(10.0));
    assert_eq!(validate_amount("10.5"), Ok(10.5));
    assert_eq!(validate_amount("10.55"), Ok(10.55));
    assert_eq!(validate_amount(" 999999999 "), Ok(999_999_999.0));
}

#[test]
fn amount_messages_are_specific() {
    assert_eq!(validate_amount("").unwrap_err(), "Please enter an expense amount");
    assert_eq!(validate_amount("ten").unwrap_err(), "Please enter a valid number");
    assert_eq!(validate_amount("-1").unwrap_err(), "Amount must be greater than zero");
    assert_eq!(
        validate_amount("1.234").unwrap_err(),
        "Amount can have at most 2 decimal places"
    );
}

#[test]
fn month_shape_only() {
    assert_eq!(validate_month(" 2024-07 "), Ok("2024-07".to_string()));
    assert!(validate_month("2024-7").is_err());
    assert!(validate_month("").is_err());
    // Calendar limits are deliberately not checked.
    assert!(validate_month("2024-00").is_ok());
}

#[test]
fn description_limits() {
    assert_eq!(
        validate_description(&DescriptionInput::Text("  Coffee  ".into())),
        Ok("Coffee".to_string())
    );
    assert!(validate_description(&DescriptionInput::Text("\t ".into())).is_err());
    let max = "é".repeat(200);
    assert!(validate_description(&DescriptionInput::Text(max)).is_ok());
    assert!(validate_description(&DescriptionInput::Text("a".repeat(201))).is_err());
    assert_eq!(
        validate_description(&DescriptionInput::Category("dining".into())),
        Ok("🍽️ Dining Out".to_string())
    );
    assert!(validate_description(&DescriptionInput::Category("yachts".into())).is_err());
}

#[test]
fn currency_must_be_supported() {
    assert_eq!(validate_currency("cad"), Ok("CAD".to_string()));
    assert!(validate_currency("").is_err());
    assert!(validate_currency("BTC").is_err());
}

#[test]
fn expense_errors_are_keyed_by_field() {
    let errs = validate_expense(&NewExpense {
        month: "2024-07".into(),
        description: DescriptionInput::Text("ok".into()),
        amount: "10.999".into(),
        currency: "USD".into(),
    })
    .unwrap_err();
    assert_eq!(errs.len(), 1);
    assert_eq!(
        errs.get(Field::Amount),
        Some("Amount can have at most 2 decimal places")
    );
    assert!(errs.get(Field::Month).is_none());
    assert!(errs.to_string().starts_with("amount:"));
}
