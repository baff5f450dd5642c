// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::ExpenseBook;
use crate::commands::{arg, invalid};
use crate::config::{category_description, find_category};
use crate::error::{Field, ValidationErrors};
use crate::models::RepeatableTemplate;
use crate::store::KeyValueStore;
use crate::utils::pretty_table;
use crate::validation::{validate_amount, validate_currency};
use anyhow::{Result, anyhow};

pub fn handle<S: KeyValueStore>(book: &mut ExpenseBook<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("save", sub)) => {
            let category = arg(sub, "category")?.trim().to_string();
            let amount = arg(sub, "amount")?.trim().to_string();
            let currency = match sub.get_one::<String>("currency") {
                Some(c) => c.clone(),
                None => book.currency_preference(),
            };

            let mut errors = ValidationErrors::new();
            if find_category(&category).is_none() {
                errors.insert(Field::Description, "Please select a category");
            }
            if let Err(msg) = validate_amount(&amount) {
                errors.insert(Field::Amount, msg);
            }
            let currency = match validate_currency(&currency) {
                Ok(c) => c,
                Err(msg) => {
                    errors.insert(Field::Currency, msg);
                    currency
                }
            };
            if !errors.is_empty() {
                return Err(invalid(errors));
            }

            let t = RepeatableTemplate {
                category,
                amount,
                currency,
            };
            if book.save_template(t) {
                println!("Saved template");
            } else {
                println!("An identical template already exists");
            }
        }
        Some(("rm", sub)) => {
            let t = nth(book, sub)?;
            book.remove_template(&t);
            println!("Removed template {} {}", t.amount, t.currency);
        }
        Some(("use", sub)) => {
            let t = nth(book, sub)?;
            let rec = book
                .add_from_template(&t, arg(sub, "month")?)
                .map_err(invalid)?;
            println!(
                "Recorded {} {:.2} for {} ({})",
                rec.currency, rec.amount, rec.month, rec.description
            );
        }
        _ => {
            let rows = book
                .templates()
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    vec![
                        (i + 1).to_string(),
                        category_description(&t.category),
                        t.amount.clone(),
                        t.currency.clone(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["#", "Category", "Amount", "CCY"], rows)
            );
        }
    }
    Ok(())
}

/// Template by its 1-based position in `template list`.
fn nth<S: KeyValueStore>(book: &ExpenseBook<S>, sub: &clap::ArgMatches) -> Result<RepeatableTemplate> {
    let idx = *sub
        .get_one::<usize>("index")
        .ok_or_else(|| anyhow!("missing template index"))?;
    idx.checked_sub(1)
        .and_then(|i| book.templates().get(i))
        .cloned()
        .ok_or_else(|| anyhow!("No template #{}", idx))
}
