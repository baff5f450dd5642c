// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::ExpenseBook;
use crate::migration::MigrationOutcome;
use crate::store::{KeyValueStore, StorageStatus};
use crate::utils::{month_name, pretty_table};
use anyhow::Result;

pub fn handle<S: KeyValueStore>(book: &ExpenseBook<S>) -> Result<()> {
    if book.storage_status() == StorageStatus::Unavailable {
        println!("Storage is unavailable; nothing to migrate");
        return Ok(());
    }
    match book.migration_outcome() {
        MigrationOutcome::Success(records) => {
            let rows = records
                .iter()
                .map(|r| {
                    vec![
                        month_name(&r.month),
                        r.description.clone(),
                        format!("{:.2}", r.amount),
                        r.currency.clone(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Month", "Description", "Amount", "CCY"], rows)
            );
        }
        MigrationOutcome::NoLegacyData => println!("migrate: no legacy data to migrate"),
        MigrationOutcome::Invalid(reason) => {
            println!("migrate: legacy data kept but could not be migrated ({})", reason)
        }
    }
    Ok(())
}
