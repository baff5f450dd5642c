// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One-time upgrade of day-level legacy records into month-level records.

use std::collections::BTreeMap;

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::config::{StorageKeys, TrackerConfig};
use crate::error::LegacyRecordError;
use crate::models::{ExpenseRecord, LegacyExpenseRecord};
use crate::store::{KeyValueStore, RecordStore};
use crate::utils::{generate_id, is_month_key, now_millis};

#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    Success(Vec<ExpenseRecord>),
    NoLegacyData,
    Invalid(String),
}

impl MigrationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MigrationOutcome::Success(_))
    }
}

/// Checks that a stored legacy entry carries all four fields with the right JSON types.
pub fn validate_legacy_record(value: &Value) -> Result<LegacyExpenseRecord, LegacyRecordError> {
    let obj = value.as_object().ok_or(LegacyRecordError::NotAnObject)?;
    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .ok_or(LegacyRecordError::Field("id"))?;
    let date = obj
        .get("date")
        .and_then(Value::as_str)
        .ok_or(LegacyRecordError::Field("date"))?;
    let amount = obj
        .get("amount")
        .and_then(Value::as_f64)
        .ok_or(LegacyRecordError::Field("amount"))?;
    let timestamp = obj
        .get("timestamp")
        .and_then(Value::as_f64)
        .ok_or(LegacyRecordError::Field("timestamp"))?;
    Ok(LegacyExpenseRecord {
        id: id.to_string(),
        date: date.to_string(),
        amount,
        timestamp: timestamp as i64,
    })
}

fn migrated_description(count: usize) -> String {
    let noun = if count == 1 { "expense" } else { "expenses" };
    format!("Migrated expenses ({} {})", count, noun)
}

/// Collapses legacy records into one record per month, ascending by month.
///
/// Records whose date does not yield a `YYYY-MM` key are skipped with a warning.
pub fn group_by_month(records: &[LegacyExpenseRecord], currency: &str) -> Vec<ExpenseRecord> {
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for rec in records {
        let month: String = rec.date.chars().take(7).collect();
        if !is_month_key(&month) {
            warn!(id = rec.id.as_str(), date = rec.date.as_str(), "skipping legacy expense with invalid date");
            continue;
        }
        let entry = groups.entry(month).or_insert((0.0, 0));
        entry.0 += rec.amount;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(month, (total, count))| ExpenseRecord {
            id: generate_id(),
            month,
            description: migrated_description(count),
            amount: total,
            currency: currency.to_string(),
            timestamp: now_millis(),
        })
        .collect()
}

pub struct Migrator {
    keys: StorageKeys,
    default_currency: String,
}

impl Migrator {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            keys: config.keys.clone(),
            default_currency: config.default_currency.clone(),
        }
    }

    /// Transforms the legacy collection without touching the store.
    pub fn migrate<S: KeyValueStore>(&self, store: &RecordStore<S>) -> MigrationOutcome {
        let Some(raw) = store.get_raw(&self.keys.legacy_expenses) else {
            return MigrationOutcome::NoLegacyData;
        };
        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(Value::Null) => return MigrationOutcome::NoLegacyData,
            Ok(_) => return MigrationOutcome::Invalid("legacy data is not a list".into()),
            Err(e) => return MigrationOutcome::Invalid(format!("legacy data is not valid JSON: {}", e)),
        };
        if items.is_empty() {
            return MigrationOutcome::NoLegacyData;
        }

        let valid: Vec<LegacyExpenseRecord> = items
            .iter()
            .filter_map(|v| validate_legacy_record(v).ok())
            .collect();
        if valid.is_empty() {
            return MigrationOutcome::Invalid("no valid records".into());
        }

        let migrated = group_by_month(&valid, &self.default_currency);
        if migrated.is_empty() {
            return MigrationOutcome::Invalid("failed to process any expenses".into());
        }
        MigrationOutcome::Success(migrated)
    }

    /// Runs the migration only when there is no current data and legacy data exists,
    /// then commits the result.
    pub fn run_startup_migration<S: KeyValueStore>(
        &self,
        store: &mut RecordStore<S>,
    ) -> MigrationOutcome {
        if self.has_current_data(store) || store.get_raw(&self.keys.legacy_expenses).is_none() {
            return MigrationOutcome::NoLegacyData;
        }

        let outcome = self.migrate(store);
        match &outcome {
            MigrationOutcome::Success(records) => {
                if self.commit(store, records) {
                    info!(months = records.len(), "migrated legacy expenses");
                }
            }
            MigrationOutcome::Invalid(reason) => {
                warn!(reason = reason.as_str(), "legacy migration failed; legacy data left intact");
            }
            MigrationOutcome::NoLegacyData => {}
        }
        outcome
    }

    fn has_current_data<S: KeyValueStore>(&self, store: &RecordStore<S>) -> bool {
        match store.get_raw(&self.keys.expenses) {
            None => false,
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Array(items)) => !items.is_empty(),
                Ok(Value::Null) => false,
                // Corrupted current data is discarded on load, not overwritten here.
                _ => true,
            },
        }
    }

    /// Persists migrated records, then retires the legacy key. Returns whether the
    /// records reached storage; on failure the legacy key is left for the next start.
    fn commit<S: KeyValueStore>(&self, store: &mut RecordStore<S>, records: &[ExpenseRecord]) -> bool {
        if let Err(e) = store.save(&self.keys.expenses, records) {
            warn!(error = %e, "migrated expenses could not be persisted; keeping legacy data for next start");
            return false;
        }
        if let Err(e) = store.remove(&self.keys.legacy_expenses) {
            warn!(error = %e, "could not remove legacy data after migration");
        }
        let marker = json!({ "status": "success", "completedAt": now_millis(), "months": records.len() });
        if let Err(e) = store.save(&self.keys.migration, &marker) {
            warn!(error = %e, "could not record migration marker");
        }
        true
    }
}
