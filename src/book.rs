// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The expense collection and everything that mutates it.

use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::db::SqliteStore;
use crate::error::{Field, StorageError, ValidationErrors};
use crate::migration::{MigrationOutcome, Migrator};
use crate::models::{ExpenseRecord, RepeatableTemplate};
use crate::store::{KeyValueStore, RecordStore, StorageEvent, StorageStatus, decode_external};
use crate::utils::{generate_id, now_millis};
use crate::validation::{DescriptionInput, NewExpense, validate_currency, validate_expense};

type UpdateHandler = Box<dyn FnMut(&[ExpenseRecord])>;

/// In-memory expense collection mirrored to a key-value store.
///
/// The collection is kept sorted by month; records sharing a month stay in insertion
/// order. Persistence is best effort: a failed write leaves memory ahead of storage.
pub struct ExpenseBook<S: KeyValueStore> {
    store: RecordStore<S>,
    config: TrackerConfig,
    records: Vec<ExpenseRecord>,
    templates: Vec<RepeatableTemplate>,
    migration: MigrationOutcome,
    update_handlers: Vec<UpdateHandler>,
}

impl<S: KeyValueStore> ExpenseBook<S> {
    /// Runs the startup migration if it applies, then loads all collections.
    pub fn open(backend: S, config: TrackerConfig) -> Self {
        let mut store = RecordStore::new(backend);
        let migration = Migrator::new(&config).run_startup_migration(&mut store);

        // Migrated records stay in memory even when storage refused them.
        let mut records: Vec<ExpenseRecord> = match &migration {
            MigrationOutcome::Success(migrated) => migrated.clone(),
            _ => store.load_or(&config.keys.expenses, Vec::new()),
        };
        normalize(&mut records, &config.default_currency);
        let templates = store.load_or(&config.keys.templates, Vec::new());
        debug!(records = records.len(), "expense book opened");

        Self {
            store,
            config,
            records,
            templates,
            migration,
            update_handlers: Vec::new(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn migration_outcome(&self) -> &MigrationOutcome {
        &self.migration
    }

    pub fn storage_status(&self) -> StorageStatus {
        self.store.status()
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn on_storage_event(&mut self, handler: impl FnMut(&StorageEvent) + 'static) {
        self.store.on_storage_event(handler);
    }

    /// Subscribes to collection replacements that arrive from other processes.
    pub fn on_external_update(&mut self, handler: impl FnMut(&[ExpenseRecord]) + 'static) {
        self.update_handlers.push(Box::new(handler));
    }

    /// Appends a record built from already-valid values.
    pub fn add(&mut self, month: &str, description: &str, amount: f64, currency: &str) -> ExpenseRecord {
        let record = ExpenseRecord {
            id: generate_id(),
            month: month.to_string(),
            description: description.to_string(),
            amount,
            currency: currency.to_string(),
            timestamp: now_millis(),
        };
        let idx = self
            .records
            .partition_point(|r| r.month.as_str() <= record.month.as_str());
        self.records.insert(idx, record.clone());
        self.persist_records();
        record
    }

    /// Validates raw form input and adds it. Nothing is created on error.
    pub fn submit(&mut self, input: &NewExpense) -> Result<ExpenseRecord, ValidationErrors> {
        let valid = validate_expense(input)?;
        Ok(self.add(&valid.month, &valid.description, valid.amount, &valid.currency))
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.persist_records();
        info!("cleared all expenses");
    }

    pub fn by_month(&self, month: &str) -> Vec<&ExpenseRecord> {
        self.records.iter().filter(|r| r.month == month).collect()
    }

    /// Feeds a change observed on the backing store. Returns true when the collection
    /// was replaced; unparseable payloads leave local state as it was.
    pub fn apply_external_change(&mut self, key: &str, new_value: Option<&str>) -> bool {
        if key == self.config.keys.templates {
            if let Some(templates) =
                new_value.and_then(|raw| decode_external::<Vec<RepeatableTemplate>>(key, raw))
            {
                self.templates = templates;
            }
            return false;
        }
        if key != self.config.keys.expenses {
            return false;
        }
        let Some(raw) = new_value else {
            return false;
        };
        let Some(mut records) = decode_external::<Vec<ExpenseRecord>>(key, raw) else {
            return false;
        };
        normalize(&mut records, &self.config.default_currency);
        self.records = records;
        for handler in self.update_handlers.iter_mut() {
            handler(&self.records);
        }
        true
    }

    pub fn currency_preference(&self) -> String {
        self.store
            .get_raw(&self.config.keys.currency)
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.config.default_currency.clone())
    }

    pub fn set_currency_preference(&mut self, code: &str) -> Result<String, ValidationErrors> {
        let code = validate_currency(code).map_err(|m| ValidationErrors::single(Field::Currency, m))?;
        if let Err(e) = self.store.set_raw(&self.config.keys.currency, &code) {
            warn!(error = %e, "failed to save currency preference");
        }
        Ok(code)
    }

    pub fn templates(&self) -> &[RepeatableTemplate] {
        &self.templates
    }

    /// Remembers a template unless an identical one exists. Returns whether it was added.
    pub fn save_template(&mut self, template: RepeatableTemplate) -> bool {
        if self.templates.contains(&template) {
            return false;
        }
        self.templates.push(template);
        self.persist_templates();
        true
    }

    pub fn remove_template(&mut self, template: &RepeatableTemplate) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t != template);
        let removed = self.templates.len() != before;
        if removed {
            self.persist_templates();
        }
        removed
    }

    pub fn add_from_template(
        &mut self,
        template: &RepeatableTemplate,
        month: &str,
    ) -> Result<ExpenseRecord, ValidationErrors> {
        self.submit(&NewExpense {
            month: month.to_string(),
            description: DescriptionInput::Category(template.category.clone()),
            amount: template.amount.clone(),
            currency: template.currency.clone(),
        })
    }

    fn persist_records(&mut self) {
        if let Err(e) = self.store.save(&self.config.keys.expenses, &self.records) {
            debug!(error = %e, "expenses kept in memory only");
        }
    }

    fn persist_templates(&mut self) {
        if let Err(e) = self.store.save(&self.config.keys.templates, &self.templates) {
            debug!(error = %e, "templates kept in memory only");
        }
    }
}

impl ExpenseBook<SqliteStore> {
    /// Pulls in writes made by other processes. Returns how many replaced the collection.
    pub fn sync_external(&mut self) -> Result<usize, StorageError> {
        let changes = self.store.backend_mut().poll_external_changes()?;
        let mut applied = 0;
        for change in changes {
            if self.apply_external_change(&change.key, change.value.as_deref()) {
                applied += 1;
            }
        }
        Ok(applied)
    }
}

fn normalize(records: &mut [ExpenseRecord], default_currency: &str) {
    for rec in records.iter_mut().filter(|r| r.currency.is_empty()) {
        rec.currency = default_currency.to_string();
    }
    records.sort_by(|a, b| a.month.cmp(&b.month));
}
