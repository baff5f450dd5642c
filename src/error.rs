// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage quota exceeded while writing '{key}'")]
    QuotaExceeded { key: String },
    #[error("persistent storage is unavailable")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No expenses to export")]
    NoData,
    #[error("file downloads are not supported here (missing: {})", .0.join(", "))]
    DownloadUnsupported(Vec<&'static str>),
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to deliver export: {0}")]
    Delivery(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LegacyRecordError {
    #[error("legacy record is not an object")]
    NotAnObject,
    #[error("legacy record field '{0}' is missing or has the wrong type")]
    Field(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Month,
    Description,
    Amount,
    Currency,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Month => "month",
            Field::Description => "description",
            Field::Amount => "amount",
            Field::Currency => "currency",
        }
    }
}

/// Field-keyed messages for rejected expense input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errs = Self::new();
        errs.insert(field, message);
        errs
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{}: {}", field.as_str(), msg))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
