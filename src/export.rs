// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use crate::config::TrackerConfig;
use crate::error::ExportError;
use crate::models::ExpenseRecord;
use crate::utils::split_month;

pub const CSV_HEADER: [&str; 5] = ["Month", "Year", "Description", "Amount", "Currency"];
pub const CSV_MIME: &str = "text/csv; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvArtifact {
    pub filename: String,
    pub mime: &'static str,
    pub content: String,
}

/// Capability that hands a finished export to the user.
pub trait ArtifactSink {
    /// Primitives this sink lacks; delivery is refused unless this is empty.
    fn missing_primitives(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn deliver(&mut self, artifact: &CsvArtifact) -> Result<(), ExportError>;
}

/// Saves exports as files inside a directory.
pub struct DirectorySink {
    dir: PathBuf,
    saved: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            saved: Vec::new(),
        }
    }

    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }
}

impl ArtifactSink for DirectorySink {
    fn missing_primitives(&self) -> Vec<&'static str> {
        if self.dir.is_dir() {
            Vec::new()
        } else {
            vec!["writable directory"]
        }
    }

    fn deliver(&mut self, artifact: &CsvArtifact) -> Result<(), ExportError> {
        let path = self.dir.join(&artifact.filename);
        fs::write(&path, artifact.content.as_bytes())
            .map_err(|e| ExportError::Delivery(format!("{}: {}", path.display(), e)))?;
        self.saved.push(path);
        Ok(())
    }
}

pub fn generate_filename(app_prefix: &str, date: NaiveDate) -> String {
    format!("{}-export-{}.csv", app_prefix, date.format("%Y-%m-%d"))
}

pub struct Exporter {
    app_prefix: String,
    default_currency: String,
}

impl Exporter {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            app_prefix: config.app_prefix.clone(),
            default_currency: config.default_currency.clone(),
        }
    }

    /// Header plus one row per record, joined by `\n` with no trailing newline.
    ///
    /// Fields are quoted only when they contain a quote, comma, CR or LF.
    pub fn to_csv(&self, records: &[ExpenseRecord]) -> Result<String, ExportError> {
        let mut wtr = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        wtr.write_record(CSV_HEADER)?;
        for rec in records {
            let (year, month) = split_month(&rec.month);
            let currency = if rec.currency.is_empty() {
                self.default_currency.as_str()
            } else {
                rec.currency.as_str()
            };
            let amount = format!("{:.2}", rec.amount);
            wtr.write_record([month, year, rec.description.as_str(), amount.as_str(), currency])?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ExportError::Delivery(e.error().to_string()))?;
        let mut out = String::from_utf8(bytes).map_err(|e| ExportError::Delivery(e.to_string()))?;
        if out.ends_with('\n') {
            out.pop();
        }
        Ok(out)
    }

    pub fn filename(&self, date: NaiveDate) -> String {
        generate_filename(&self.app_prefix, date)
    }

    /// Serializes `records` and hands them to `sink`. An empty collection is refused first.
    pub fn export<K: ArtifactSink + ?Sized>(
        &self,
        records: &[ExpenseRecord],
        today: NaiveDate,
        sink: &mut K,
    ) -> Result<CsvArtifact, ExportError> {
        if records.is_empty() {
            return Err(ExportError::NoData);
        }
        let missing = sink.missing_primitives();
        if !missing.is_empty() {
            return Err(ExportError::DownloadUnsupported(missing));
        }
        let artifact = CsvArtifact {
            filename: self.filename(today),
            mime: CSV_MIME,
            content: self.to_csv(records)?,
        };
        sink.deliver(&artifact)?;
        info!(rows = records.len(), filename = artifact.filename.as_str(), "exported expenses");
        Ok(artifact)
    }
}
