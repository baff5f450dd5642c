// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pumpkin::config::TrackerConfig;
use pumpkin::error::ExportError;
use pumpkin::export::{ArtifactSink, CSV_MIME, CsvArtifact, DirectorySink, Exporter, generate_filename};
use pumpkin::models::ExpenseRecord;
use tempfile::tempdir;

fn rec(month: &str, description: &str, amount: f64, currency: &str) -> ExpenseRecord {
    ExpenseRecord {
        id: "1".to_string(),
        month: month.to_string(),
        description: description.to_string(),
        amount,
        currency: currency.to_string(),
        timestamp: 0,
    }
}

#[derive(Default)]
struct RecordingSink {
    delivered: Vec<CsvArtifact>,
    missing: Vec<&'static str>,
    asked: bool,
}

impl ArtifactSink for RecordingSink {
    fn missing_primitives(&self) -> Vec<&'static str> {
        self.missing.clone()
    }

    fn deliver(&mut self, artifact: &CsvArtifact) -> Result<(), ExportError> {
        self.asked = true;
        self.delivered.push(artifact.clone());
        Ok(())
    }
}

fn parse(csv_text: &str) -> Vec<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_text.as_bytes());
    rdr.records()
        .map(|r| r.unwrap().iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn header_and_plain_rows() {
    let exporter = Exporter::new(&TrackerConfig::default());
    let out = exporter
        .to_csv(&[rec("2024-03", "🛒 Groceries", 12.5, "USD"), rec("2023-11", "Rent", 800.0, "")])
        .unwrap();
    assert_eq!(
        out,
        "Month,Year,Description,Amount,Currency\n03,2024,🛒 Groceries,12.50,USD\n11,2023,Rent,800.00,INR"
    );
}

#[test]
fn empty_list_is_just_the_header() {
    let exporter = Exporter::new(&TrackerConfig::default());
    assert_eq!(exporter.to_csv(&[]).unwrap(), "Month,Year,Description,Amount,Currency");
}

#[test]
fn special_characters_are_quoted_and_round_trip() {
    let tricky = "He said, \"hi\"\nbye";
    let exporter = Exporter::new(&TrackerConfig::default());
    let out = exporter.to_csv(&[rec("2024-01", tricky, 3.0, "EUR")]).unwrap();
    assert!(out.contains("\"He said, \"\"hi\"\"\nbye\""));

    let rows = parse(&out);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], vec!["01", "2024", tricky, "3.00", "EUR"]);
}

#[test]
fn carriage_return_and_comma_force_quotes() {
    let exporter = Exporter::new(&TrackerConfig::default());
    let out = exporter
        .to_csv(&[rec("2024-01", "a\rb", 1.0, "USD"), rec("2024-01", "x,y", 1.0, "USD")])
        .unwrap();
    assert!(out.contains("\"a\rb\""));
    assert!(out.contains("\"x,y\""));
}

#[test]
fn round_trip_recovers_every_record() {
    let records = vec![
        rec("2022-12", "Dining", 19.99, "GBP"),
        rec("2023-01", "Gift, wrapped", 5.0, "CAD"),
        rec("2023-02", "Train \"express\"", 1234.56, "JPY"),
    ];
    let exporter = Exporter::new(&TrackerConfig::default());
    let out = exporter.to_csv(&records).unwrap();
    let rows = parse(&out);
    assert_eq!(rows.len(), records.len());
    for (row, r) in rows.iter().zip(&records) {
        assert_eq!(format!("{}-{}", row[1], row[0]), r.month);
        assert_eq!(row[2], r.description);
        assert_eq!(row[3].parse::<f64>().unwrap(), (r.amount * 100.0).round() / 100.0);
        assert_eq!(row[4], r.currency);
    }
}

#[test]
fn filename_uses_prefix_and_date() {
    let d = NaiveDate::from_ymd_opt(2025, 2, 7).unwrap();
    assert_eq!(generate_filename("expense-pumpkin", d), "expense-pumpkin-export-2025-02-07.csv");
    let exporter = Exporter::new(&TrackerConfig::default());
    assert_eq!(exporter.filename(d), "expense-pumpkin-export-2025-02-07.csv");
}

#[test]
fn empty_export_is_rejected_before_the_sink_is_touched() {
    let exporter = Exporter::new(&TrackerConfig::default());
    let mut sink = RecordingSink::default();
    let err = exporter
        .export(&[], NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), &mut sink)
        .unwrap_err();
    assert!(matches!(err, ExportError::NoData));
    assert!(!sink.asked);
}

#[test]
fn sink_without_primitives_reports_unsupported() {
    let exporter = Exporter::new(&TrackerConfig::default());
    let mut sink = RecordingSink {
        missing: vec!["blob"],
        ..RecordingSink::default()
    };
    let err = exporter
        .export(&[rec("2024-01", "x", 1.0, "USD")], NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), &mut sink)
        .unwrap_err();
    assert!(matches!(err, ExportError::DownloadUnsupported(ref m) if m == &vec!["blob"]));
    assert!(!sink.asked);
}

#[test]
fn export_delivers_csv_artifact() {
    let exporter = Exporter::new(&TrackerConfig::default());
    let mut sink = RecordingSink::default();
    let artifact = exporter
        .export(&[rec("2024-01", "x", 1.0, "USD")], NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(), &mut sink)
        .unwrap();
    assert_eq!(artifact.mime, CSV_MIME);
    assert_eq!(artifact.filename, "expense-pumpkin-export-2025-03-31.csv");
    assert_eq!(sink.delivered, vec![artifact]);
}

#[test]
fn directory_sink_writes_the_file() {
    let dir = tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path());
    let exporter = Exporter::new(&TrackerConfig::default());
    let artifact = exporter
        .export(&[rec("2024-01", "x", 1.0, "USD")], NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(), &mut sink)
        .unwrap();
    let written = std::fs::read_to_string(dir.path().join(&artifact.filename)).unwrap();
    assert_eq!(written, artifact.content);
    assert_eq!(sink.saved().len(), 1);
}

#[test]
fn directory_sink_requires_an_existing_directory() {
    let dir = tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path().join("missing"));
    let exporter = Exporter::new(&TrackerConfig::default());
    let err = exporter
        .export(&[rec("2024-01", "x", 1.0, "USD")], NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(), &mut sink)
        .unwrap_err();
    assert!(matches!(err, ExportError::DownloadUnsupported(_)));
}
