// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pumpkin::book::ExpenseBook;
use pumpkin::commands::{currency, expenses, exporter, reports, templates};
use pumpkin::config::TrackerConfig;
use pumpkin::store::MemoryStore;
use pumpkin::cli;
use tempfile::tempdir;

fn book() -> ExpenseBook<MemoryStore> {
    ExpenseBook::open(MemoryStore::new(), TrackerConfig::default())
}

fn sub(args: &[&str]) -> (String, clap::ArgMatches) {
    let mut argv = vec!["pumpkin"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (name, m) = matches.subcommand().expect("subcommand");
    (name.to_string(), m.clone())
}

#[test]
fn add_uses_currency_preference_when_not_given() {
    let mut b = book();
    b.set_currency_preference("JPY").unwrap();
    let (_, m) = sub(&["add", "--month", "2024-08", "--category", "travel", "--amount", "1500"]);
    let rec = expenses::add(&mut b, &m).unwrap();
    assert_eq!(rec.currency, "JPY");
    assert_eq!(rec.description, "✈️ Travel");
}

#[test]
fn add_reports_validation_errors() {
    let mut b = book();
    let (_, m) = sub(&["add", "--month", "2024-08", "-d", "Taxi", "--amount", "10.999"]);
    let err = expenses::add(&mut b, &m).unwrap_err();
    assert!(err.to_string().contains("amount"));
    assert!(b.records().is_empty());
}

#[test]
fn list_month_orders_by_creation_time() {
    let mut b = book();
    b.add("2024-08", "second", 2.0, "USD");
    b.add("2024-07", "other", 2.0, "USD");
    b.add("2024-08", "third", 3.0, "USD");
    let rows = expenses::query_rows(&b, Some("2024-08"));
    let names: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(names, vec!["second", "third"]);
    assert_eq!(rows[0].amount, "2.00");
    assert_eq!(expenses::query_rows(&b, None).len(), 3);
}

#[test]
fn clear_requires_confirmation() {
    let mut b = book();
    b.add("2024-08", "x", 2.0, "USD");
    let (_, m) = sub(&["clear"]);
    assert!(expenses::clear(&mut b, &m).is_err());
    assert_eq!(b.records().len(), 1);
    let (_, m) = sub(&["clear", "--yes"]);
    expenses::clear(&mut b, &m).unwrap();
    assert!(b.records().is_empty());
}

#[test]
fn export_writes_into_out_dir_and_refuses_empty() {
    let dir = tempdir().unwrap();
    let out = dir.path().to_string_lossy().to_string();
    let mut b = book();
    let (_, m) = sub(&["export", "--out", &out]);
    assert!(exporter::handle(&b, &m).is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    b.add("2024-08", "Books", 20.0, "GBP");
    let path = exporter::handle(&b, &m).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("expense-pumpkin-export-"));
    assert!(name.ends_with(".csv"));
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "Month,Year,Description,Amount,Currency\n08,2024,Books,20.00,GBP");
}

#[test]
fn currency_set_rejects_unknown_codes() {
    let mut b = book();
    let (_, m) = sub(&["currency", "set", "XYZ"]);
    assert!(currency::handle(&mut b, &m).is_err());
    let (_, m) = sub(&["currency", "set", "usd"]);
    currency::handle(&mut b, &m).unwrap();
    assert_eq!(b.currency_preference(), "USD");
}

#[test]
fn template_save_and_use() {
    let mut b = book();
    let (_, m) = sub(&["template", "save", "--category", "subscriptions", "--amount", "9.99", "--currency", "EUR"]);
    templates::handle(&mut b, &m).unwrap();
    templates::handle(&mut b, &m).unwrap();
    assert_eq!(b.templates().len(), 1);

    let (_, m) = sub(&["template", "use", "1", "--month", "2024-10"]);
    templates::handle(&mut b, &m).unwrap();
    assert_eq!(b.records()[0].description, "📱 Subscriptions");
    assert_eq!(b.records()[0].amount, 9.99);

    let (_, m) = sub(&["template", "use", "2", "--month", "2024-10"]);
    assert!(templates::handle(&mut b, &m).is_err());

    let (_, m) = sub(&["template", "rm", "1"]);
    templates::handle(&mut b, &m).unwrap();
    assert!(b.templates().is_empty());
}

#[test]
fn template_save_validates_fields() {
    let mut b = book();
    let (_, m) = sub(&["template", "save", "--category", "boats", "--amount", "0"]);
    assert!(templates::handle(&mut b, &m).is_err());
    assert!(b.templates().is_empty());
}

#[test]
fn month_amount_uses_the_month_currency() {
    let mut b = book();
    b.set_currency_preference("USD").unwrap();
    b.add("2024-05", "Sushi", 4000.0, "JPY");
    b.add("2024-06", "Rent", 700.0, "EUR");
    b.add("2024-06", "Pub", 30.0, "GBP");

    assert_eq!(
        reports::month_amount(b.records(), "2024-05", "INR").as_deref(),
        Some("¥4000.00")
    );
    assert_eq!(
        reports::month_amount(b.records(), "2024-06", "INR").as_deref(),
        Some("Mixed")
    );
    assert_eq!(reports::month_amount(b.records(), "2024-07", "INR"), None);
}

#[test]
fn sync_is_library_only() {
    assert!(cli::build_cli().try_get_matches_from(["pumpkin", "sync"]).is_err());
    assert!(cli::build_cli().try_get_matches_from(["pumpkin", "migrate"]).is_ok());
}
