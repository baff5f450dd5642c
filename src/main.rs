// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use pumpkin::book::ExpenseBook;
use pumpkin::config::TrackerConfig;
use pumpkin::db;
use pumpkin::migration::MigrationOutcome;
use pumpkin::store::{KeyValueStore, MemoryStore, StorageEvent, StorageStatus};
use pumpkin::{cli, commands};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PUMPKIN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let matches = cli::build_cli().get_matches();
    let config = TrackerConfig::default();

    match db::open_or_init(&config) {
        Ok(store) => {
            let mut book = open_book(store, config);
            dispatch(&mut book, &matches)
        }
        Err(e) => {
            warn!(error = %e, "could not open the expense database");
            let mut book = open_book(MemoryStore::unavailable(), config);
            dispatch(&mut book, &matches)
        }
    }
}

fn open_book<S: KeyValueStore>(store: S, config: TrackerConfig) -> ExpenseBook<S> {
    let mut book = ExpenseBook::open(store, config);
    if book.storage_status() == StorageStatus::Unavailable {
        eprintln!("warning: storage is unavailable; expenses will not be saved after this run");
    }
    match book.migration_outcome() {
        MigrationOutcome::Success(records) => {
            eprintln!("Migrated old expenses into {} month(s)", records.len())
        }
        MigrationOutcome::Invalid(reason) => eprintln!(
            "warning: failed to migrate old expenses ({}); your data is safe but may need manual review",
            reason
        ),
        MigrationOutcome::NoLegacyData => {}
    }
    book.on_storage_event(|event| match event {
        StorageEvent::QuotaExceeded { .. } => {
            eprintln!("warning: storage is full; recent changes may not survive a restart")
        }
        StorageEvent::WriteFailed { reason, .. } => eprintln!("warning: could not save: {}", reason),
    });
    book
}

fn dispatch<S: KeyValueStore>(book: &mut ExpenseBook<S>, matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("add", sub)) => {
            commands::expenses::add(book, sub)?;
        }
        Some(("list", sub)) => commands::expenses::list(book, sub)?,
        Some(("clear", sub)) => commands::expenses::clear(book, sub)?,
        Some(("stats", sub)) => commands::reports::handle(book, sub)?,
        Some(("export", sub)) => {
            commands::exporter::handle(book, sub)?;
        }
        Some(("currency", sub)) => commands::currency::handle(book, sub)?,
        Some(("template", sub)) => commands::templates::handle(book, sub)?,
        Some(("migrate", _)) => commands::migrate::handle(book)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
