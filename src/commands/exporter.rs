// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use crate::book::ExpenseBook;
use crate::commands::arg;
use crate::export::{DirectorySink, Exporter};
use crate::store::KeyValueStore;
use anyhow::Result;

/// Writes the CSV into `--out` and returns the saved path.
pub fn handle<S: KeyValueStore>(book: &ExpenseBook<S>, sub: &clap::ArgMatches) -> Result<PathBuf> {
    let out = arg(sub, "out")?;
    let mut sink = DirectorySink::new(out);
    let exporter = Exporter::new(book.config());
    let today = chrono::Local::now().date_naive();
    let artifact = exporter.export(book.records(), today, &mut sink)?;
    let path = PathBuf::from(out).join(&artifact.filename);
    println!(
        "Exported {} expenses to {}",
        book.records().len(),
        path.display()
    );
    Ok(path)
}
