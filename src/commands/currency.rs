// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::book::ExpenseBook;
use crate::commands::{arg, invalid};
use crate::config::{SUPPORTED_CURRENCIES, currency_symbol};
use crate::store::KeyValueStore;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle<S: KeyValueStore>(book: &mut ExpenseBook<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let code = book.set_currency_preference(arg(sub, "code")?).map_err(invalid)?;
            println!("Currency set to {} ({})", code, currency_symbol(&code));
        }
        Some(("list", _)) => {
            let current = book.currency_preference();
            let rows = SUPPORTED_CURRENCIES
                .iter()
                .map(|c| {
                    let mark = if c.code == current { "*" } else { "" };
                    vec![
                        mark.to_string(),
                        c.code.to_string(),
                        c.symbol.to_string(),
                        c.name.to_string(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["", "Code", "Symbol", "Name"], rows));
        }
        _ => {
            let code = book.currency_preference();
            println!("{} ({})", code, currency_symbol(&code));
        }
    }
    Ok(())
}
