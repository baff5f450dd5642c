// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod currency;
pub mod expenses;
pub mod exporter;
pub mod migrate;
pub mod reports;
pub mod templates;

use anyhow::{Result, anyhow};

use crate::error::ValidationErrors;

pub(crate) fn arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    m.get_one::<String>(name)
        .ok_or_else(|| anyhow!("missing required argument '{}'", name))
}

pub(crate) fn invalid(errors: ValidationErrors) -> anyhow::Error {
    let lines: Vec<String> = errors
        .iter()
        .map(|(field, msg)| format!("  {}: {}", field.as_str(), msg))
        .collect();
    anyhow!("Invalid expense:\n{}", lines.join("\n"))
}
