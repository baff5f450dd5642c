// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

pub fn build_cli() -> Command {
    Command::new("pumpkin")
        .about("Monthly expense tracker with multi-currency totals and CSV export")
        .version(clap::crate_version!())
        .subcommand(
            Command::new("add")
                .about("Record an expense for a month")
                .arg(Arg::new("month").long("month").required(true).help("YYYY-MM"))
                .arg(Arg::new("description").long("description").short('d'))
                .arg(Arg::new("category").long("category").short('c'))
                .group(
                    ArgGroup::new("what")
                        .args(["description", "category"])
                        .required(true),
                )
                .arg(Arg::new("amount").long("amount").short('a').required(true))
                .arg(
                    Arg::new("currency")
                        .long("currency")
                        .help("Defaults to the saved currency preference"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List expenses")
                .arg(Arg::new("month").long("month").conflicts_with("year"))
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_parser(value_parser!(i32)),
                )
                .arg(json_flag()),
        )
        .subcommand(Command::new("stats").about("Summary statistics").arg(json_flag()))
        .subcommand(
            Command::new("export")
                .about("Export all expenses as CSV")
                .arg(Arg::new("out").long("out").default_value(".")),
        )
        .subcommand(
            Command::new("clear").about("Delete every expense").arg(
                Arg::new("yes")
                    .long("yes")
                    .action(ArgAction::SetTrue)
                    .help("Confirm"),
            ),
        )
        .subcommand(
            Command::new("currency")
                .about("Currency preference")
                .subcommand(Command::new("get"))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("set").arg(Arg::new("code").required(true))),
        )
        .subcommand(
            Command::new("template")
                .about("Repeatable expense shortcuts")
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("save")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("currency").long("currency")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("index")
                            .required(true)
                            .value_parser(value_parser!(usize)),
                    ),
                )
                .subcommand(
                    Command::new("use")
                        .arg(
                            Arg::new("index")
                                .required(true)
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(Arg::new("month").long("month").required(true)),
                ),
        )
        .subcommand(Command::new("migrate").about("Show the result of the legacy data migration"))
}
