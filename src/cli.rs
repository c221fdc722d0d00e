// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn period_args() -> [Arg; 2] {
    [
        Arg::new("month")
            .long("month")
            .value_name("YYYY-MM")
            .conflicts_with("year")
            .help("Calendar month (defaults to the current month)"),
        Arg::new("year")
            .long("year")
            .value_name("YYYY")
            .help("Calendar year"),
    ]
}

fn fold_args() -> [Arg; 2] {
    [
        Arg::new("top")
            .long("top")
            .value_parser(value_parser!(usize))
            .help("Keep the N largest entries and fold the rest into 'Other' (default 5)"),
        Arg::new("all")
            .long("all")
            .action(ArgAction::SetTrue)
            .conflicts_with("top")
            .help("List every entry without folding"),
    ]
}

fn name_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(Arg::new("name").long("name").required(true))
}

fn label_cmd(name: &'static str, what: &'static str) -> Command {
    Command::new(name)
        .about(format!("Manage custom {}", what))
        .subcommand(name_cmd("add", "Add a custom label"))
        .subcommand(Command::new("list").about("List default and custom labels"))
        .subcommand(name_cmd("rm", "Remove a custom label"))
}

pub fn build_cli() -> Command {
    Command::new("pocketbook")
        .about("Track income and expenses; summarize months and years")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("SQLite database file (overrides POCKETBOOK_DB)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("income")
                        .about("Record income")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("source").long("source").required(true))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("expense")
                        .about("Record an expense")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("payment_source")
                                .long("payment-source")
                                .help("Income source that paid for it"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of a transaction")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("source").long("source"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("payment_source").long("payment-source"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").long("id").required(true)),
                )
                .subcommand(
                    Command::new("list")
                        .about("Browse transaction history")
                        .args(period_args())
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("source").long("source"))
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .value_name("REGEX")
                                .help("Match against note and labels"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(label_cmd("category", "expense categories"))
        .subcommand(label_cmd("source", "income sources"))
        .subcommand(
            Command::new("report")
                .about("Summaries and breakdowns")
                .subcommand(
                    Command::new("summary")
                        .about("Income, expenses and balance for a month or year")
                        .args(period_args())
                        .arg(
                            Arg::new("recent")
                                .long("recent")
                                .value_parser(value_parser!(usize))
                                .help("Also show the N latest transactions"),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("breakdown")
                        .about("Income by source or expenses by category")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["income", "expense"]),
                        )
                        .args(period_args())
                        .args(fold_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("payment-sources")
                        .about("Expenses by the source that paid for them")
                        .args(period_args())
                        .args(fold_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("compare")
                        .about("Two months or two years side by side")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .num_args(2)
                                .value_names(["YYYY-MM", "YYYY-MM"]),
                        )
                        .arg(
                            Arg::new("years")
                                .long("years")
                                .num_args(2)
                                .value_names(["YYYY", "YYYY"]),
                        )
                        .group(
                            ArgGroup::new("periods")
                                .args(["months", "years"])
                                .required(true),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("trend")
                        .about("Month-by-month totals for a year")
                        .arg(Arg::new("year").long("year").value_name("YYYY"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("sources")
                        .about("Remaining balance per income source")
                        .args(period_args())
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .conflicts_with_all(["month", "year"])
                                .help("Use the whole history"),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("transactions")
                        .about("Import transactions from CSV")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Preferences")
                .subcommand(
                    Command::new("currency")
                        .about("Show or set the display currency")
                        .arg(Arg::new("set").long("set").value_name("CODE")),
                ),
        )
        .subcommand(Command::new("doctor").about("Find records analytics will skip or relabel"))
}
