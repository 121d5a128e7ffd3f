// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn label_arg() -> Arg {
    Arg::new("label").long("label").required(true)
}

fn amount_arg() -> Arg {
    Arg::new("amount").long("amount").required(true)
}

fn row_arg() -> Arg {
    Arg::new("row")
        .long("row")
        .required(true)
        .value_parser(value_parser!(usize))
        .help("1-based row number as shown by `list`")
}

fn table_arg() -> Arg {
    Arg::new("table")
        .long("table")
        .required(true)
        .help("incomes | expenses | fixed_costs | installments | planned | shopping | tasks")
}

fn list_cmd() -> Command {
    Command::new("list").about("List rows").arg(json_flag())
}

fn rm_cmd() -> Command {
    Command::new("rm")
        .about("Remove a row (rewrites the table without it)")
        .arg(row_arg())
}

fn done_cmd() -> Command {
    Command::new("done").about("Mark a row as done").arg(row_arg())
}

pub fn build_cli() -> Command {
    command!()
        .about("Household budget: incomes, expenses, installments, savings and a monthly dashboard")
        .arg(
            Arg::new("home")
                .long("home")
                .env("HOMEBUDGET_HOME")
                .global(true)
                .help("Override the config/data home directory"),
        )
        .arg(
            Arg::new("secret")
                .long("secret")
                .env("HOMEBUDGET_SECRET")
                .hide_env_values(true)
                .global(true)
                .help("Shared secret, required when one is configured"),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .global(true)
                .help("Reference date YYYY-MM-DD (defaults to the local date)"),
        )
        .arg(
            Arg::new("month_only")
                .long("month-only")
                .action(ArgAction::SetTrue)
                .global(true)
                .conflicts_with("all_time")
                .help("Count only this month's incomes and expenses"),
        )
        .arg(
            Arg::new("all_time")
                .long("all-time")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Count every income and expense row"),
        )
        .subcommand(Command::new("init").about("Create config and data store"))
        .subcommand(
            Command::new("income")
                .about("Income records")
                .subcommand(
                    Command::new("add")
                        .about("Record income")
                        .arg(label_arg())
                        .arg(amount_arg()),
                )
                .subcommand(list_cmd())
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("expense")
                .about("Expense records")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense")
                        .arg(label_arg())
                        .arg(amount_arg())
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("Variable")
                                .help("Variable | Fixed | Savings"),
                        ),
                )
                .subcommand(list_cmd())
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("fixed")
                .about("Recurring monthly costs")
                .subcommand(
                    Command::new("add")
                        .about("Add a fixed cost")
                        .arg(label_arg())
                        .arg(amount_arg()),
                )
                .subcommand(list_cmd())
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("installment")
                .about("Installment loans")
                .subcommand(
                    Command::new("add")
                        .about("Add an installment plan")
                        .arg(label_arg())
                        .arg(amount_arg())
                        .arg(Arg::new("start").long("start").required(true))
                        .arg(Arg::new("end").long("end").required(true)),
                )
                .subcommand(list_cmd().arg(
                    Arg::new("active")
                        .long("active")
                        .action(ArgAction::SetTrue)
                        .help("Only plans covering the reference date"),
                ))
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("planned")
                .about("Planned expenses (not counted in the balance)")
                .subcommand(
                    Command::new("add")
                        .about("Plan an expense")
                        .arg(label_arg())
                        .arg(amount_arg())
                        .arg(Arg::new("month").long("month").required(true)),
                )
                .subcommand(list_cmd())
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("shopping")
                .about("Shopping list")
                .subcommand(Command::new("add").about("Add an item").arg(label_arg()))
                .subcommand(list_cmd())
                .subcommand(done_cmd())
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("task")
                .about("Household tasks")
                .subcommand(
                    Command::new("add")
                        .about("Add a task")
                        .arg(label_arg())
                        .arg(Arg::new("due").long("due").required(true)),
                )
                .subcommand(list_cmd())
                .subcommand(done_cmd())
                .subcommand(rm_cmd()),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Balance, daily allowance and spending by category")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("savings")
                .about("Savings reserve and month close")
                .subcommand(Command::new("status").about("Show the reserve").arg(json_flag()))
                .subcommand(Command::new("close").about("Move the current balance into savings"))
                .subcommand(Command::new("undo").about("Reverse the last month close"))
                .subcommand(
                    Command::new("withdraw")
                        .about("Take money out of savings (booked as income)")
                        .arg(amount_arg()),
                )
                .subcommand(
                    Command::new("deposit")
                        .about("Put money into savings (booked as an expense)")
                        .arg(amount_arg()),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Bulk edits")
                .subcommand(
                    Command::new("save")
                        .about("Replace a table with an edited CSV; rows with delete=true are dropped")
                        .arg(table_arg())
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export a table")
                .arg(table_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv | json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("import")
                .about("Append rows from a CSV with the table's header")
                .arg(table_arg())
                .arg(Arg::new("path").long("path").required(true)),
        )
        .subcommand(Command::new("doctor").about("Check stored rows and savings cells"))
}
