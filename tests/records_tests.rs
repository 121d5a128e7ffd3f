// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use homebudget::config::AppConfig;
use homebudget::db::{self, SqliteStore};
use homebudget::models::{self, IncomeRecord, ShoppingItem, TaskItem};
use homebudget::store::TableStore;
use homebudget::{cli, commands};
use rust_decimal::Decimal;

fn setup() -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    db::init_schema(&store).unwrap();
    store
}

fn run(store: &SqliteStore, args: &[&str]) -> anyhow::Result<()> {
    let cfg = AppConfig::default();
    let mut argv = vec!["homebudget", "--today", "2025-05-10"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let s = commands::session(store, &cfg, &matches)?;
    match matches.subcommand() {
        Some(("income", sub)) => commands::incomes::handle(&s, sub),
        Some(("expense", sub)) => commands::expenses::handle(&s, sub),
        Some(("installment", sub)) => commands::installments::handle(&s, sub),
        Some(("planned", sub)) => commands::planned::handle(&s, sub),
        Some(("shopping", sub)) => commands::lists::handle_shopping(&s, sub),
        Some(("task", sub)) => commands::lists::handle_tasks(&s, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

#[test]
fn rm_removes_exactly_one_row_by_position() {
    let store = setup();
    for (label, amount) in [("A", "1"), ("B", "2"), ("C", "3")] {
        run(&store, &["income", "add", "--label", label, "--amount", amount]).unwrap();
    }
    run(&store, &["income", "rm", "--row", "2"]).unwrap();

    let left = models::load::<IncomeRecord>(&store).unwrap().into_values();
    let labels: Vec<&str> = left.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["A", "C"]);
    assert_eq!(left[1].amount, Decimal::from(3));

    assert!(run(&store, &["income", "rm", "--row", "3"]).is_err());
    assert!(run(&store, &["income", "rm", "--row", "0"]).is_err());
    assert_eq!(store.read_all("incomes").unwrap().len(), 2);
}

#[test]
fn rm_can_drop_a_corrupt_row() {
    let store = setup();
    run(&store, &["income", "add", "--label", "Good", "--amount", "10"]).unwrap();
    store
        .append("incomes", &["garbage".into(), "Bad".into(), "".into()])
        .unwrap();
    assert_eq!(models::load::<IncomeRecord>(&store).unwrap().issues.len(), 1);

    run(&store, &["income", "rm", "--row", "2"]).unwrap();
    let loaded = models::load::<IncomeRecord>(&store).unwrap();
    assert!(loaded.issues.is_empty());
    assert_eq!(loaded.records.len(), 1);
}

#[test]
fn invalid_submissions_write_nothing() {
    let store = setup();
    assert!(run(&store, &["income", "add", "--label", "  ", "--amount", "5"]).is_err());
    assert!(run(&store, &["income", "add", "--label", "X", "--amount", "abc"]).is_err());
    assert!(run(&store, &["income", "add", "--label", "X", "--amount", ""]).is_err());
    assert!(
        run(
            &store,
            &["expense", "add", "--label", "X", "--amount", "5", "--category", "Yachts"],
        )
        .is_err()
    );
    assert!(
        run(
            &store,
            &[
                "installment", "add", "--label", "Loan", "--amount", "5",
                "--start", "2025-06-01", "--end", "2025-01-01",
            ],
        )
        .is_err()
    );
    assert!(run(&store, &["planned", "add", "--label", "TV", "--amount", "5", "--month", "2025-13"]).is_err());
    for table in ["incomes", "expenses", "installments", "planned"] {
        assert!(store.read_all(table).unwrap().is_empty(), "{table} was written");
    }
}

#[test]
fn done_flips_only_the_chosen_row() {
    let store = setup();
    run(&store, &["shopping", "add", "--label", "Milk"]).unwrap();
    run(&store, &["shopping", "add", "--label", "Eggs"]).unwrap();
    run(&store, &["shopping", "done", "--row", "2"]).unwrap();

    let items = models::load::<ShoppingItem>(&store).unwrap().into_values();
    assert!(!items[0].done);
    assert!(items[1].done);
    assert_eq!(items[1].label, "Eggs");

    run(&store, &["task", "add", "--label", "Pay rent", "--due", "2025-05-01"]).unwrap();
    run(&store, &["task", "done", "--row", "1"]).unwrap();
    let tasks = models::load::<TaskItem>(&store).unwrap().into_values();
    assert!(tasks[0].done);
    assert!(run(&store, &["task", "done", "--row", "2"]).is_err());
}

#[test]
fn list_handlers_print_without_error() {
    let store = setup();
    run(&store, &["income", "add", "--label", "Salary", "--amount", "10"]).unwrap();
    run(&store, &["task", "add", "--label", "Call", "--due", "2025-05-01"]).unwrap();
    run(&store, &["income", "list"]).unwrap();
    run(&store, &["income", "list", "--json"]).unwrap();
    run(&store, &["task", "list"]).unwrap();
    run(&store, &["installment", "list", "--active"]).unwrap();
}
