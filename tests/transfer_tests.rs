// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use homebudget::config::AppConfig;
use homebudget::db::{self, SqliteStore};
use homebudget::models::{self, ExpenseRecord, IncomeRecord};
use homebudget::store::TableStore;
use homebudget::{cli, commands};
use rust_decimal::Decimal;
use std::fs;
use tempfile::tempdir;

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
        Some(("edit", sub)) => commands::editor::handle(&s, sub),
        Some(("export", sub)) => commands::exporter::handle(&s, sub),
        Some(("import", sub)) => commands::importer::handle(&s, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

fn seed(store: &SqliteStore) {
    for (label, amount) in [("Salary", "4000"), ("Gift", "150.25"), ("Refund", "12")] {
        run(store, &["income", "add", "--label", label, "--amount", amount]).unwrap();
    }
}

#[test]
fn exported_csv_saves_back_unchanged() {
    let store = setup();
    seed(&store);
    let before = store.read_all("incomes").unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("incomes.csv");
    let path_str = path.to_string_lossy().to_string();
    run(&store, &["export", "--table", "incomes", "--out", &path_str]).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("timestamp,label,amount,delete\n"));
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().skip(1).all(|l| l.ends_with(",false")));

    run(&store, &["edit", "save", "--table", "incomes", "--path", &path_str]).unwrap();
    assert_eq!(store.read_all("incomes").unwrap(), before);
}

#[test]
fn edit_save_applies_changes_and_deletions() {
    let store = setup();
    seed(&store);
    let dir = tempdir().unwrap();
    let path = dir.path().join("edit.csv");
    fs::write(
        &path,
        "timestamp,label,amount,delete\n\
         2025-05-10 08:00:00,Salary,4100,false\n\
         2025-05-10 08:00:00,Gift,150.25,true\n\
         2025-05-10 08:00:00,Refund,12,no\n",
    )
    .unwrap();
    let path_str = path.to_string_lossy().to_string();
    run(&store, &["edit", "save", "--table", "incomes", "--path", &path_str]).unwrap();

    let rows = models::load::<IncomeRecord>(&store).unwrap().into_values();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].amount, Decimal::from(4100));
    assert_eq!(rows[1].label, "Refund");
}

#[test]
fn edit_save_with_a_bad_row_changes_nothing() {
    let store = setup();
    seed(&store);
    let before = store.read_all("incomes").unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("edit.csv");
    fs::write(
        &path,
        "timestamp,label,amount,delete\n\
         2025-05-10 08:00:00,Salary,,false\n\
         2025-05-10 08:00:00,Gift,150.25,false\n",
    )
    .unwrap();
    let path_str = path.to_string_lossy().to_string();
    assert!(run(&store, &["edit", "save", "--table", "incomes", "--path", &path_str]).is_err());
    assert_eq!(store.read_all("incomes").unwrap(), before);
}

#[test]
fn export_json_and_unknown_format() {
    let store = setup();
    seed(&store);
    let dir = tempdir().unwrap();

    let json_path = dir.path().join("incomes.json");
    let json_str = json_path.to_string_lossy().to_string();
    run(&store, &["export", "--table", "incomes", "--format", "json", "--out", &json_str]).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[1]["label"], "Gift");
    assert_eq!(items[1]["amount"], "150.25");

    let bad_path = dir.path().join("incomes.xml");
    let bad_str = bad_path.to_string_lossy().to_string();
    assert!(run(&store, &["export", "--table", "incomes", "--format", "xml", "--out", &bad_str]).is_err());
    assert!(!bad_path.exists());
}

#[test]
fn import_appends_validated_rows() {
    let store = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("expenses.csv");
    fs::write(
        &path,
        "timestamp,label,amount,category,kind\n\
         2025-05-01 09:00:00,Bread,4.50,food,Variable\n\
         2025-05-02,Bus,3,Transport,Variable\n",
    )
    .unwrap();
    let path_str = path.to_string_lossy().to_string();
    run(&store, &["import", "--table", "expenses", "--path", &path_str]).unwrap();

    let rows = models::load::<ExpenseRecord>(&store).unwrap();
    assert!(rows.issues.is_empty());
    assert_eq!(rows.records.len(), 2);
    assert_eq!(rows.records[1].1.label, "Bus");
    assert_eq!(rows.records[0].1.category, "Food");
    assert_eq!(store.read_all("expenses").unwrap()[0].get("category"), Some("Food"));
}

#[test]
fn import_rejects_unknown_or_blank_categories() {
    let store = setup();
    let dir = tempdir().unwrap();
    for (name, category) in [("unknown.csv", "Yachts"), ("blank.csv", "")] {
        let path = dir.path().join(name);
        fs::write(
            &path,
            format!(
                "timestamp,label,amount,category,kind\n\
                 2025-05-01 09:00:00,Bread,4.50,food,Variable\n\
                 2025-05-02 09:00:00,Boat,900,{},Variable\n",
                category
            ),
        )
        .unwrap();
        let path_str = path.to_string_lossy().to_string();
        assert!(run(&store, &["import", "--table", "expenses", "--path", &path_str]).is_err());
        assert!(store.read_all("expenses").unwrap().is_empty());
    }
}

#[test]
fn edit_save_canonicalises_and_checks_categories() {
    let store = setup();
    let dir = tempdir().unwrap();
    let seed = dir.path().join("seed.csv");
    fs::write(
        &seed,
        "timestamp,label,amount,category,kind\n\
         2025-05-01 09:00:00,Bread,4.50,Food,Variable\n",
    )
    .unwrap();
    let seed_str = seed.to_string_lossy().to_string();
    run(&store, &["import", "--table", "expenses", "--path", &seed_str]).unwrap();
    let before = store.read_all("expenses").unwrap();

    let bad = dir.path().join("bad.csv");
    fs::write(
        &bad,
        "timestamp,label,amount,category,kind,delete\n\
         2025-05-01 09:00:00,Bread,4.50,Food,Variable,false\n\
         2025-05-02 09:00:00,Boat,900,Yachts,Variable,false\n",
    )
    .unwrap();
    let bad_str = bad.to_string_lossy().to_string();
    assert!(run(&store, &["edit", "save", "--table", "expenses", "--path", &bad_str]).is_err());
    assert_eq!(store.read_all("expenses").unwrap(), before);

    // A deleted row is not checked.
    let good = dir.path().join("good.csv");
    fs::write(
        &good,
        "timestamp,label,amount,category,kind,delete\n\
         2025-05-01 09:00:00,Bread,4.50,food,Variable,false\n\
         2025-05-02 09:00:00,Boat,900,Yachts,Variable,true\n",
    )
    .unwrap();
    let good_str = good.to_string_lossy().to_string();
    run(&store, &["edit", "save", "--table", "expenses", "--path", &good_str]).unwrap();
    let rows = store.read_all("expenses").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("category"), Some("Food"));
}

#[test]
fn import_rejects_the_whole_file_on_one_bad_row() {
    let store = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("incomes.csv");
    fs::write(
        &path,
        "timestamp,label,amount\n\
         2025-05-01 09:00:00,Salary,100\n\
         2025-05-02 09:00:00,Broken,-4\n",
    )
    .unwrap();
    let path_str = path.to_string_lossy().to_string();
    assert!(run(&store, &["import", "--table", "incomes", "--path", &path_str]).is_err());
    assert!(store.read_all("incomes").unwrap().is_empty());

    let missing = dir.path().join("short.csv");
    fs::write(&missing, "timestamp,label\n2025-05-01 09:00:00,Salary\n").unwrap();
    let missing_str = missing.to_string_lossy().to_string();
    assert!(run(&store, &["import", "--table", "incomes", "--path", &missing_str]).is_err());
}
