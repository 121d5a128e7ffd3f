// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use homebudget::config::{self, AppConfig, StoreBackend, StoreConfig};
use homebudget::db::{self, SqliteStore};
use homebudget::error::BudgetError;
use homebudget::models::{self, IncomeRecord};
use homebudget::savings::{self, BALANCE_CELL};
use homebudget::store::TableStore;
use homebudget::{cli, commands};
use rust_decimal::Decimal;
use tempfile::tempdir;

#[test]
fn configured_secret_gates_every_command() {
    let store = SqliteStore::open_in_memory().unwrap();
    db::init_schema(&store).unwrap();
    let cfg = AppConfig {
        secret: Some("s3cret".into()),
        ..AppConfig::default()
    };

    let matches = cli::build_cli().get_matches_from(["homebudget", "dashboard"]);
    let s = commands::session(&store, &cfg, &matches).unwrap();
    let err = s.authorize(None).unwrap_err();
    assert!(matches!(err, BudgetError::Unauthorized));
    assert!(s.authorize(Some("S3CRET")).is_err());
    assert!(s.authorize(Some("s3cret")).is_ok());

    let open = AppConfig::default();
    let s = commands::session(&store, &open, &matches).unwrap();
    assert!(s.authorize(None).is_ok());
}

#[test]
fn bad_reference_date_is_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    let cfg = AppConfig::default();
    let matches =
        cli::build_cli().get_matches_from(["homebudget", "dashboard", "--today", "2025-02-30"]);
    assert!(commands::session(&store, &cfg, &matches).is_err());
}

#[test]
fn csv_backend_round_trip_through_open_or_init() {
    let dir = tempdir().unwrap();
    let paths = config::app_paths(Some(dir.path().to_path_buf())).unwrap();
    let cfg = AppConfig {
        store: StoreConfig {
            backend: StoreBackend::Csv,
            name: "sheets".into(),
        },
        ..AppConfig::default()
    };
    {
        let store = db::open_or_init(&paths, &cfg).unwrap();
        let matches = cli::build_cli().get_matches_from([
            "homebudget", "income", "add", "--label", "Salary", "--amount", "250", "--today",
            "2025-05-05",
        ]);
        let s = commands::session(store.as_ref(), &cfg, &matches).unwrap();
        let Some(("income", sub)) = matches.subcommand() else {
            panic!("no income subcommand");
        };
        commands::incomes::handle(&s, sub).unwrap();
        savings::close_month(store.as_ref(), Decimal::from(250)).unwrap();
    }

    let table_dir = db::store_path(&paths, &cfg);
    assert!(table_dir.join("incomes.csv").exists());
    assert!(table_dir.join("tasks.csv").exists());

    let store = db::open_or_init(&paths, &cfg).unwrap();
    let incomes = models::load::<IncomeRecord>(store.as_ref()).unwrap().into_values();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].amount, Decimal::from(250));
    assert_eq!(
        store.read_cell("savings", BALANCE_CELL).unwrap().as_deref(),
        Some("250")
    );
}

#[test]
fn doctor_finds_bad_rows_and_cells() {
    let store = SqliteStore::open_in_memory().unwrap();
    db::init_schema(&store).unwrap();
    let cfg = AppConfig::default();
    let matches = cli::build_cli().get_matches_from(["homebudget", "doctor"]);
    let s = commands::session(&store, &cfg, &matches).unwrap();
    assert!(commands::doctor::check(&s).unwrap().is_empty());

    store
        .append("tasks", &["2025-05-01 10:00:00".into(), "Fix tap".into(), "soon".into(), "false".into()])
        .unwrap();
    store
        .append(
            "expenses",
            &[
                "2025-05-01 10:00:00".into(),
                "Boat".into(),
                "10".into(),
                "Yachts".into(),
                "Variable".into(),
            ],
        )
        .unwrap();
    store.write_cell("savings", BALANCE_CELL, "lots").unwrap();

    let issues = commands::doctor::check(&s).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(kinds, ["unknown_category", "invalid_row", "corrupt_savings_cell"]);
}
