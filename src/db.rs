// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{AppConfig, AppPaths, StoreBackend};
use crate::csv_store::CsvStore;
use crate::error::{BudgetError, Result};
use crate::models::Sheet;
use crate::store::{CachedStore, Row, TableStore};
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Embedded SQLite adapter. Each logical table is a header plus an ordered
/// list of JSON-encoded cell arrays.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| {
            BudgetError::StoreUnavailable(format!("open {}: {}", path.display(), e))
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
        CREATE TABLE IF NOT EXISTS sheet_headers(
            sheet TEXT PRIMARY KEY,
            header TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sheet_rows(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sheet TEXT NOT NULL,
            cells TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_sheet_rows_sheet ON sheet_rows(sheet, id);

        CREATE TABLE IF NOT EXISTS sheet_cells(
            sheet TEXT NOT NULL,
            address TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY(sheet, address)
        );
        "#,
        )?;
        Ok(())
    }

    fn header(&self, table: &str) -> Result<Option<Vec<String>>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT header FROM sheet_headers WHERE sheet=?1",
                params![table],
                |r| r.get(0),
            )
            .optional()?;
        raw.map(|s| decode_cells(table, &s)).transpose()
    }
}

fn encode_cells(cells: &[String]) -> Result<String> {
    serde_json::to_string(cells).map_err(|e| BudgetError::StoreUnavailable(e.to_string()))
}

fn decode_cells(table: &str, raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|e| BudgetError::StoreUnavailable(format!("corrupt row in {}: {}", table, e)))
}

impl TableStore for SqliteStore {
    fn ensure_table(&self, table: &str, header: &[&str]) -> Result<()> {
        let header: Vec<String> = header.iter().map(|s| s.to_string()).collect();
        self.conn.execute(
            "INSERT OR IGNORE INTO sheet_headers(sheet, header) VALUES (?1, ?2)",
            params![table, encode_cells(&header)?],
        )?;
        Ok(())
    }

    fn read_all(&self, table: &str) -> Result<Vec<Row>> {
        let Some(header) = self.header(table)? else {
            return Ok(Vec::new());
        };
        let mut stmt = self
            .conn
            .prepare("SELECT cells FROM sheet_rows WHERE sheet=?1 ORDER BY id")?;
        let rows = stmt.query_map(params![table], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            let cells = decode_cells(table, &row?)?;
            out.push(Row::from_cells(&header, &cells));
        }
        Ok(out)
    }

    fn append_many(&self, table: &str, rows: &[Vec<String>]) -> Result<()> {
        if self.header(table)?.is_none() {
            return Err(BudgetError::StoreUnavailable(format!(
                "table '{}' has no header; run `homebudget init`",
                table
            )));
        }
        let tx = self.conn.unchecked_transaction()?;
        for cells in rows {
            tx.execute(
                "INSERT INTO sheet_rows(sheet, cells) VALUES (?1, ?2)",
                params![table, encode_cells(cells)?],
            )?;
        }
        tx.commit()?;
        tracing::debug!(table, rows = rows.len(), "appended rows");
        Ok(())
    }

    fn overwrite(&self, table: &str, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
        let header: Vec<String> = header.iter().map(|s| s.to_string()).collect();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM sheet_rows WHERE sheet=?1", params![table])?;
        tx.execute(
            "INSERT INTO sheet_headers(sheet, header) VALUES (?1, ?2)
             ON CONFLICT(sheet) DO UPDATE SET header=excluded.header",
            params![table, encode_cells(&header)?],
        )?;
        for cells in rows {
            tx.execute(
                "INSERT INTO sheet_rows(sheet, cells) VALUES (?1, ?2)",
                params![table, encode_cells(cells)?],
            )?;
        }
        tx.commit()?;
        tracing::debug!(table, rows = rows.len(), "overwrote table");
        Ok(())
    }

    fn read_cell(&self, table: &str, address: &str) -> Result<Option<String>> {
        let v = self
            .conn
            .query_row(
                "SELECT value FROM sheet_cells WHERE sheet=?1 AND address=?2",
                params![table, address],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    fn write_cell(&self, table: &str, address: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sheet_cells(sheet, address, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(sheet, address) DO UPDATE SET value=excluded.value",
            params![table, address, value],
        )?;
        tracing::debug!(table, address, value, "wrote cell");
        Ok(())
    }
}

pub fn store_path(paths: &AppPaths, cfg: &AppConfig) -> PathBuf {
    match cfg.store.backend {
        StoreBackend::Sqlite => paths.data_dir.join(format!("{}.sqlite", cfg.store.name)),
        StoreBackend::Csv => paths.data_dir.join(&cfg.store.name),
    }
}

/// Creates every table header the app relies on.
pub fn init_schema(store: &dyn TableStore) -> Result<()> {
    for sheet in Sheet::TABLES {
        store.ensure_table(sheet.name(), sheet.header())?;
    }
    Ok(())
}

/// Opens the configured backend behind the read cache and makes sure the
/// tables exist.
pub fn open_or_init(paths: &AppPaths, cfg: &AppConfig) -> Result<Box<dyn TableStore>> {
    fs::create_dir_all(&paths.data_dir)?;
    let path = store_path(paths, cfg);
    let ttl = Duration::from_secs(cfg.cache_ttl_secs);
    let store: Box<dyn TableStore> = match cfg.store.backend {
        StoreBackend::Sqlite => Box::new(CachedStore::new(SqliteStore::open(&path)?, ttl)),
        StoreBackend::Csv => Box::new(CachedStore::new(CsvStore::open(&path)?, ttl)),
    };
    init_schema(store.as_ref())?;
    tracing::debug!(path = %path.display(), "store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_table_reads_empty() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.read_all("nothing").unwrap().is_empty());
        assert!(store.append("nothing", &cells(&["x"])).is_err());
    }

    #[test]
    fn rows_keep_insertion_order_and_overwrite_replaces() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.ensure_table("t", &["label", "amount"]).unwrap();
        store
            .append_many("t", &[cells(&["a", "1"]), cells(&["b", "2"])])
            .unwrap();
        store.append("t", &cells(&["c", "3"])).unwrap();
        let labels: Vec<_> = store
            .read_all("t")
            .unwrap()
            .iter()
            .map(|r| r.get("label").unwrap().to_string())
            .collect();
        assert_eq!(labels, ["a", "b", "c"]);

        store
            .overwrite("t", &["label", "amount"], &[cells(&["b", "2"])])
            .unwrap();
        let rows = store.read_all("t").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("amount"), Some("2"));
    }

    #[test]
    fn cells_upsert() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.read_cell("savings", "balance").unwrap(), None);
        store.write_cell("savings", "balance", "10").unwrap();
        store.write_cell("savings", "balance", "12.5").unwrap();
        assert_eq!(
            store.read_cell("savings", "balance").unwrap().as_deref(),
            Some("12.5")
        );
    }
}
