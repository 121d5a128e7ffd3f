// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Tabular persistence seam.
//!
//! Every table is an ordered list of rows under a fixed header; row identity
//! is positional. There is no update-in-place: removing or editing rows means
//! overwriting the whole table with the retained set. Scalar state (the
//! savings cells) lives in addressable cells next to the tables.

use crate::error::Result;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// One stored row, keyed by the field names of the table header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(BTreeMap<String, String>);

impl Row {
    pub fn from_cells<H: AsRef<str>>(header: &[H], cells: &[String]) -> Self {
        let mut map = BTreeMap::new();
        for (i, h) in header.iter().enumerate() {
            let v = cells.get(i).cloned().unwrap_or_default();
            map.insert(h.as_ref().to_string(), v);
        }
        Row(map)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(|s| s.as_str())
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_string(), value.into());
    }

    /// Cells in header order; absent fields become empty cells.
    pub fn cells(&self, header: &[&str]) -> Vec<String> {
        header
            .iter()
            .map(|h| self.get(h).unwrap_or_default().to_string())
            .collect()
    }
}

pub trait TableStore {
    /// Creates the table with `header` if it does not exist yet.
    fn ensure_table(&self, table: &str, header: &[&str]) -> Result<()>;

    /// All rows in insertion order. A table that was never created reads as empty.
    fn read_all(&self, table: &str) -> Result<Vec<Row>>;

    fn append(&self, table: &str, cells: &[String]) -> Result<()> {
        self.append_many(table, &[cells.to_vec()])
    }

    fn append_many(&self, table: &str, rows: &[Vec<String>]) -> Result<()>;

    /// Clears the table and writes `header` plus `rows`.
    fn overwrite(&self, table: &str, header: &[&str], rows: &[Vec<String>]) -> Result<()>;

    fn read_cell(&self, table: &str, address: &str) -> Result<Option<String>>;

    fn write_cell(&self, table: &str, address: &str, value: &str) -> Result<()>;
}

impl<T: TableStore + ?Sized> TableStore for Box<T> {
    fn ensure_table(&self, table: &str, header: &[&str]) -> Result<()> {
        (**self).ensure_table(table, header)
    }
    fn read_all(&self, table: &str) -> Result<Vec<Row>> {
        (**self).read_all(table)
    }
    fn append(&self, table: &str, cells: &[String]) -> Result<()> {
        (**self).append(table, cells)
    }
    fn append_many(&self, table: &str, rows: &[Vec<String>]) -> Result<()> {
        (**self).append_many(table, rows)
    }
    fn overwrite(&self, table: &str, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
        (**self).overwrite(table, header, rows)
    }
    fn read_cell(&self, table: &str, address: &str) -> Result<Option<String>> {
        (**self).read_cell(table, address)
    }
    fn write_cell(&self, table: &str, address: &str, value: &str) -> Result<()> {
        (**self).write_cell(table, address, value)
    }
}

/// Read-through cache over another store.
///
/// `read_all` snapshots are served for `ttl`; every write to a table drops
/// that table's snapshot first so the next read sees the write.
pub struct CachedStore<S> {
    inner: S,
    ttl: Duration,
    snapshots: RefCell<HashMap<String, (Instant, Vec<Row>)>>,
}

impl<S: TableStore> CachedStore<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            snapshots: RefCell::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn invalidate(&self, table: &str) {
        self.snapshots.borrow_mut().remove(table);
    }
}

impl<S: TableStore> TableStore for CachedStore<S> {
    fn ensure_table(&self, table: &str, header: &[&str]) -> Result<()> {
        self.invalidate(table);
        self.inner.ensure_table(table, header)
    }

    fn read_all(&self, table: &str) -> Result<Vec<Row>> {
        if let Some((at, rows)) = self.snapshots.borrow().get(table) {
            if at.elapsed() < self.ttl {
                tracing::trace!(table, "cache hit");
                return Ok(rows.clone());
            }
        }
        let rows = self.inner.read_all(table)?;
        self.snapshots
            .borrow_mut()
            .insert(table.to_string(), (Instant::now(), rows.clone()));
        Ok(rows)
    }

    fn append_many(&self, table: &str, rows: &[Vec<String>]) -> Result<()> {
        self.invalidate(table);
        self.inner.append_many(table, rows)
    }

    fn overwrite(&self, table: &str, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
        self.invalidate(table);
        self.inner.overwrite(table, header, rows)
    }

    fn read_cell(&self, table: &str, address: &str) -> Result<Option<String>> {
        self.inner.read_cell(table, address)
    }

    fn write_cell(&self, table: &str, address: &str, value: &str) -> Result<()> {
        self.invalidate(table);
        self.inner.write_cell(table, address, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;

    fn cells(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn row_cells_follow_header_order() {
        let row = Row::from_cells(&["a", "b"], &cells(&["1", "2"]));
        assert_eq!(row.cells(&["b", "a", "c"]), cells(&["2", "1", ""]));
    }

    #[test]
    fn cache_serves_snapshot_until_a_write() {
        let sqlite = SqliteStore::open_in_memory().unwrap();
        sqlite.ensure_table("t", &["label"]).unwrap();
        let cached = CachedStore::new(sqlite, Duration::from_secs(600));

        assert!(cached.read_all("t").unwrap().is_empty());
        // Bypass the cache: the stale snapshot is still served.
        cached.inner().append("t", &cells(&["x"])).unwrap();
        assert!(cached.read_all("t").unwrap().is_empty());

        // A write through the cache invalidates immediately.
        cached.append("t", &cells(&["y"])).unwrap();
        let rows = cached.read_all("t").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("label"), Some("y"));
    }

    #[test]
    fn zero_ttl_always_reads_through() {
        let sqlite = SqliteStore::open_in_memory().unwrap();
        sqlite.ensure_table("t", &["label"]).unwrap();
        let cached = CachedStore::new(sqlite, Duration::ZERO);
        assert!(cached.read_all("t").unwrap().is_empty());
        cached.inner().append("t", &cells(&["x"])).unwrap();
        assert_eq!(cached.read_all("t").unwrap().len(), 1);
    }
}
