// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{BudgetError, Result};
use crate::store::{Row, TableStore};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

const CELLS_FILE: &str = "cells.csv";

/// Flat-file adapter: one `<table>.csv` per table (first line is the header)
/// plus `cells.csv` holding `sheet,address,value` triples.
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", table))
    }

    fn read_records(path: &Path) -> Result<Vec<Vec<String>>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        let mut out = Vec::new();
        for rec in rdr.records() {
            out.push(rec?.iter().map(|s| s.to_string()).collect());
        }
        Ok(out)
    }

    fn write_records(path: &Path, records: &[Vec<String>]) -> Result<()> {
        let tmp = path.with_extension("csv.tmp");
        {
            let mut wtr = WriterBuilder::new().flexible(true).from_path(&tmp)?;
            for r in records {
                wtr.write_record(r)?;
            }
            wtr.flush()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn read_cells(&self) -> Result<Vec<Vec<String>>> {
        let path = self.dir.join(CELLS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        Self::read_records(&path)
    }
}

fn is_cell(record: &[String], table: &str, address: &str) -> bool {
    record.first().map(String::as_str) == Some(table)
        && record.get(1).map(String::as_str) == Some(address)
}

impl TableStore for CsvStore {
    fn ensure_table(&self, table: &str, header: &[&str]) -> Result<()> {
        let path = self.table_path(table);
        if path.exists() {
            return Ok(());
        }
        let header: Vec<String> = header.iter().map(|s| s.to_string()).collect();
        Self::write_records(&path, &[header])
    }

    fn read_all(&self, table: &str) -> Result<Vec<Row>> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut records = Self::read_records(&path)?.into_iter();
        let Some(header) = records.next() else {
            return Ok(Vec::new());
        };
        Ok(records.map(|cells| Row::from_cells(&header, &cells)).collect())
    }

    fn append_many(&self, table: &str, rows: &[Vec<String>]) -> Result<()> {
        let path = self.table_path(table);
        if !path.exists() {
            return Err(BudgetError::StoreUnavailable(format!(
                "table file {} is missing; run `homebudget init`",
                path.display()
            )));
        }
        let file = OpenOptions::new().append(true).open(&path)?;
        let mut wtr = WriterBuilder::new().flexible(true).from_writer(file);
        for r in rows {
            wtr.write_record(r)?;
        }
        wtr.flush()?;
        tracing::debug!(table, rows = rows.len(), "appended rows");
        Ok(())
    }

    fn overwrite(&self, table: &str, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
        let mut records = Vec::with_capacity(rows.len() + 1);
        records.push(header.iter().map(|s| s.to_string()).collect());
        records.extend(rows.iter().cloned());
        Self::write_records(&self.table_path(table), &records)?;
        tracing::debug!(table, rows = rows.len(), "overwrote table");
        Ok(())
    }

    fn read_cell(&self, table: &str, address: &str) -> Result<Option<String>> {
        let found = self
            .read_cells()?
            .into_iter()
            .find(|r| is_cell(r, table, address))
            .and_then(|r| r.get(2).cloned());
        Ok(found)
    }

    fn write_cell(&self, table: &str, address: &str, value: &str) -> Result<()> {
        let mut cells = self.read_cells()?;
        let slot = cells.iter_mut().find(|r| is_cell(r, table, address));
        match slot {
            Some(r) => {
                r.truncate(2);
                r.push(value.to_string());
            }
            None => cells.push(vec![
                table.to_string(),
                address.to_string(),
                value.to_string(),
            ]),
        }
        Self::write_records(&self.dir.join(CELLS_FILE), &cells)?;
        tracing::debug!(table, address, value, "wrote cell");
        Ok(())
    }
}
