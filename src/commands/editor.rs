// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Sheet;
use crate::session::Session;
use crate::store::Row;
use crate::utils::parse_flag;
use crate::validate::{self, EditSummary, EditedRow};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use std::path::Path;

/// Extra column in edit files; `true` drops the row on save.
pub const DELETE_COLUMN: &str = "delete";

pub fn handle(s: &Session<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("save", sub)) => {
            let sheet: Sheet = sub.get_one::<String>("table").unwrap().parse()?;
            let path = sub.get_one::<String>("path").unwrap().trim();
            let summary = save_from_csv(s, sheet, Path::new(path))?;
            println!(
                "Saved {}: kept {} rows, removed {}",
                sheet, summary.kept, summary.removed
            );
        }
        _ => {}
    }
    Ok(())
}

/// Reads a CSV with the table header (and optionally a `delete` column).
/// Missing header fields are an error; unknown extra columns are ignored.
pub fn read_rows(sheet: Sheet, path: &Path) -> Result<Vec<(Row, bool)>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;
    let names: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    for field in sheet.header() {
        if !names.iter().any(|n| n == field) {
            return Err(anyhow!(
                "{} is missing column '{}' (expected {})",
                path.display(),
                field,
                sheet.header().join(",")
            ));
        }
    }

    let mut out = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let cells: Vec<String> = rec.iter().map(|c| c.trim().to_string()).collect();
        let full = Row::from_cells(&names, &cells);
        let delete = match full.get(DELETE_COLUMN) {
            Some(raw) => parse_flag(raw).with_context(|| format!("Row {}", i + 1))?,
            None => false,
        };
        let row = Row::from_cells(sheet.header(), &full.cells(sheet.header()));
        out.push((row, delete));
    }
    Ok(out)
}

/// Edit-save: every kept row is validated first, then the table is rewritten
/// with exactly those rows. Nothing is written if any kept row is invalid.
pub fn save_from_csv(s: &Session<'_>, sheet: Sheet, path: &Path) -> Result<EditSummary> {
    if sheet == Sheet::Savings {
        return Err(anyhow!("savings holds cells, not rows"));
    }
    let rows = read_rows(sheet, path)?;
    let mut edits = Vec::with_capacity(rows.len());
    for (i, (mut row, delete)) in rows.into_iter().enumerate() {
        if !delete {
            validate::check_row(s.config, sheet, &mut row)
                .with_context(|| format!("Row {} of {}", i + 1, path.display()))?;
        }
        edits.push(EditedRow { row, delete });
    }
    let summary = validate::save_edits(s.store, sheet, edits)?;
    Ok(summary)
}
