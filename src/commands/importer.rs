// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::editor::read_rows;
use crate::models::Sheet;
use crate::session::Session;
use crate::validate;
use anyhow::{Context, Result, anyhow};
use std::path::Path;

pub fn handle(s: &Session<'_>, m: &clap::ArgMatches) -> Result<()> {
    let sheet: Sheet = m.get_one::<String>("table").unwrap().parse()?;
    let path = m.get_one::<String>("path").unwrap().trim();
    let count = import_rows(s, sheet, Path::new(path))?;
    println!("Imported {} rows into {} from {}", count, sheet, path);
    Ok(())
}

/// Validates the whole file, then appends it in one call. A `delete` column,
/// if present, skips the ticked rows.
pub fn import_rows(s: &Session<'_>, sheet: Sheet, path: &Path) -> Result<usize> {
    if sheet == Sheet::Savings {
        return Err(anyhow!("savings holds cells, not rows"));
    }
    let header = sheet.header();
    let mut batch = Vec::new();
    for (i, (mut row, delete)) in read_rows(sheet, path)?.into_iter().enumerate() {
        if delete {
            continue;
        }
        validate::check_row(s.config, sheet, &mut row)
            .with_context(|| format!("Row {} of {}", i + 1, path.display()))?;
        batch.push(row.cells(header));
    }
    if !batch.is_empty() {
        s.store
            .append_many(sheet.name(), &batch)
            .with_context(|| format!("Append to {}", sheet))?;
    }
    Ok(batch.len())
}
