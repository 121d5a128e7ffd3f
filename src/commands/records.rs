// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Listing and row-removal shared by every table command.

use crate::models::{self, Loaded, Sheet, TableRecord};
use crate::session::Session;
use crate::utils::{maybe_print_json, pretty_table};
use crate::validate::{self, EditSummary};
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
struct Listed<'a, T> {
    row: usize,
    #[serde(flatten)]
    record: &'a T,
}

pub fn load<T: TableRecord>(s: &Session<'_>) -> Result<Loaded<T>> {
    models::load::<T>(s.store).with_context(|| format!("Read table {}", T::SHEET))
}

/// Prints `loaded` as a numbered table (or JSON), followed by any rows that
/// failed to parse.
pub fn print<T, F>(json: bool, loaded: &Loaded<T>, headers: &[&str], render: F) -> Result<()>
where
    T: Serialize,
    F: Fn(&T) -> Vec<String>,
{
    let listed: Vec<Listed<'_, T>> = loaded
        .records
        .iter()
        .map(|(row, record)| Listed { row: *row, record })
        .collect();
    if maybe_print_json(json, &listed)? {
        return Ok(());
    }
    let mut cols = vec!["#"];
    cols.extend_from_slice(headers);
    let data = loaded
        .records
        .iter()
        .map(|(row, record)| {
            let mut cells = vec![row.to_string()];
            cells.extend(render(record));
            cells
        })
        .collect();
    println!("{}", pretty_table(&cols, data));
    print_issues(&loaded.issues);
    Ok(())
}

pub fn print_issues(issues: &[models::RowIssue]) {
    for issue in issues {
        eprintln!(
            "warning: {} row {} skipped: {}",
            issue.table, issue.row, issue.message
        );
    }
}

pub fn list<T, F>(
    s: &Session<'_>,
    sub: &clap::ArgMatches,
    headers: &[&str],
    render: F,
) -> Result<()>
where
    T: TableRecord + Serialize,
    F: Fn(&T) -> Vec<String>,
{
    let loaded = load::<T>(s)?;
    print(sub.get_flag("json"), &loaded, headers, render)
}

/// Drops one row by position through the edit-save rewrite.
pub fn remove(s: &Session<'_>, sheet: Sheet, sub: &clap::ArgMatches) -> Result<EditSummary> {
    let position = *sub.get_one::<usize>("row").unwrap();
    let mut edits = validate::edit_session(s.store, sheet)?;
    validate::mark_deleted(&mut edits, position)?;
    let summary = validate::save_edits(s.store, sheet, edits)?;
    println!(
        "Removed row {} from {} ({} rows left)",
        position, sheet, summary.kept
    );
    Ok(summary)
}

/// Sets the `done` flag of one row through the edit-save rewrite.
pub fn mark_done(s: &Session<'_>, sheet: Sheet, sub: &clap::ArgMatches) -> Result<()> {
    let position = *sub.get_one::<usize>("row").unwrap();
    let mut edits = validate::edit_session(s.store, sheet)?;
    let len = edits.len();
    let target = position
        .checked_sub(1)
        .and_then(|i| edits.get_mut(i))
        .with_context(|| format!("Row {} does not exist ({} has {} rows)", position, sheet, len))?;
    target.row.set("done", "true");
    sheet
        .check_row(&target.row)
        .with_context(|| format!("Row {} of {} is not valid", position, sheet))?;
    validate::save_edits(s.store, sheet, edits)?;
    println!("Marked row {} of {} as done", position, sheet);
    Ok(())
}
