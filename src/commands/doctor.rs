// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ExpenseRecord, Sheet, TableRecord};
use crate::savings;
use crate::session::Session;
use crate::utils::pretty_table;
use anyhow::Result;

/// Re-validates every stored row and both savings cells.
pub fn check(s: &Session<'_>) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Rows that no longer parse
    for sheet in Sheet::TABLES {
        for (i, row) in s.store.read_all(sheet.name())?.iter().enumerate() {
            if let Err(err) = sheet.check_row(row) {
                rows.push(vec![
                    "invalid_row".into(),
                    format!("{} row {}: {}", sheet, i + 1, err),
                ]);
            } else if sheet == Sheet::Expenses {
                // 2) Categories outside the configured list
                let e = ExpenseRecord::from_row(row)?;
                if s.config.category(&e.category).is_none() {
                    rows.push(vec![
                        "unknown_category".into(),
                        format!("{} row {}: '{}'", sheet, i + 1, e.category),
                    ]);
                }
            }
        }
    }

    // 3) Savings cells that read as zero only because they are corrupt
    for w in savings::load_state(s.store)?.warnings {
        rows.push(vec!["corrupt_savings_cell".into(), w]);
    }
    Ok(rows)
}

pub fn handle(s: &Session<'_>) -> Result<()> {
    let rows = check(s)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
