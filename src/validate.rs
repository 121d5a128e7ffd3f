// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Boundary checks for submitted records and the edit-save rewrite.
//!
//! Everything here runs before a write; a failure means nothing was written.

use crate::config::AppConfig;
use crate::error::{BudgetError, Result};
use crate::models::{
    ExpenseKind, ExpenseRecord, FixedCost, IncomeRecord, Installment, PlannedExpense, Sheet,
    ShoppingItem, TableRecord, TaskItem,
};
use crate::store::{Row, TableStore};
use crate::utils::{parse_date, parse_decimal, parse_month};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

pub fn require_label(raw: &str) -> Result<String> {
    let label = raw.trim();
    if label.is_empty() {
        return Err(BudgetError::validation("label must not be empty"));
    }
    Ok(label.to_string())
}

pub fn require_amount(raw: &str) -> Result<Decimal> {
    check_amount(parse_decimal(raw)?)
}

pub fn check_amount(amount: Decimal) -> Result<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(BudgetError::validation(format!(
            "amount must not be negative (got {})",
            amount
        )));
    }
    Ok(amount)
}

/// Rejects inverted ranges instead of swapping them.
pub fn require_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(BudgetError::validation(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }
    Ok(())
}

pub fn require_category<'a>(cfg: &'a AppConfig, raw: &str) -> Result<&'a str> {
    cfg.category(raw).ok_or_else(|| {
        BudgetError::validation(format!(
            "unknown category '{}' (expected one of: {})",
            raw.trim(),
            cfg.categories.join(", ")
        ))
    })
}

/// Checks a row arriving through a bulk path with the same rules as a single
/// submission. Expense categories are rewritten to their configured spelling.
pub fn check_row(cfg: &AppConfig, sheet: Sheet, row: &mut Row) -> Result<()> {
    sheet.check_row(row)?;
    if sheet == Sheet::Expenses {
        let canonical = require_category(cfg, row.get("category").unwrap_or_default())?;
        row.set("category", canonical);
    }
    Ok(())
}

pub fn income(now: NaiveDateTime, label: &str, amount: &str) -> Result<IncomeRecord> {
    Ok(IncomeRecord {
        timestamp: now,
        label: require_label(label)?,
        amount: require_amount(amount)?,
    })
}

pub fn expense(
    cfg: &AppConfig,
    now: NaiveDateTime,
    label: &str,
    amount: &str,
    category: &str,
    kind: &str,
) -> Result<ExpenseRecord> {
    Ok(ExpenseRecord {
        timestamp: now,
        label: require_label(label)?,
        amount: require_amount(amount)?,
        category: require_category(cfg, category)?.to_string(),
        kind: kind.parse::<ExpenseKind>()?,
    })
}

pub fn fixed_cost(now: NaiveDateTime, label: &str, amount: &str) -> Result<FixedCost> {
    Ok(FixedCost {
        timestamp: now,
        label: require_label(label)?,
        amount: require_amount(amount)?,
    })
}

pub fn installment(label: &str, amount: &str, start: &str, end: &str) -> Result<Installment> {
    let start_date = parse_date(start)?;
    let end_date = parse_date(end)?;
    require_range(start_date, end_date)?;
    Ok(Installment {
        label: require_label(label)?,
        amount: require_amount(amount)?,
        start_date,
        end_date,
    })
}

pub fn planned(
    now: NaiveDateTime,
    label: &str,
    amount: &str,
    target_month: &str,
) -> Result<PlannedExpense> {
    Ok(PlannedExpense {
        timestamp: now,
        label: require_label(label)?,
        amount: require_amount(amount)?,
        target_month: parse_month(target_month)?,
    })
}

pub fn shopping_item(now: NaiveDateTime, label: &str) -> Result<ShoppingItem> {
    Ok(ShoppingItem {
        timestamp: now,
        label: require_label(label)?,
        done: false,
    })
}

pub fn task(now: NaiveDateTime, label: &str, due: &str) -> Result<TaskItem> {
    Ok(TaskItem {
        timestamp: now,
        label: require_label(label)?,
        due_date: parse_date(due)?,
        done: false,
    })
}

/// Appends one already-validated record.
pub fn submit<T: TableRecord>(store: &dyn TableStore, record: &T) -> Result<()> {
    store.append(T::SHEET.name(), &record.to_cells())
}

/// One row of an edit session: its current content and whether the user
/// ticked it for removal.
#[derive(Debug, Clone, PartialEq)]
pub struct EditedRow {
    pub row: Row,
    pub delete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditSummary {
    pub kept: usize,
    pub removed: usize,
}

/// Splits an edit session into (retained, discarded), keeping order.
pub fn partition(edits: Vec<EditedRow>) -> (Vec<Row>, Vec<Row>) {
    let (keep, drop): (Vec<_>, Vec<_>) = edits.into_iter().partition(|e| !e.delete);
    (
        keep.into_iter().map(|e| e.row).collect(),
        drop.into_iter().map(|e| e.row).collect(),
    )
}

/// Rewrites `sheet` with exactly the retained rows. Last writer wins.
pub fn save_edits(
    store: &dyn TableStore,
    sheet: Sheet,
    edits: Vec<EditedRow>,
) -> Result<EditSummary> {
    let header = sheet.header();
    let (retained, discarded) = partition(edits);
    let rows: Vec<Vec<String>> = retained.iter().map(|r| r.cells(header)).collect();
    store.overwrite(sheet.name(), header, &rows)?;
    tracing::info!(
        table = sheet.name(),
        kept = rows.len(),
        removed = discarded.len(),
        "saved edits"
    );
    Ok(EditSummary {
        kept: rows.len(),
        removed: discarded.len(),
    })
}

/// Current table content as an edit session with nothing ticked.
pub fn edit_session(store: &dyn TableStore, sheet: Sheet) -> Result<Vec<EditedRow>> {
    Ok(store
        .read_all(sheet.name())?
        .into_iter()
        .map(|row| EditedRow { row, delete: false })
        .collect())
}

/// Ticks the 1-based `position` for removal.
pub fn mark_deleted(edits: &mut [EditedRow], position: usize) -> Result<()> {
    let len = edits.len();
    let slot = position
        .checked_sub(1)
        .and_then(|i| edits.get_mut(i))
        .ok_or_else(|| {
            BudgetError::validation(format!("row {} does not exist (table has {})", position, len))
        })?;
    slot.delete = true;
    Ok(())
}
