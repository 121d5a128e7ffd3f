// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{BudgetError, Result};
use crate::store::{Row, TableStore};
use crate::utils::{TIMESTAMP_FMT, parse_date, parse_flag, parse_month, parse_timestamp};
use crate::validate::{require_amount, require_label, require_range};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sheet {
    Incomes,
    Expenses,
    FixedCosts,
    Installments,
    Planned,
    Shopping,
    Tasks,
    Savings,
}

impl Sheet {
    /// Sheets that hold rows; `Savings` only holds cells.
    pub const TABLES: [Sheet; 7] = [
        Sheet::Incomes,
        Sheet::Expenses,
        Sheet::FixedCosts,
        Sheet::Installments,
        Sheet::Planned,
        Sheet::Shopping,
        Sheet::Tasks,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sheet::Incomes => "incomes",
            Sheet::Expenses => "expenses",
            Sheet::FixedCosts => "fixed_costs",
            Sheet::Installments => "installments",
            Sheet::Planned => "planned",
            Sheet::Shopping => "shopping",
            Sheet::Tasks => "tasks",
            Sheet::Savings => "savings",
        }
    }

    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Sheet::Incomes | Sheet::FixedCosts => &["timestamp", "label", "amount"],
            Sheet::Expenses => &["timestamp", "label", "amount", "category", "kind"],
            Sheet::Installments => &["label", "amount", "start_date", "end_date"],
            Sheet::Planned => &["timestamp", "label", "amount", "target_month"],
            Sheet::Shopping => &["timestamp", "label", "done"],
            Sheet::Tasks => &["timestamp", "label", "due_date", "done"],
            Sheet::Savings => &[],
        }
    }

    /// Parses `row` as this sheet's record type, discarding the result.
    pub fn check_row(&self, row: &Row) -> Result<()> {
        match self {
            Sheet::Incomes => IncomeRecord::from_row(row).map(drop),
            Sheet::Expenses => ExpenseRecord::from_row(row).map(drop),
            Sheet::FixedCosts => FixedCost::from_row(row).map(drop),
            Sheet::Installments => Installment::from_row(row).map(drop),
            Sheet::Planned => PlannedExpense::from_row(row).map(drop),
            Sheet::Shopping => ShoppingItem::from_row(row).map(drop),
            Sheet::Tasks => TaskItem::from_row(row).map(drop),
            Sheet::Savings => Err(BudgetError::validation("savings holds cells, not rows")),
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sheet {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase().replace('-', "_");
        Sheet::TABLES
            .into_iter()
            .chain([Sheet::Savings])
            .find(|t| t.name() == s)
            .ok_or_else(|| BudgetError::parse("table", &s, "unknown table"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseKind {
    Variable,
    Fixed,
    /// Money moved into the savings reserve.
    Savings,
}

impl ExpenseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseKind::Variable => "Variable",
            ExpenseKind::Fixed => "Fixed",
            ExpenseKind::Savings => "Savings",
        }
    }
}

impl FromStr for ExpenseKind {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "variable" => Ok(ExpenseKind::Variable),
            "fixed" => Ok(ExpenseKind::Fixed),
            "savings" | "savings-transfer" | "savings_transfer" => Ok(ExpenseKind::Savings),
            _ => Err(BudgetError::parse(
                "kind",
                s,
                "expected Variable, Fixed or Savings",
            )),
        }
    }
}

/// Typed view of one table's rows.
pub trait TableRecord: Sized {
    const SHEET: Sheet;

    fn from_row(row: &Row) -> Result<Self>;

    /// Cells in `SHEET.header()` order.
    fn to_cells(&self) -> Vec<String>;
}

fn field<'a>(row: &'a Row, name: &'static str) -> &'a str {
    row.get(name).unwrap_or_default()
}

fn ts(t: &NaiveDateTime) -> String {
    t.format(TIMESTAMP_FMT).to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub timestamp: NaiveDateTime,
    pub label: String,
    pub amount: Decimal,
}

impl TableRecord for IncomeRecord {
    const SHEET: Sheet = Sheet::Incomes;

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            timestamp: parse_timestamp(field(row, "timestamp"))?,
            label: require_label(field(row, "label"))?,
            amount: require_amount(field(row, "amount"))?,
        })
    }

    fn to_cells(&self) -> Vec<String> {
        vec![ts(&self.timestamp), self.label.clone(), self.amount.to_string()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub timestamp: NaiveDateTime,
    pub label: String,
    pub amount: Decimal,
    pub category: String,
    pub kind: ExpenseKind,
}

impl TableRecord for ExpenseRecord {
    const SHEET: Sheet = Sheet::Expenses;

    fn from_row(row: &Row) -> Result<Self> {
        let category = field(row, "category").trim();
        if category.is_empty() {
            return Err(BudgetError::validation("category must not be empty"));
        }
        Ok(Self {
            timestamp: parse_timestamp(field(row, "timestamp"))?,
            label: require_label(field(row, "label"))?,
            amount: require_amount(field(row, "amount"))?,
            category: category.to_string(),
            kind: field(row, "kind").parse()?,
        })
    }

    fn to_cells(&self) -> Vec<String> {
        vec![
            ts(&self.timestamp),
            self.label.clone(),
            self.amount.to_string(),
            self.category.clone(),
            self.kind.as_str().to_string(),
        ]
    }
}

/// Recurring monthly obligation, counted in full every period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCost {
    pub timestamp: NaiveDateTime,
    pub label: String,
    pub amount: Decimal,
}

impl TableRecord for FixedCost {
    const SHEET: Sheet = Sheet::FixedCosts;

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            timestamp: parse_timestamp(field(row, "timestamp"))?,
            label: require_label(field(row, "label"))?,
            amount: require_amount(field(row, "amount"))?,
        })
    }

    fn to_cells(&self) -> Vec<String> {
        vec![ts(&self.timestamp), self.label.clone(), self.amount.to_string()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub label: String,
    pub amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Installment {
    /// Both ends inclusive.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.start_date <= today && today <= self.end_date
    }
}

impl TableRecord for Installment {
    const SHEET: Sheet = Sheet::Installments;

    fn from_row(row: &Row) -> Result<Self> {
        let start_date = parse_date(field(row, "start_date"))?;
        let end_date = parse_date(field(row, "end_date"))?;
        require_range(start_date, end_date)?;
        Ok(Self {
            label: require_label(field(row, "label"))?,
            amount: require_amount(field(row, "amount"))?,
            start_date,
            end_date,
        })
    }

    fn to_cells(&self) -> Vec<String> {
        vec![
            self.label.clone(),
            self.amount.to_string(),
            self.start_date.to_string(),
            self.end_date.to_string(),
        ]
    }
}

/// Informational only; never part of the balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedExpense {
    pub timestamp: NaiveDateTime,
    pub label: String,
    pub amount: Decimal,
    pub target_month: String,
}

impl TableRecord for PlannedExpense {
    const SHEET: Sheet = Sheet::Planned;

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            timestamp: parse_timestamp(field(row, "timestamp"))?,
            label: require_label(field(row, "label"))?,
            amount: require_amount(field(row, "amount"))?,
            target_month: parse_month(field(row, "target_month"))?,
        })
    }

    fn to_cells(&self) -> Vec<String> {
        vec![
            ts(&self.timestamp),
            self.label.clone(),
            self.amount.to_string(),
            self.target_month.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub timestamp: NaiveDateTime,
    pub label: String,
    pub done: bool,
}

impl TableRecord for ShoppingItem {
    const SHEET: Sheet = Sheet::Shopping;

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            timestamp: parse_timestamp(field(row, "timestamp"))?,
            label: require_label(field(row, "label"))?,
            done: parse_flag(field(row, "done"))?,
        })
    }

    fn to_cells(&self) -> Vec<String> {
        vec![ts(&self.timestamp), self.label.clone(), self.done.to_string()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    pub timestamp: NaiveDateTime,
    pub label: String,
    pub due_date: NaiveDate,
    pub done: bool,
}

impl TableRecord for TaskItem {
    const SHEET: Sheet = Sheet::Tasks;

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            timestamp: parse_timestamp(field(row, "timestamp"))?,
            label: require_label(field(row, "label"))?,
            due_date: parse_date(field(row, "due_date"))?,
            done: parse_flag(field(row, "done"))?,
        })
    }

    fn to_cells(&self) -> Vec<String> {
        vec![
            ts(&self.timestamp),
            self.label.clone(),
            self.due_date.to_string(),
            self.done.to_string(),
        ]
    }
}

/// A stored row that failed re-validation on read.
#[derive(Debug, Clone, Serialize)]
pub struct RowIssue {
    pub table: &'static str,
    /// 1-based position in the table.
    pub row: usize,
    pub message: String,
}

/// Records that parsed, each with its 1-based row position, plus the rows
/// that were rejected.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<(usize, T)>,
    pub issues: Vec<RowIssue>,
}

impl<T> Loaded<T> {
    pub fn values(&self) -> Vec<&T> {
        self.records.iter().map(|(_, r)| r).collect()
    }

    pub fn into_values(self) -> Vec<T> {
        self.records.into_iter().map(|(_, r)| r).collect()
    }
}

/// Reads and re-validates a whole table. Bad rows are reported, not counted.
pub fn load<T: TableRecord>(store: &dyn TableStore) -> Result<Loaded<T>> {
    let table = T::SHEET.name();
    let mut records = Vec::new();
    let mut issues = Vec::new();
    for (i, row) in store.read_all(table)?.iter().enumerate() {
        match T::from_row(row) {
            Ok(rec) => records.push((i + 1, rec)),
            Err(err) => {
                tracing::warn!(table, row = i + 1, %err, "rejected stored row");
                issues.push(RowIssue {
                    table,
                    row: i + 1,
                    message: err.to_string(),
                });
            }
        }
    }
    Ok(Loaded { records, issues })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sheet: Sheet, cells: &[&str]) -> Row {
        let cells: Vec<String> = cells.iter().map(|s| s.to_string()).collect();
        Row::from_cells(sheet.header(), &cells)
    }

    #[test]
    fn expense_row_parses_kind_and_category() {
        let r = row(
            Sheet::Expenses,
            &["2025-03-01 09:30:00", "Bread", "4.50", "Food", "variable"],
        );
        let e = ExpenseRecord::from_row(&r).unwrap();
        assert_eq!(e.kind, ExpenseKind::Variable);
        assert_eq!(e.amount, Decimal::new(450, 2));
        assert_eq!(
            e.to_cells(),
            ["2025-03-01 09:30:00", "Bread", "4.50", "Food", "Variable"]
        );
    }

    #[test]
    fn blank_amount_is_rejected_not_zeroed() {
        let r = row(Sheet::Incomes, &["2025-03-01 09:30:00", "Pay", ""]);
        assert!(matches!(
            IncomeRecord::from_row(&r),
            Err(BudgetError::Parse { .. })
        ));
    }

    #[test]
    fn blank_category_is_rejected_not_defaulted() {
        let r = row(
            Sheet::Expenses,
            &["2025-03-01 09:30:00", "Bread", "4.50", "  ", "Variable"],
        );
        assert!(matches!(
            ExpenseRecord::from_row(&r),
            Err(BudgetError::Validation(_))
        ));
        assert!(Sheet::Expenses.check_row(&r).is_err());
    }

    #[test]
    fn inverted_installment_is_rejected() {
        let r = row(Sheet::Installments, &["Car", "300", "2025-06-01", "2025-01-01"]);
        assert!(matches!(
            Installment::from_row(&r),
            Err(BudgetError::Validation(_))
        ));
    }

    #[test]
    fn sheet_names_parse() {
        assert_eq!("fixed-costs".parse::<Sheet>().unwrap(), Sheet::FixedCosts);
        assert_eq!("Incomes".parse::<Sheet>().unwrap(), Sheet::Incomes);
        assert!("ledger".parse::<Sheet>().is_err());
    }
}
