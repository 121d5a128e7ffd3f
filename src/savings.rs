// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Savings reserve and the month-close transition.
//!
//! The reserve is two scalar cells, not a ledger: the running `balance` and
//! the amount moved by the most recent close (`last_transfer`), which is what
//! a single-step undo subtracts.

use crate::config::SAVINGS_CATEGORY;
use crate::error::{BudgetError, Result};
use crate::models::{ExpenseKind, ExpenseRecord, IncomeRecord, Sheet};
use crate::store::TableStore;
use crate::validate::{check_amount, submit};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

pub const BALANCE_CELL: &str = "balance";
pub const LAST_TRANSFER_CELL: &str = "last_transfer";

pub const WITHDRAWAL_LABEL: &str = "Withdrawal from savings";
pub const DEPOSIT_LABEL: &str = "Deposit to savings";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SavingsState {
    pub balance: Decimal,
    pub last_transfer: Decimal,
}

impl SavingsState {
    /// Moves the period balance (which may be negative) into the reserve.
    pub fn close_month(&mut self, period_balance: Decimal) {
        self.balance += period_balance;
        self.last_transfer = period_balance;
    }

    /// Reverses the last close. Returns the amount taken back; a second call
    /// in a row takes back zero.
    pub fn undo_close(&mut self) -> Decimal {
        let reverted = self.last_transfer;
        self.balance -= reverted;
        self.last_transfer = Decimal::ZERO;
        reverted
    }
}

/// Savings state as read from the store, plus any cells that had to be
/// defaulted.
#[derive(Debug, Clone, Default)]
pub struct LoadedSavings {
    pub state: SavingsState,
    pub warnings: Vec<String>,
}

fn read_amount_cell(
    store: &dyn TableStore,
    address: &str,
    warnings: &mut Vec<String>,
) -> Result<Decimal> {
    let raw = store.read_cell(Sheet::Savings.name(), address)?;
    let Some(raw) = raw else {
        return Ok(Decimal::ZERO);
    };
    match raw.trim().parse::<Decimal>() {
        Ok(v) => Ok(v),
        Err(err) => {
            tracing::warn!(cell = address, value = %raw, %err, "corrupt savings cell, using 0");
            warnings.push(format!(
                "savings cell '{}' holds '{}', which is not a number; treated as 0",
                address, raw
            ));
            Ok(Decimal::ZERO)
        }
    }
}

/// Reads both cells. Unset cells are zero; unparsable cells are zero with a
/// warning. Only store failures are errors.
pub fn load_state(store: &dyn TableStore) -> Result<LoadedSavings> {
    let mut warnings = Vec::new();
    let balance = read_amount_cell(store, BALANCE_CELL, &mut warnings)?;
    let last_transfer = read_amount_cell(store, LAST_TRANSFER_CELL, &mut warnings)?;
    Ok(LoadedSavings {
        state: SavingsState {
            balance,
            last_transfer,
        },
        warnings,
    })
}

pub fn save_state(store: &dyn TableStore, state: &SavingsState) -> Result<()> {
    let sheet = Sheet::Savings.name();
    store.write_cell(sheet, BALANCE_CELL, &state.balance.to_string())?;
    store.write_cell(sheet, LAST_TRANSFER_CELL, &state.last_transfer.to_string())?;
    Ok(())
}

pub fn close_month(store: &dyn TableStore, period_balance: Decimal) -> Result<LoadedSavings> {
    let mut loaded = load_state(store)?;
    loaded.state.close_month(period_balance);
    save_state(store, &loaded.state)?;
    tracing::info!(moved = %period_balance, balance = %loaded.state.balance, "month closed");
    Ok(loaded)
}

/// Reverses the most recent close, provided no withdrawal or deposit has
/// moved the reserve since.
pub fn undo_close(store: &dyn TableStore) -> Result<(Decimal, LoadedSavings)> {
    let mut loaded = load_state(store)?;
    let reverted = loaded.state.undo_close();
    save_state(store, &loaded.state)?;
    tracing::info!(reverted = %reverted, balance = %loaded.state.balance, "month close undone");
    Ok((reverted, loaded))
}

/// Takes money out of the reserve and books it as income. Any pending
/// month close can no longer be undone afterwards.
pub fn withdraw(
    store: &dyn TableStore,
    now: NaiveDateTime,
    amount: Decimal,
) -> Result<LoadedSavings> {
    let amount = check_amount(amount)?;
    let mut loaded = load_state(store)?;
    if amount > loaded.state.balance {
        return Err(BudgetError::validation(format!(
            "cannot withdraw {} from savings holding {}",
            amount, loaded.state.balance
        )));
    }
    submit(
        store,
        &IncomeRecord {
            timestamp: now,
            label: WITHDRAWAL_LABEL.to_string(),
            amount,
        },
    )?;
    loaded.state.balance -= amount;
    loaded.state.last_transfer = Decimal::ZERO;
    save_state(store, &loaded.state)?;
    tracing::info!(%amount, balance = %loaded.state.balance, "withdrew from savings");
    Ok(loaded)
}

/// Puts money into the reserve and books it as a savings expense. Any
/// pending month close can no longer be undone afterwards.
pub fn deposit(
    store: &dyn TableStore,
    now: NaiveDateTime,
    amount: Decimal,
) -> Result<LoadedSavings> {
    let amount = check_amount(amount)?;
    let mut loaded = load_state(store)?;
    submit(
        store,
        &ExpenseRecord {
            timestamp: now,
            label: DEPOSIT_LABEL.to_string(),
            amount,
            category: SAVINGS_CATEGORY.to_string(),
            kind: ExpenseKind::Savings,
        },
    )?;
    loaded.state.balance += amount;
    loaded.state.last_transfer = Decimal::ZERO;
    save_state(store, &loaded.state)?;
    tracing::info!(%amount, balance = %loaded.state.balance, "deposited to savings");
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_then_undo_restores_exactly() {
        let mut s = SavingsState {
            balance: Decimal::new(100_050, 2),
            last_transfer: Decimal::ZERO,
        };
        let before = s.balance;
        s.close_month(Decimal::new(3_333, 2));
        assert_eq!(s.balance, Decimal::new(103_383, 2));
        assert_eq!(s.undo_close(), Decimal::new(3_333, 2));
        assert_eq!(s.balance, before);
        assert_eq!(s.undo_close(), Decimal::ZERO);
        assert_eq!(s.balance, before);
    }

    #[test]
    fn negative_close_lowers_reserve() {
        let mut s = SavingsState::default();
        s.close_month(Decimal::from(-50));
        assert_eq!(s.balance, Decimal::from(-50));
        assert_eq!(s.last_transfer, Decimal::from(-50));
    }
}
