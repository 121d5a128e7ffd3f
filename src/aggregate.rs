// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard arithmetic. Pure functions of a reference date and record sets;
//! nothing here touches the store.

use crate::models::{ExpenseRecord, FixedCost, IncomeRecord, Installment};
use crate::utils::{last_day_of_month, month_key};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub const ADULT_AGE: i32 = 18;

/// Which income/expense rows count. Fixed costs and installments ignore this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    AllTime,
    /// Only rows whose timestamp falls in the reference date's `YYYY-MM`.
    CurrentMonth,
}

impl Scope {
    pub fn includes(&self, today: NaiveDate, timestamp: &NaiveDateTime) -> bool {
        match self {
            Scope::AllTime => true,
            Scope::CurrentMonth => month_key(timestamp.date()) == month_key(today),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
    pub incomes: &'a [IncomeRecord],
    pub expenses: &'a [ExpenseRecord],
    pub fixed_costs: &'a [FixedCost],
    pub installments: &'a [Installment],
}

#[derive(Debug, Clone)]
pub struct SubsidyRule<'a> {
    pub birthdates: &'a [NaiveDate],
    pub per_child: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub balance: Decimal,
    pub daily_allowance: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub active_installment_sum: Decimal,
    pub child_subsidy: Decimal,
    pub days_remaining: u32,
    pub scope: Scope,
}

/// Whole years between `birthdate` and `today`.
pub fn age_in_years(today: NaiveDate, birthdate: NaiveDate) -> i32 {
    let mut age = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age
}

pub fn child_subsidy(today: NaiveDate, rule: &SubsidyRule<'_>) -> Decimal {
    let eligible = rule
        .birthdates
        .iter()
        .filter(|b| age_in_years(today, **b) < ADULT_AGE)
        .count();
    rule.per_child * Decimal::from(eligible)
}

pub fn active_installments(
    today: NaiveDate,
    installments: &[Installment],
) -> (Vec<&Installment>, Decimal) {
    let active: Vec<&Installment> = installments.iter().filter(|i| i.is_active(today)).collect();
    let sum = active.iter().map(|i| i.amount).sum();
    (active, sum)
}

/// Days left in the month, counting `today`.
pub fn days_remaining_in_month(today: NaiveDate) -> u32 {
    last_day_of_month(today.year(), today.month()) - today.day() + 1
}

pub fn total_income(
    today: NaiveDate,
    scope: Scope,
    incomes: &[IncomeRecord],
    rule: &SubsidyRule<'_>,
) -> Decimal {
    let recorded: Decimal = incomes
        .iter()
        .filter(|r| scope.includes(today, &r.timestamp))
        .map(|r| r.amount)
        .sum();
    recorded + child_subsidy(today, rule)
}

pub fn total_expense(today: NaiveDate, scope: Scope, inputs: &Inputs<'_>) -> Decimal {
    let variable: Decimal = inputs
        .expenses
        .iter()
        .filter(|r| scope.includes(today, &r.timestamp))
        .map(|r| r.amount)
        .sum();
    let fixed: Decimal = inputs.fixed_costs.iter().map(|r| r.amount).sum();
    let (_, installments) = active_installments(today, inputs.installments);
    variable + fixed + installments
}

pub fn compute_metrics(
    today: NaiveDate,
    scope: Scope,
    inputs: &Inputs<'_>,
    rule: &SubsidyRule<'_>,
) -> Metrics {
    let subsidy = child_subsidy(today, rule);
    let total_income = total_income(today, scope, inputs.incomes, rule);
    let total_expense = total_expense(today, scope, inputs);
    let (_, active_installment_sum) = active_installments(today, inputs.installments);
    let balance = total_income - total_expense;
    let days_remaining = days_remaining_in_month(today);
    let daily_allowance = if days_remaining > 0 {
        balance / Decimal::from(days_remaining)
    } else {
        balance
    };
    Metrics {
        balance,
        daily_allowance,
        total_income,
        total_expense,
        active_installment_sum,
        child_subsidy: subsidy,
        days_remaining,
        scope,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// In-scope expense totals per category, largest first (ties by name).
pub fn category_breakdown(
    today: NaiveDate,
    scope: Scope,
    expenses: &[ExpenseRecord],
) -> Vec<CategoryTotal> {
    let mut agg: HashMap<&str, Decimal> = HashMap::new();
    for e in expenses.iter().filter(|e| scope.includes(today, &e.timestamp)) {
        *agg.entry(e.category.as_str()).or_insert(Decimal::ZERO) += e.amount;
    }
    let mut items: Vec<CategoryTotal> = agg
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    items.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    items
}
