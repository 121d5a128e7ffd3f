// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{self, CategoryTotal, Inputs, Metrics, Scope, SubsidyRule};
use crate::config::AppConfig;
use crate::error::{BudgetError, Result};
use crate::models::{self, ExpenseRecord, FixedCost, IncomeRecord, Installment, RowIssue};
use crate::store::TableStore;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Compares a submitted secret against the configured one. No configured
/// secret means the gate is open.
pub fn authenticate(submitted: Option<&str>, configured: Option<&str>) -> bool {
    match configured {
        None => true,
        Some(expected) => submitted.is_some_and(|s| s == expected),
    }
}

/// Everything one command needs: where data lives, the settings, and the
/// reference time. Built once per invocation and dropped afterwards.
pub struct Session<'a> {
    pub store: &'a dyn TableStore,
    pub config: &'a AppConfig,
    pub now: NaiveDateTime,
    pub scope: Scope,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a dyn TableStore, config: &'a AppConfig) -> Self {
        let scope = if config.month_only {
            Scope::CurrentMonth
        } else {
            Scope::AllTime
        };
        Self {
            store,
            config,
            now: Local::now().naive_local(),
            scope,
        }
    }

    /// Pins the reference date (time of day is kept).
    pub fn at(mut self, today: NaiveDate) -> Self {
        self.now = today.and_time(self.now.time());
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    pub fn authorize(&self, submitted: Option<&str>) -> Result<()> {
        if authenticate(submitted, self.config.secret.as_deref()) {
            Ok(())
        } else {
            Err(BudgetError::Unauthorized)
        }
    }

    pub fn subsidy_rule(&self) -> SubsidyRule<'_> {
        SubsidyRule {
            birthdates: &self.config.child_birthdates,
            per_child: self.config.subsidy_per_child,
        }
    }

    /// Reads the four financial tables and computes the dashboard.
    pub fn dashboard(&self) -> Result<Dashboard> {
        let incomes = models::load::<IncomeRecord>(self.store)?;
        let expenses = models::load::<ExpenseRecord>(self.store)?;
        let fixed = models::load::<FixedCost>(self.store)?;
        let installments = models::load::<Installment>(self.store)?;

        let mut issues = Vec::new();
        issues.extend(incomes.issues.iter().cloned());
        issues.extend(expenses.issues.iter().cloned());
        issues.extend(fixed.issues.iter().cloned());
        issues.extend(installments.issues.iter().cloned());

        let incomes = incomes.into_values();
        let expenses = expenses.into_values();
        let fixed = fixed.into_values();
        let installments = installments.into_values();
        let inputs = Inputs {
            incomes: &incomes,
            expenses: &expenses,
            fixed_costs: &fixed,
            installments: &installments,
        };
        let today = self.today();
        let metrics = aggregate::compute_metrics(today, self.scope, &inputs, &self.subsidy_rule());
        let categories = aggregate::category_breakdown(today, self.scope, &expenses);
        Ok(Dashboard {
            today,
            currency: self.config.currency.clone(),
            metrics,
            categories,
            issues,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub currency: String,
    pub metrics: Metrics,
    pub categories: Vec<CategoryTotal>,
    pub issues: Vec<RowIssue>,
}
