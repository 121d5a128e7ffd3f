// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::Scope;
use crate::commands::records::print_issues;
use crate::session::{Dashboard, Session};
use crate::utils::{fmt_money, maybe_print_json, month_end, pretty_table};
use anyhow::{Context, Result};

pub fn handle(s: &Session<'_>, m: &clap::ArgMatches) -> Result<()> {
    let dash = s
        .dashboard()
        .context("Could not compute the dashboard")?;
    if maybe_print_json(m.get_flag("json"), &dash)? {
        return Ok(());
    }
    render(&dash);
    Ok(())
}

pub fn render(dash: &Dashboard) {
    let m = &dash.metrics;
    let ccy = dash.currency.as_str();
    let scope = match m.scope {
        Scope::AllTime => "all time".to_string(),
        Scope::CurrentMonth => format!("{} only", dash.today.format("%Y-%m")),
    };
    let rows = vec![
        vec!["Income".to_string(), fmt_money(&m.total_income, ccy)],
        vec!["  of which child subsidy".to_string(), fmt_money(&m.child_subsidy, ccy)],
        vec!["Expenses".to_string(), fmt_money(&m.total_expense, ccy)],
        vec![
            "  of which installments".to_string(),
            fmt_money(&m.active_installment_sum, ccy),
        ],
        vec!["Balance".to_string(), fmt_money(&m.balance, ccy)],
        vec![
            format!("Per day ({} days to {})", m.days_remaining, month_end(dash.today)),
            fmt_money(&m.daily_allowance, ccy),
        ],
    ];
    println!("Dashboard for {} ({})", dash.today, scope);
    println!("{}", pretty_table(&["Metric", "Value"], rows));

    if !dash.categories.is_empty() {
        let data = dash
            .categories
            .iter()
            .map(|c| vec![c.category.clone(), fmt_money(&c.amount, ccy)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    print_issues(&dash.issues);
}
