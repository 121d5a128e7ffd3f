// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::savings::{self, LoadedSavings};
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result};

pub fn handle(s: &Session<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("status", sub)) => status(s, sub)?,
        Some(("close", _)) => close(s)?,
        Some(("undo", _)) => undo(s)?,
        Some(("withdraw", sub)) => {
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let after = savings::withdraw(s.store, s.now, amount)?;
            report_warnings(&after);
            println!(
                "Withdrew {} from savings; booked as income. Savings now {}",
                fmt_money(&amount, &s.config.currency),
                fmt_money(&after.state.balance, &s.config.currency)
            );
        }
        Some(("deposit", sub)) => {
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let after = savings::deposit(s.store, s.now, amount)?;
            report_warnings(&after);
            println!(
                "Deposited {} to savings; booked as an expense. Savings now {}",
                fmt_money(&amount, &s.config.currency),
                fmt_money(&after.state.balance, &s.config.currency)
            );
        }
        _ => {}
    }
    Ok(())
}

fn report_warnings(loaded: &LoadedSavings) {
    for w in &loaded.warnings {
        eprintln!("warning: {}", w);
    }
}

fn status(s: &Session<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let loaded = savings::load_state(s.store)?;
    if maybe_print_json(sub.get_flag("json"), &loaded.state)? {
        return Ok(());
    }
    report_warnings(&loaded);
    let ccy = s.config.currency.as_str();
    println!(
        "{}",
        pretty_table(
            &["Savings", "Last close"],
            vec![vec![
                fmt_money(&loaded.state.balance, ccy),
                fmt_money(&loaded.state.last_transfer, ccy),
            ]],
        )
    );
    Ok(())
}

fn close(s: &Session<'_>) -> Result<()> {
    let dash = s
        .dashboard()
        .context("Could not compute the balance to close")?;
    let after = savings::close_month(s.store, dash.metrics.balance)?;
    report_warnings(&after);
    println!(
        "Closed the month: moved {} into savings (now {}). Run `savings undo` to reverse.",
        fmt_money(&dash.metrics.balance, &s.config.currency),
        fmt_money(&after.state.balance, &s.config.currency)
    );
    Ok(())
}

fn undo(s: &Session<'_>) -> Result<()> {
    let (reverted, after) = savings::undo_close(s.store)?;
    report_warnings(&after);
    if reverted.is_zero() {
        println!("Nothing to undo.");
    } else {
        println!(
            "Reversed the last close: took back {} (savings now {})",
            fmt_money(&reverted, &s.config.currency),
            fmt_money(&after.state.balance, &s.config.currency)
        );
    }
    Ok(())
}
