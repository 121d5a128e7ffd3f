// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::records;
use crate::models::{ExpenseRecord, Sheet};
use crate::session::Session;
use crate::utils::TIMESTAMP_FMT;
use crate::validate;
use anyhow::Result;

pub fn handle(s: &Session<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(s, sub)?,
        Some(("list", sub)) => list(s, sub)?,
        Some(("rm", sub)) => {
            records::remove(s, Sheet::Expenses, sub)?;
        }
        _ => {}
    }
    Ok(())
}

fn add(s: &Session<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let label = sub.get_one::<String>("label").unwrap();
    let amount = sub.get_one::<String>("amount").unwrap();
    let category = sub.get_one::<String>("category").unwrap();
    let kind = sub.get_one::<String>("kind").unwrap();
    let record = validate::expense(s.config, s.now, label, amount, category, kind)?;
    validate::submit(s.store, &record)?;
    println!(
        "Recorded {} expense '{}' of {:.2} {} ({})",
        record.kind.as_str().to_lowercase(),
        record.label,
        record.amount,
        s.config.currency,
        record.category
    );
    Ok(())
}

fn list(s: &Session<'_>, sub: &clap::ArgMatches) -> Result<()> {
    records::list::<ExpenseRecord, _>(
        s,
        sub,
        &["When", "Label", "Amount", "Category", "Kind"],
        |r| {
            vec![
                r.timestamp.format(TIMESTAMP_FMT).to_string(),
                r.label.clone(),
                format!("{:.2}", r.amount),
                r.category.clone(),
                r.kind.as_str().to_string(),
            ]
        },
    )
}
