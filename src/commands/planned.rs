// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::records;
use crate::models::{PlannedExpense, Sheet};
use crate::session::Session;
use crate::validate;
use anyhow::Result;

pub fn handle(s: &Session<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let record = validate::planned(
                s.now,
                sub.get_one::<String>("label").unwrap(),
                sub.get_one::<String>("amount").unwrap(),
                sub.get_one::<String>("month").unwrap(),
            )?;
            validate::submit(s.store, &record)?;
            println!(
                "Planned '{}' for {}: {:.2} {}",
                record.label, record.target_month, record.amount, s.config.currency
            );
        }
        Some(("list", sub)) => {
            records::list::<PlannedExpense, _>(s, sub, &["Month", "Label", "Amount"], |r| {
                vec![
                    r.target_month.clone(),
                    r.label.clone(),
                    format!("{:.2}", r.amount),
                ]
            })?;
        }
        Some(("rm", sub)) => {
            records::remove(s, Sheet::Planned, sub)?;
        }
        _ => {}
    }
    Ok(())
}
