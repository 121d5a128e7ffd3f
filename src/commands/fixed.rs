// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::records;
use crate::models::{FixedCost, Sheet};
use crate::session::Session;
use crate::validate;
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(s: &Session<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let label = sub.get_one::<String>("label").unwrap();
            let amount = sub.get_one::<String>("amount").unwrap();
            let record = validate::fixed_cost(s.now, label, amount)?;
            validate::submit(s.store, &record)?;
            println!(
                "Added fixed cost '{}' of {:.2} {} per month",
                record.label, record.amount, s.config.currency
            );
        }
        Some(("list", sub)) => {
            let loaded = records::load::<FixedCost>(s)?;
            records::print(sub.get_flag("json"), &loaded, &["Label", "Monthly"], |r| {
                vec![r.label.clone(), format!("{:.2}", r.amount)]
            })?;
            if !sub.get_flag("json") {
                let total: Decimal = loaded.values().iter().map(|r| r.amount).sum();
                println!("Total per month: {:.2} {}", total, s.config.currency);
            }
        }
        Some(("rm", sub)) => {
            records::remove(s, Sheet::FixedCosts, sub)?;
        }
        _ => {}
    }
    Ok(())
}
