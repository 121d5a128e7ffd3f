// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::active_installments;
use crate::commands::records;
use crate::models::{Installment, Loaded, Sheet};
use crate::session::Session;
use crate::validate;
use anyhow::Result;

pub fn handle(s: &Session<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(s, sub)?,
        Some(("list", sub)) => list(s, sub)?,
        Some(("rm", sub)) => {
            records::remove(s, Sheet::Installments, sub)?;
        }
        _ => {}
    }
    Ok(())
}

fn add(s: &Session<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let record = validate::installment(
        sub.get_one::<String>("label").unwrap(),
        sub.get_one::<String>("amount").unwrap(),
        sub.get_one::<String>("start").unwrap(),
        sub.get_one::<String>("end").unwrap(),
    )?;
    validate::submit(s.store, &record)?;
    println!(
        "Added installment '{}' of {:.2} {} from {} to {}",
        record.label, record.amount, s.config.currency, record.start_date, record.end_date
    );
    Ok(())
}

fn list(s: &Session<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let today = s.today();
    let mut loaded = records::load::<Installment>(s)?;
    if sub.get_flag("active") {
        loaded.records.retain(|(_, r)| r.is_active(today));
    }
    records::print(
        sub.get_flag("json"),
        &loaded,
        &["Label", "Amount", "From", "To", "Active"],
        |r| {
            vec![
                r.label.clone(),
                format!("{:.2}", r.amount),
                r.start_date.to_string(),
                r.end_date.to_string(),
                if r.is_active(today) { "yes" } else { "no" }.to_string(),
            ]
        },
    )?;
    if !sub.get_flag("json") {
        print_active_total(s, &loaded);
    }
    Ok(())
}

fn print_active_total(s: &Session<'_>, loaded: &Loaded<Installment>) {
    let all = loaded.clone().into_values();
    let (active, sum) = active_installments(s.today(), &all);
    println!(
        "{} active on {}: {:.2} {}",
        active.len(),
        s.today(),
        sum,
        s.config.currency
    );
}
