// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Shopping list and household tasks. Neither touches the money totals.

use crate::commands::records;
use crate::models::{Sheet, ShoppingItem, TaskItem};
use crate::session::Session;
use crate::validate;
use anyhow::Result;

fn tick(done: bool) -> String {
    if done { "x" } else { "" }.to_string()
}

pub fn handle_shopping(s: &Session<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let item = validate::shopping_item(s.now, sub.get_one::<String>("label").unwrap())?;
            validate::submit(s.store, &item)?;
            println!("Added '{}' to the shopping list", item.label);
        }
        Some(("list", sub)) => {
            records::list::<ShoppingItem, _>(s, sub, &["Item", "Done"], |r| {
                vec![r.label.clone(), tick(r.done)]
            })?;
        }
        Some(("done", sub)) => records::mark_done(s, Sheet::Shopping, sub)?,
        Some(("rm", sub)) => {
            records::remove(s, Sheet::Shopping, sub)?;
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_tasks(s: &Session<'_>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let task = validate::task(
                s.now,
                sub.get_one::<String>("label").unwrap(),
                sub.get_one::<String>("due").unwrap(),
            )?;
            validate::submit(s.store, &task)?;
            println!("Added task '{}' due {}", task.label, task.due_date);
        }
        Some(("list", sub)) => {
            let today = s.today();
            records::list::<TaskItem, _>(s, sub, &["Task", "Due", "Done"], |r| {
                let due = if !r.done && r.due_date < today {
                    format!("{} (overdue)", r.due_date)
                } else {
                    r.due_date.to_string()
                };
                vec![r.label.clone(), due, tick(r.done)]
            })?;
        }
        Some(("done", sub)) => records::mark_done(s, Sheet::Tasks, sub)?,
        Some(("rm", sub)) => {
            records::remove(s, Sheet::Tasks, sub)?;
        }
        _ => {}
    }
    Ok(())
}
