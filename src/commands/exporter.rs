// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::editor::DELETE_COLUMN;
use crate::models::Sheet;
use crate::session::Session;
use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};

pub fn handle(s: &Session<'_>, m: &clap::ArgMatches) -> Result<()> {
    let sheet: Sheet = m.get_one::<String>("table").unwrap().parse()?;
    let fmt = m.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = m.get_one::<String>("out").unwrap().trim();
    if sheet == Sheet::Savings {
        return Err(anyhow!("savings holds cells, not rows; use `savings status`"));
    }
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    // Raw rows, so rows that no longer validate can still be fixed by hand.
    let rows = s
        .store
        .read_all(sheet.name())
        .with_context(|| format!("Read table {}", sheet))?;
    let header = sheet.header();

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            let mut head: Vec<&str> = header.to_vec();
            head.push(DELETE_COLUMN);
            wtr.write_record(&head)?;
            for row in &rows {
                let mut cells = row.cells(header);
                cells.push("false".to_string());
                wtr.write_record(&cells)?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<Value> = rows
                .iter()
                .map(|row| {
                    let obj: Map<String, Value> = header
                        .iter()
                        .map(|h| {
                            (
                                h.to_string(),
                                Value::String(row.get(h).unwrap_or_default().to_string()),
                            )
                        })
                        .collect();
                    Value::Object(obj)
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
    }
    println!("Exported {} rows of {} to {}", rows.len(), sheet, out);
    Ok(())
}
