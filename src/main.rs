// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use homebudget::{cli, commands, config, db};

fn main() -> Result<()> {
    homebudget::init_tracing();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let home = matches.get_one::<String>("home").map(PathBuf::from);
    let paths = config::app_paths(home)?;
    let cfg = config::load_or_init(&paths)?;
    let store = db::open_or_init(&paths, &cfg)?;

    let s = commands::session(store.as_ref(), &cfg, &matches)?;
    s.authorize(matches.get_one::<String>("secret").map(String::as_str))?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Config at {}", config::config_path(&paths).display());
            println!("Data store at {}", db::store_path(&paths, &cfg).display());
        }
        Some(("income", sub)) => commands::incomes::handle(&s, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&s, sub)?,
        Some(("fixed", sub)) => commands::fixed::handle(&s, sub)?,
        Some(("installment", sub)) => commands::installments::handle(&s, sub)?,
        Some(("planned", sub)) => commands::planned::handle(&s, sub)?,
        Some(("shopping", sub)) => commands::lists::handle_shopping(&s, sub)?,
        Some(("task", sub)) => commands::lists::handle_tasks(&s, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&s, sub)?,
        Some(("savings", sub)) => commands::savings::handle(&s, sub)?,
        Some(("edit", sub)) => commands::editor::handle(&s, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&s, sub)?,
        Some(("import", sub)) => commands::importer::handle(&s, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&s)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
