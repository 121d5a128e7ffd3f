// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod dashboard;
pub mod doctor;
pub mod editor;
pub mod expenses;
pub mod exporter;
pub mod fixed;
pub mod importer;
pub mod incomes;
pub mod installments;
pub mod lists;
pub mod planned;
pub mod records;
pub mod savings;

use crate::aggregate::Scope;
use crate::config::AppConfig;
use crate::session::Session;
use crate::store::TableStore;
use crate::utils::parse_date;
use anyhow::Result;

/// Applies the global `--today`, `--month-only` and `--all-time` flags.
pub fn session<'a>(
    store: &'a dyn TableStore,
    config: &'a AppConfig,
    m: &clap::ArgMatches,
) -> Result<Session<'a>> {
    let mut s = Session::new(store, config);
    if let Some(raw) = m.get_one::<String>("today") {
        s = s.at(parse_date(raw)?);
    }
    if m.get_flag("month_only") {
        s = s.with_scope(Scope::CurrentMonth);
    } else if m.get_flag("all_time") {
        s = s.with_scope(Scope::AllTime);
    }
    Ok(s)
}
