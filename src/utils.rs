// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{BudgetError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FMT: &str = "%Y-%m-%d";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|e| BudgetError::parse("date", s, format!("{}, expected YYYY-MM-DD", e)))
}

/// Accepts `YYYY-MM-DD HH:MM:SS` and, for rows typed in by hand, a bare date
/// (read as midnight).
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, TIMESTAMP_FMT) {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| BudgetError::parse("timestamp", s, "expected YYYY-MM-DD HH:MM:SS"))
}

pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{}-01", s), DATE_FMT)
        .map_err(|_| BudgetError::parse("month", s, "expected YYYY-MM"))?;
    if s.len() != 7 {
        return Err(BudgetError::parse("month", s, "expected YYYY-MM"));
    }
    Ok(s.to_string())
}

/// Missing or blank amounts are parse failures, never zero.
pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return Err(BudgetError::parse("amount", s, "value is missing"));
    }
    s.parse::<Decimal>()
        .map_err(|e| BudgetError::parse("amount", s, e.to_string()))
}

pub fn parse_flag(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "x" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(BudgetError::parse("flag", s, "expected true or false")),
    }
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
    }
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    let last = last_day_of_month(date.year(), date.month());
    date.with_day(last).unwrap_or(date)
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{:.2} {}", d.round_dp(2), ccy)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> anyhow::Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_amount_is_a_parse_error() {
        assert!(matches!(
            parse_decimal("  "),
            Err(BudgetError::Parse { field: "amount", .. })
        ));
        assert!(parse_decimal("abc").is_err());
        assert_eq!(parse_decimal(" 12.50 ").unwrap(), Decimal::new(1250, 2));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(last_day_of_month(2024, 2), 29);
        assert_eq!(last_day_of_month(2025, 2), 28);
        assert_eq!(last_day_of_month(2025, 4), 30);
        assert_eq!(last_day_of_month(2025, 12), 31);
    }

    #[test]
    fn month_parse_rejects_dates() {
        assert_eq!(parse_month("2025-03").unwrap(), "2025-03");
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("2025-03-01").is_err());
    }

    #[test]
    fn timestamp_accepts_bare_date() {
        let ts = parse_timestamp("2025-03-04").unwrap();
        assert_eq!(ts.format(TIMESTAMP_FMT).to_string(), "2025-03-04 00:00:00");
    }
}
