// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{BudgetError, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Homebudget", "homebudget"));

pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Food",
    "Home",
    "Transport",
    "Entertainment",
    "Health",
    "Other",
    "Savings",
];

/// Category that mirrored savings deposits are booked under.
pub const SAVINGS_CATEGORY: &str = "Savings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// File stem (SQLite) or directory name (CSV) inside the data dir.
    pub name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            name: "budget_data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Children counted for the monthly subsidy until they turn 18.
    pub child_birthdates: Vec<NaiveDate>,
    pub subsidy_per_child: Decimal,
    pub currency: String,
    pub categories: Vec<String>,
    pub cache_ttl_secs: u64,
    /// Restrict income/expense totals to the reference month.
    pub month_only: bool,
    pub store: StoreConfig,
    /// When set, every command must present the same secret.
    pub secret: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            child_birthdates: Vec::new(),
            subsidy_per_child: Decimal::new(800, 0),
            currency: "PLN".to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            cache_ttl_secs: 60,
            month_only: false,
            store: StoreConfig::default(),
            secret: None,
        }
    }
}

impl AppConfig {
    /// Canonical spelling of `raw` if it names a configured category.
    pub fn category(&self, raw: &str) -> Option<&str> {
        let raw = raw.trim();
        self.categories
            .iter()
            .find(|c| c.eq_ignore_ascii_case(raw))
            .map(|c| c.as_str())
    }

    fn check(&self) -> Result<()> {
        if self.subsidy_per_child.is_sign_negative() {
            return Err(BudgetError::Config(
                "subsidy_per_child must not be negative".into(),
            ));
        }
        if self.categories.is_empty() {
            return Err(BudgetError::Config("categories must not be empty".into()));
        }
        if self.store.name.trim().is_empty() {
            return Err(BudgetError::Config("store.name must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

pub fn app_paths(override_home: Option<PathBuf>) -> Result<AppPaths> {
    if let Some(home) = override_home {
        return Ok(AppPaths {
            config_dir: home.join("config"),
            data_dir: home.join("data"),
        });
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or_else(|| {
        BudgetError::Config("Could not determine platform-specific directories".into())
    })?;
    Ok(AppPaths {
        config_dir: proj.config_dir().to_path_buf(),
        data_dir: proj.data_dir().to_path_buf(),
    })
}

pub fn config_path(paths: &AppPaths) -> PathBuf {
    paths.config_dir.join("config.json")
}

/// Reads `config.json`, writing the defaults on first run.
pub fn load_or_init(paths: &AppPaths) -> Result<AppConfig> {
    let path = config_path(paths);
    if !path.exists() {
        let cfg = AppConfig::default();
        write_config(&path, &cfg)?;
        return Ok(cfg);
    }
    let raw = fs::read_to_string(&path)
        .map_err(|e| BudgetError::Config(format!("read {}: {}", path.display(), e)))?;
    let cfg: AppConfig = serde_json::from_str(&raw)
        .map_err(|e| BudgetError::Config(format!("parse {}: {}", path.display(), e)))?;
    cfg.check()?;
    Ok(cfg)
}

pub fn write_config(path: &Path, cfg: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| BudgetError::Config(format!("create {}: {}", parent.display(), e)))?;
    }
    let json =
        serde_json::to_string_pretty(cfg).map_err(|e| BudgetError::Config(e.to_string()))?;
    fs::write(path, json)
        .map_err(|e| BudgetError::Config(format!("write {}: {}", path.display(), e)))?;
    Ok(())
}
