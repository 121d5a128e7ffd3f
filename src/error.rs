// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures raised by the budget core. Command handlers wrap these in
/// `anyhow` with additional context.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// A field could not be read as the expected type (amount, date, month, flag).
    #[error("Invalid {field} '{value}': {reason}")]
    Parse {
        field: &'static str,
        value: String,
        reason: String,
    },
    /// A well-formed record breaks a business rule and was rejected before any write.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The backing table store could not be read or written.
    #[error("Store unavailable: {0} (nothing was changed; retry the command)")]
    StoreUnavailable(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Access denied: secret does not match")]
    Unauthorized,
}

impl BudgetError {
    pub fn parse(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        BudgetError::Parse {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        BudgetError::Validation(msg.into())
    }
}

impl From<rusqlite::Error> for BudgetError {
    fn from(err: rusqlite::Error) -> Self {
        BudgetError::StoreUnavailable(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        BudgetError::StoreUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BudgetError>;
