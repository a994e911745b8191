//! Budget state persistence
//!
//! Holds the single persisted record as pretty-printed JSON under the data
//! directory. The record is replaced wholesale on every write; a missing or
//! unreadable file yields the configured default amount.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// File name of the persisted record inside the data directory
pub const DATA_FILE_NAME: &str = "data.json";

/// Rejected budget mutations
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("invalid budget amount: {0}")]
    InvalidAmount(Decimal),
}

/// The single persisted record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetState {
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_budget: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl BudgetState {
    pub fn with_amount(amount: Decimal) -> Self {
        Self {
            remaining_budget: amount,
            last_updated: Utc::now(),
        }
    }

    /// Budget amounts must never go negative; checked before every write
    pub fn validate_amount(amount: Decimal) -> Result<(), BudgetError> {
        if amount < Decimal::ZERO {
            return Err(BudgetError::InvalidAmount(amount));
        }
        Ok(())
    }
}

/// JSON-file repository for the budget record
pub struct BudgetStore {
    data_file: PathBuf,
    default_budget: Decimal,
}

impl BudgetStore {
    /// Create a store at the default data directory
    pub fn new(default_budget: Decimal) -> Result<Self> {
        let data_file = crate::config::data_dir()?.join(DATA_FILE_NAME);
        Ok(Self {
            data_file,
            default_budget,
        })
    }

    /// Create with an explicit data file
    pub fn with_file(data_file: PathBuf, default_budget: Decimal) -> Self {
        Self {
            data_file,
            default_budget,
        }
    }

    /// Read the current record, falling back to the default amount when the
    /// file is missing or unreadable
    pub fn load(&self) -> BudgetState {
        if self.data_file.exists() {
            match std::fs::read_to_string(&self.data_file) {
                Ok(raw) => match serde_json::from_str::<BudgetState>(&raw) {
                    Ok(state) => return state,
                    Err(e) => warn!(
                        "Failed to parse {}: {}, using default budget",
                        self.data_file.display(),
                        e
                    ),
                },
                Err(e) => warn!(
                    "Failed to read {}: {}, using default budget",
                    self.data_file.display(),
                    e
                ),
            }
        }
        BudgetState::with_amount(self.default_budget)
    }

    /// Persist the record, stamping `last_updated`
    pub fn save(&self, state: &mut BudgetState) -> Result<()> {
        state.last_updated = Utc::now();

        if let Some(parent) = self.data_file.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        let contents =
            serde_json::to_string_pretty(state).context("Failed to serialize budget state")?;
        std::fs::write(&self.data_file, contents).context("Failed to write budget state")?;

        Ok(())
    }

    /// Replace the remaining budget with a new amount
    ///
    /// The amount is validated before anything touches disk.
    pub fn update_amount(&self, amount: Decimal) -> Result<BudgetState> {
        BudgetState::validate_amount(amount)?;

        let mut state = self.load();
        state.remaining_budget = amount;
        self.save(&mut state)?;
        Ok(state)
    }

    /// Restore the configured default amount
    pub fn reset(&self) -> Result<BudgetState> {
        let mut state = BudgetState::with_amount(self.default_budget);
        self.save(&mut state)?;
        Ok(state)
    }

    pub fn default_budget(&self) -> Decimal {
        self.default_budget
    }

    pub fn data_file(&self) -> &std::path::Path {
        &self.data_file
    }
}
