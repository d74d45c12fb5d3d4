use thiserror::Error;

/// Failures detected locally, before or between remote calls.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BudgetError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("invalid range '{0}', expected something like A1:E30")]
    InvalidRange(String),

    #[error("no spreadsheet found, pass one with --id or create one with --create")]
    NoSpreadsheet,

    #[error("range {range} is full ({capacity} rows)")]
    RangeFull { range: String, capacity: usize },
}

impl BudgetError {
    pub fn invalid_input(input: &str, reason: impl Into<String>) -> Self {
        BudgetError::InvalidInput {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
