use thiserror::Error;

#[derive(Debug, Error)]
pub enum CashRuleError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Report error: {0}")]
    ReportError(String),
}

impl CashRuleError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CashRuleError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CashRuleError {
    fn from(e: serde_json::Error) -> Self {
        CashRuleError::SerializationError(e.to_string())
    }
}
