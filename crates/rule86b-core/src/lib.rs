pub mod error;
pub mod evaluator;
pub mod input;
pub mod types;

#[cfg(feature = "report")]
pub mod report;

#[cfg(feature = "fiscal_year")]
pub mod fiscal_year;

pub use error::CashRuleError;
pub use evaluator::{analyze, evaluate, Applicability, Verdict};
pub use input::TaxPeriodInput;
pub use types::*;

/// Standard result type for all Rule 86B operations
pub type CashRuleResult<T> = Result<T, CashRuleError>;
