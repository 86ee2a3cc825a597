pub mod evaluate;
pub mod fiscal_year;
pub mod period;
pub mod prompt;
pub mod report;
