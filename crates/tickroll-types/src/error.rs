//! Error types for tickroll.

use thiserror::Error;

use crate::{Period, PeriodParseError};

/// Result type alias for tickroll operations.
pub type Result<T> = std::result::Result<T, TickrollError>;

/// Errors that can occur while configuring or running the pipeline.
#[derive(Error, Debug)]
pub enum TickrollError {
    /// An unrecognized period identifier. Indicates a configuration
    /// defect, not bad input data.
    #[error(transparent)]
    Period(#[from] PeriodParseError),

    /// A roll-up stage was configured with a period that has no child
    /// candle period.
    #[error("period {0} cannot be rolled up from finer candles")]
    InvalidRollupPeriod(Period),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_converts() {
        let err: TickrollError = "5m".parse::<Period>().unwrap_err().into();
        assert!(matches!(err, TickrollError::Period(_)));
    }

    #[test]
    fn test_invalid_rollup_message_names_period() {
        let err = TickrollError::InvalidRollupPeriod(Period::Minute1);
        assert!(err.to_string().contains("1m"));
    }
}
