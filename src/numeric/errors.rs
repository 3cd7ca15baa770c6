// ============================================================================
// Numeric Errors
// Error types for the rounding engine
// ============================================================================

use std::fmt;

/// Errors that can occur when rounding or formatting a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Input was NaN or infinite
    NonFinite,
    /// Requested precision is outside the supported range
    InvalidPrecision,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NonFinite => write!(f, "non-finite input: value must be a real number"),
            NumericError::InvalidPrecision => {
                write!(f, "invalid precision: outside the supported range")
            },
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NumericError::NonFinite.to_string(),
            "non-finite input: value must be a real number"
        );
        assert_eq!(
            NumericError::InvalidPrecision.to_string(),
            "invalid precision: outside the supported range"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::NonFinite, NumericError::NonFinite);
        assert_ne!(NumericError::NonFinite, NumericError::InvalidPrecision);
    }
}
