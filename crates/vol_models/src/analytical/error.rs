//! Error types for analytical pricing operations.

use thiserror::Error;
use vol_core::types::PricingError;

/// Analytical pricing errors.
///
/// Structured invalid-input errors for the closed-form pricers; every
/// variant maps onto [`PricingError::InvalidInput`] at the library boundary.
///
/// # Examples
/// ```
/// use vol_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("-0.2"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnalyticalError {
    /// Invalid forward (non-positive or non-finite).
    #[error("Invalid forward: F = {forward} (positive value required)")]
    InvalidForward {
        /// The invalid forward value
        forward: f64,
    },

    /// Invalid strike (non-positive or non-finite).
    #[error("Invalid strike: K = {strike} (positive value required)")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Invalid time to expiry (negative or non-finite).
    #[error("Invalid expiry: T = {expiry} (non-negative value required)")]
    InvalidExpiry {
        /// The invalid expiry value
        expiry: f64,
    },

    /// Invalid volatility (negative or non-finite).
    #[error("Invalid volatility: sigma = {volatility} (non-negative value required)")]
    InvalidVolatility {
        /// The invalid volatility value
        volatility: f64,
    },

    /// Forward delta outside the admissible open interval for the option
    /// type, or incompatible with it in sign.
    #[error("Invalid delta: {delta} out of range for {option_kind}")]
    InvalidDelta {
        /// The invalid delta value
        delta: f64,
        /// "call" or "put"
        option_kind: &'static str,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_forward_display() {
        let err = AnalyticalError::InvalidForward { forward: -100.0 };
        assert_eq!(
            format!("{}", err),
            "Invalid forward: F = -100 (positive value required)"
        );
    }

    #[test]
    fn test_invalid_strike_display() {
        let err = AnalyticalError::InvalidStrike { strike: -50.0 };
        assert!(format!("{}", err).contains("-50"));
    }

    #[test]
    fn test_invalid_volatility_display() {
        let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
        assert!(format!("{}", err).contains("sigma = -0.2"));
    }

    #[test]
    fn test_invalid_delta_display() {
        let err = AnalyticalError::InvalidDelta {
            delta: 1.5,
            option_kind: "call",
        };
        assert!(format!("{}", err).contains("1.5"));
        assert!(format!("{}", err).contains("call"));
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = AnalyticalError::InvalidExpiry { expiry: -1.0 };
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_into_pricing_error_is_invalid_input() {
        let err: PricingError = AnalyticalError::InvalidForward { forward: -1.0 }.into();
        assert!(matches!(err, PricingError::InvalidInput(_)));
        assert!(format!("{}", err).contains("forward"));
    }

    #[test]
    fn test_clone_and_equality() {
        let err1 = AnalyticalError::InvalidVolatility { volatility: -0.1 };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
