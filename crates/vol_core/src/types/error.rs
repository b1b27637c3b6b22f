//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: the error surface of the library boundary
//! - `SolverError`: errors from root-finding solvers

use std::fmt;
use thiserror::Error;

/// Categorised pricing errors.
///
/// Every fallible entry point of the library reports one of these three
/// kinds, so callers can distinguish bad request construction
/// (`InvalidInput`) from bad market data (`ArbitrageViolation`) from a
/// computation that exhausted its iteration budget (`SolverDivergence`).
///
/// Failures are always reported; no entry point clamps or defaults its way
/// past an invalid value.
///
/// # Examples
/// ```
/// use vol_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("negative forward".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: negative forward");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid input data or parameters (non-positive forward/strike,
    /// malformed model parameters, missing sensitivity grid).
    InvalidInput(String),

    /// Quoted price outside the model's no-arbitrage bounds.
    ArbitrageViolation(String),

    /// Iterative solver exhausted its budget without meeting tolerance.
    SolverDivergence(String),
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PricingError::ArbitrageViolation(msg) => {
                write!(f, "Arbitrage violation: {}", msg)
            }
            PricingError::SolverDivergence(msg) => {
                write!(f, "Solver divergence: {}", msg)
            }
        }
    }
}

impl std::error::Error for PricingError {}

impl From<SolverError> for PricingError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::MaxIterationsExceeded { iterations } => PricingError::SolverDivergence(
                format!("failed to converge after {} iterations", iterations),
            ),
            SolverError::DerivativeNearZero { x } => {
                PricingError::SolverDivergence(format!("derivative near zero at x = {}", x))
            }
            SolverError::NoBracket { a, b } => PricingError::SolverDivergence(format!(
                "no bracket found between {} and {}",
                a, b
            )),
            SolverError::NumericalInstability(msg) => PricingError::SolverDivergence(msg),
        }
    }
}

/// Root-finding solver errors.
///
/// # Variants
/// - `MaxIterationsExceeded`: solver failed to converge within iteration limit
/// - `DerivativeNearZero`: derivative too small for a Newton step
/// - `NoBracket`: function values at bracket endpoints have same sign
/// - `NumericalInstability`: general numerical instability
///
/// # Examples
/// ```
/// use vol_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Derivative near zero (division by zero risk in a Newton step).
    #[error("Derivative near zero at x = {x}")]
    DerivativeNearZero {
        /// The x value where the derivative was near zero
        x: f64,
    },

    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}
