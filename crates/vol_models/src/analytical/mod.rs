//! Analytical pricing formulas for European options.
//!
//! Closed-form solutions under two sets of dynamics:
//! - Black-76 (forward measure, lognormal) — [`black`]
//! - Bachelier (normal) — [`bachelier`]
//!
//! Everything here is a pure function over (forward, strike, expiry,
//! volatility, option type); degenerate limits (zero volatility, zero time,
//! saturated tails) are explicit guarded branches, and invalid inputs are
//! structured errors, never NaN.

pub mod bachelier;
pub mod black;
mod error;

pub use error::AnalyticalError;
