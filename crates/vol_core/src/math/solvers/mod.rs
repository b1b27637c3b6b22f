//! Root-finding solvers for numerical inversion.
//!
//! This module provides the root finders behind the implied-volatility and
//! strike inversions:
//!
//! - [`SafeguardedNewtonSolver`]: Newton iteration with every step clamped
//!   into a sign-change bracket and automatic bisection fallback. This is the
//!   single safeguarded root finder shared by the Black and Normal
//!   implied-volatility solvers.
//! - [`BrentSolver`]: derivative-free bracketing method combining bisection,
//!   secant and inverse quadratic interpolation.
//!
//! Both are configured through [`SolverConfig`]:
//! - `tolerance`: residual convergence tolerance
//! - `step_tolerance`: convergence tolerance on the argument / bracket width
//! - `max_iterations`: fixed iteration budget, so a pathological input is a
//!   reported failure rather than a hang
//!
//! ## Examples
//!
//! ```
//! use vol_core::math::solvers::{SafeguardedNewtonSolver, SolverConfig};
//!
//! // Solve x² - 2 = 0 in [0, 2]
//! let solver = SafeguardedNewtonSolver::new(SolverConfig::default());
//! let root = solver
//!     .find_root(|x: f64| x * x - 2.0, |x| 2.0 * x, 1.0, 0.0, 2.0)
//!     .unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-9);
//! ```

mod brent;
mod config;
mod safeguarded;

pub use brent::BrentSolver;
pub use config::SolverConfig;
pub use safeguarded::SafeguardedNewtonSolver;
