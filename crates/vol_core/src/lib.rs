//! # vol_core: Mathematical Foundation for Volatility Inversion
//!
//! Bottom layer of the workspace, providing:
//! - Standard-normal distribution primitives (`math::distributions`)
//! - Root-finding solvers: safeguarded Newton and Brent (`math::solvers`)
//! - Error types: `PricingError`, `SolverError` (`types::error`)
//!
//! This crate has no dependency on the model layer and minimal external
//! dependencies:
//! - num-traits: traits for generic numerical computation
//! - thiserror: structured error derives
//! - serde: serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use vol_core::math::distributions::{norm_cdf, norm_inv_cdf};
//! use vol_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! // Distribution round trip
//! let x = norm_inv_cdf(norm_cdf(1.5_f64));
//! assert!((x - 1.5).abs() < 1e-9);
//!
//! // Derivative-free root finding
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
