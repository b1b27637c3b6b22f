//! # Vol Models: Pricing Formulas and Volatility Inversion
//!
//! Closed-form option pricing and the numerically delicate inversions built
//! on top of it:
//!
//! - Black-76 (lognormal, forward measure) and Bachelier (normal) pricers
//!   with analytical Greeks (`analytical`)
//! - The SABR Hagan volatility expansion (`models::sabr`)
//! - Implied-volatility solvers for both models, cross-model volatility
//!   approximations and strike-from-delta inversion (`implied`)
//! - The volatility-with-bucketed-sensitivities value object (`sensitivity`)
//!
//! ## Design Principles
//!
//! - **Pure functions over immutable inputs**: every entry point reads its
//!   arguments and allocates nothing shared; all calls are re-entrant.
//! - **Explicit guarded branches** for every limit case (zero volatility,
//!   zero time, at-the-money, saturated tails) rather than hidden exception
//!   paths — each branch is a tested boundary condition.
//! - **Errors, never clamps**: invalid inputs and arbitrage-violating prices
//!   are reported immediately as structured errors.
//!
//! ## Example
//!
//! ```
//! use vol_models::analytical::black;
//! use vol_models::implied;
//! use vol_models::instruments::OptionType;
//!
//! let (forward, strike, expiry, sigma) = (100.0_f64, 120.0, 2.0, 0.25);
//!
//! let price = black::price(forward, strike, expiry, sigma, OptionType::Call).unwrap();
//! let recovered =
//!     implied::black_implied_volatility(price, forward, strike, expiry, OptionType::Call)
//!         .unwrap();
//! assert!((recovered - sigma).abs() < 1e-9);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod implied;
pub mod instruments;
pub mod models;
pub mod sensitivity;
