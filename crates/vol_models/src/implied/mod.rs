//! Price → volatility and delta → strike inversion.
//!
//! The numerically delicate half of the library. Naive Newton iteration on
//! the pricing formulas diverges or stalls far out of the money, where
//! prices span hundreds of orders of magnitude and vega underflows to
//! numerically zero; every solver here therefore combines an analytic seed,
//! safeguarded Newton steps clamped into a maintained bracket, and a
//! bisection fallback (the shared machinery in
//! [`vol_core::math::solvers`]).
//!
//! - [`black_implied_volatility`] / [`normal_implied_volatility`]: invert a
//!   forward option price into a Black / Bachelier volatility.
//! - [`convert`]: analytic Black ↔ Normal volatility bridges, used as solver
//!   seeds and as standalone approximations.
//! - [`strike_for_delta_root_find`]: derivative-free strike-from-delta
//!   inversion, the validation oracle for the closed form in
//!   [`crate::analytical::black::strike_for_delta`].

pub mod bachelier;
pub mod black;
pub mod convert;
pub mod strike;

pub use bachelier::normal_implied_volatility;
pub use black::black_implied_volatility;
pub use convert::{black_vol_from_normal, normal_vol_from_black};
pub use strike::strike_for_delta_root_find;
