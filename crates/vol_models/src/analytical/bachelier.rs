//! Bachelier (normal) pricing formulas for European options.
//!
//! Prices under arithmetic dynamics, with the volatility quoted in price
//! units rather than relative units.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = (F - K)·N(d) + σ√T·φ(d)
//! **Put Price**: P = (K - F)·N(-d) + σ√T·φ(d)
//!
//! Where d = (F - K) / (σ√T).
//!
//! Serves both as a standalone model and as the analytic bridge target for
//! the Black↔Normal volatility approximations in [`crate::implied::convert`].

use num_traits::Float;
use vol_core::math::distributions::{norm_cdf, norm_pdf};

use super::black::{validate_market, validate_volatility};
use super::error::AnalyticalError;
use crate::instruments::OptionType;

/// Below this, `σ√T` is treated as exactly zero (intrinsic-value regime).
const SMALL: f64 = 1e-13;

/// Forward price of a European option under Bachelier dynamics.
///
/// # Edge policy
/// `σ√T` below 1e-13 prices at intrinsic value. The result is non-negative
/// and never NaN for valid inputs.
///
/// # Examples
/// ```
/// use vol_models::analytical::bachelier;
/// use vol_models::instruments::OptionType;
///
/// // ATM: price = sigma * sqrt(T / (2 pi))
/// let atm = bachelier::price(100.0_f64, 100.0, 1.0, 15.0, OptionType::Call).unwrap();
/// assert!((atm - 15.0 / (2.0 * std::f64::consts::PI).sqrt()).abs() < 1e-12);
/// ```
pub fn price<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    normal_volatility: T,
    option_type: OptionType,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(normal_volatility)?;

    let zero = T::zero();
    let sign: T = option_type.sign();
    let sigma_root_t = normal_volatility * expiry.sqrt();

    if sigma_root_t < T::from(SMALL).unwrap() {
        return Ok((sign * (forward - strike)).max(zero));
    }

    let d = (forward - strike) / sigma_root_t;
    let value = sign * (forward - strike) * norm_cdf(sign * d) + sigma_root_t * norm_pdf(d);
    Ok(value.max(zero))
}

/// Forward delta under Bachelier dynamics: `N(d)` call, `N(d) - 1` put.
pub fn forward_delta<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    normal_volatility: T,
    option_type: OptionType,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(normal_volatility)?;

    let zero = T::zero();
    let one = T::one();
    let half = T::from(0.5).unwrap();
    let small = T::from(SMALL).unwrap();
    let sign: T = option_type.sign();
    let sigma_root_t = normal_volatility * expiry.sqrt();

    if sigma_root_t < small {
        if (forward - strike).abs() >= small {
            return Ok(match option_type {
                OptionType::Call => {
                    if forward > strike {
                        one
                    } else {
                        zero
                    }
                }
                OptionType::Put => {
                    if forward > strike {
                        zero
                    } else {
                        -one
                    }
                }
            });
        }
        return Ok(sign * half);
    }

    let d = (forward - strike) / sigma_root_t;
    Ok(sign * norm_cdf(sign * d))
}

/// Normal vega: ∂price/∂σ_N = √T·φ(d), identical for calls and puts.
pub fn vega<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    normal_volatility: T,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(normal_volatility)?;

    let zero = T::zero();
    let small = T::from(SMALL).unwrap();
    let root_t = expiry.sqrt();
    let sigma_root_t = normal_volatility * root_t;

    if sigma_root_t < small {
        if (forward - strike).abs() >= small {
            return Ok(zero);
        }
        return Ok(root_t * norm_pdf(zero));
    }

    let d = (forward - strike) / sigma_root_t;
    Ok(root_t * norm_pdf(d))
}

/// Forward gamma under Bachelier dynamics: φ(d) / (σ√T).
pub fn gamma<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    normal_volatility: T,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(normal_volatility)?;

    let zero = T::zero();
    let sigma_root_t = normal_volatility * expiry.sqrt();

    if sigma_root_t < T::from(SMALL).unwrap() {
        return Ok(zero);
    }

    let d = (forward - strike) / sigma_root_t;
    Ok(norm_pdf(d) / sigma_root_t)
}
