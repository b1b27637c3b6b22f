//! Black-76 pricing formulas for European options.
//!
//! All prices are **forward** prices: the numeraire (zero bond) is a plain
//! multiplication factor the caller applies, so forwards, strikes and prices
//! live in the same undiscounted space.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = F·N(d₁) - K·N(d₂)
//! **Put Price**: P = K·N(-d₂) - F·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(F/K) + σ²T/2) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! Degenerate limits are explicit branches: `σ√T → 0` collapses to intrinsic
//! value, an at-the-money forward takes the `ln(F/K) = 0` short form, and a
//! huge `σ√T` saturates the normal arguments instead of evaluating `∞ - ∞`.

use num_traits::Float;
use vol_core::math::distributions::{norm_cdf, norm_inv_cdf, norm_pdf};

use super::error::AnalyticalError;
use crate::instruments::OptionType;

/// Below this, `σ√T` is treated as exactly zero (intrinsic-value regime).
const SMALL: f64 = 1e-13;

/// Above this, `σ√T` (or a price input) is treated as saturated.
const LARGE: f64 = 1e13;

#[inline]
pub(crate) fn validate_market<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
) -> Result<(), AnalyticalError> {
    if !(forward > T::zero()) || !forward.is_finite() {
        return Err(AnalyticalError::InvalidForward {
            forward: forward.to_f64().unwrap_or(f64::NAN),
        });
    }
    if !(strike > T::zero()) || !strike.is_finite() {
        return Err(AnalyticalError::InvalidStrike {
            strike: strike.to_f64().unwrap_or(f64::NAN),
        });
    }
    if !(expiry >= T::zero()) || !expiry.is_finite() {
        return Err(AnalyticalError::InvalidExpiry {
            expiry: expiry.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(())
}

#[inline]
pub(crate) fn validate_volatility<T: Float>(volatility: T) -> Result<(), AnalyticalError> {
    if !(volatility >= T::zero()) || !volatility.is_finite() {
        return Err(AnalyticalError::InvalidVolatility {
            volatility: volatility.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(())
}

/// The d₁/d₂ pair, with the at-the-money and saturation guards applied.
#[inline]
fn d1_d2<T: Float>(forward: T, strike: T, sigma_root_t: T) -> (T, T) {
    let half = T::from(0.5).unwrap();
    let small = T::from(SMALL).unwrap();
    let large = T::from(LARGE).unwrap();

    if (forward - strike).abs() < small || sigma_root_t > large {
        let d1 = half * sigma_root_t;
        (d1, -d1)
    } else {
        let d1 = (forward / strike).ln() / sigma_root_t + half * sigma_root_t;
        (d1, d1 - sigma_root_t)
    }
}

/// Forward price of a European option under Black-76.
///
/// # Arguments
/// * `forward` - Forward of the underlying (must be positive)
/// * `strike` - Strike (must be positive)
/// * `expiry` - Time to expiry in years (non-negative)
/// * `volatility` - Lognormal volatility (non-negative)
/// * `option_type` - Call or put
///
/// # Edge policy
/// `σ√T` below 1e-13 prices at intrinsic value; `σ√T` above 1e13 saturates
/// to `F` (call) or `K` (put). The result is always non-negative and never
/// NaN for valid inputs.
///
/// # Errors
/// `AnalyticalError` for non-positive forward/strike or negative
/// expiry/volatility.
///
/// # Examples
/// ```
/// use vol_models::analytical::black;
/// use vol_models::instruments::OptionType;
///
/// let call = black::price(100.0_f64, 100.0, 1.0, 0.2, OptionType::Call).unwrap();
/// assert!((call - 7.965567455405804).abs() < 1e-10);
/// ```
pub fn price<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    volatility: T,
    option_type: OptionType,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(volatility)?;

    let zero = T::zero();
    let sign: T = option_type.sign();
    let sigma_root_t = volatility * expiry.sqrt();

    if sigma_root_t < T::from(SMALL).unwrap() {
        return Ok((sign * (forward - strike)).max(zero));
    }

    let (d1, d2) = d1_d2(forward, strike, sigma_root_t);
    let value = sign * (forward * norm_cdf(sign * d1) - strike * norm_cdf(sign * d2));
    Ok(value.max(zero))
}

/// Forward (driftless) delta: ∂price/∂F at fixed strike and volatility.
///
/// `N(d₁)` for a call, `N(d₁) - 1` for a put, so a call/put pair at the same
/// strike sums to the discount-free parity value.
///
/// At `σ√T = 0` the delta is the payoff indicator (0 or ±1); exactly
/// at-the-money with zero variance the value is ambiguous and the midpoint
/// ±0.5 is returned.
pub fn forward_delta<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    volatility: T,
    option_type: OptionType,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(volatility)?;

    let zero = T::zero();
    let one = T::one();
    let half = T::from(0.5).unwrap();
    let small = T::from(SMALL).unwrap();
    let sign: T = option_type.sign();
    let sigma_root_t = volatility * expiry.sqrt();

    if sigma_root_t > T::from(LARGE).unwrap() {
        return Ok(if option_type.is_call() { one } else { zero });
    }
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
        tracing::debug!("zero variance exactly at the money; delta is ambiguous");
        return Ok(sign * half);
    }

    let (d1, _) = d1_d2(forward, strike, sigma_root_t);
    Ok(sign * norm_cdf(sign * d1))
}

/// Dual delta: ∂price/∂K (first derivative of the forward price with
/// respect to strike), `-N(d₂)` for a call and `N(-d₂)` for a put.
pub fn dual_delta<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    volatility: T,
    option_type: OptionType,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(volatility)?;

    let zero = T::zero();
    let one = T::one();
    let half = T::from(0.5).unwrap();
    let small = T::from(SMALL).unwrap();
    let sign: T = option_type.sign();
    let sigma_root_t = volatility * expiry.sqrt();

    if sigma_root_t > T::from(LARGE).unwrap() {
        return Ok(if option_type.is_call() { zero } else { one });
    }
    if sigma_root_t < small {
        if (forward - strike).abs() >= small {
            return Ok(match option_type {
                OptionType::Call => {
                    if forward > strike {
                        -one
                    } else {
                        zero
                    }
                }
                OptionType::Put => {
                    if forward > strike {
                        zero
                    } else {
                        one
                    }
                }
            });
        }
        tracing::debug!("zero variance exactly at the money; dual delta is ambiguous");
        return Ok(-sign * half);
    }

    let (_, d2) = d1_d2(forward, strike, sigma_root_t);
    Ok(-sign * norm_cdf(sign * d2))
}

/// Forward gamma: ∂²price/∂F², identical for calls and puts.
///
/// Gamma = φ(d₁) / (F·σ√T)
pub fn gamma<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    volatility: T,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(volatility)?;

    let zero = T::zero();
    let small = T::from(SMALL).unwrap();
    let sigma_root_t = volatility * expiry.sqrt();

    if sigma_root_t < small || sigma_root_t > T::from(LARGE).unwrap() {
        return Ok(zero);
    }

    let (d1, _) = d1_d2(forward, strike, sigma_root_t);
    let density = norm_pdf(d1);
    if density == zero {
        return Ok(zero);
    }
    Ok(density / forward / sigma_root_t)
}

/// Vega: ∂price/∂σ, identical for calls and puts.
///
/// Vega = F·√T·φ(d₁)
///
/// Underflows to numerically zero far out of the money — the reason the
/// implied-volatility solvers carry a bisection fallback.
pub fn vega<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    volatility: T,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(volatility)?;

    let zero = T::zero();
    let small = T::from(SMALL).unwrap();
    let root_t = expiry.sqrt();
    let sigma_root_t = volatility * root_t;

    if sigma_root_t > T::from(LARGE).unwrap() {
        return Ok(zero);
    }
    if sigma_root_t < small {
        // Zero-variance vega survives only exactly at the money
        if (forward - strike).abs() >= small {
            return Ok(zero);
        }
        return Ok(forward * root_t * norm_pdf(zero));
    }

    let (d1, _) = d1_d2(forward, strike, sigma_root_t);
    Ok(forward * root_t * norm_pdf(d1))
}

/// Driftless theta: the time decay attributable to the optionality alone.
///
/// θ = -F·φ(d₁)·σ / (2√T)
pub fn driftless_theta<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    volatility: T,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(volatility)?;

    let zero = T::zero();
    let two = T::from(2.0).unwrap();
    let small = T::from(SMALL).unwrap();
    let root_t = expiry.sqrt();
    let sigma_root_t = volatility * root_t;

    if sigma_root_t < small || sigma_root_t > T::from(LARGE).unwrap() || root_t < small {
        return Ok(zero);
    }

    let (d1, _) = d1_d2(forward, strike, sigma_root_t);
    Ok(-forward * norm_pdf(d1) * volatility / (two * root_t))
}

/// Vomma (volga): ∂vega/∂σ = vega · d₁·d₂ / σ.
pub fn vomma<T: Float>(
    forward: T,
    strike: T,
    expiry: T,
    volatility: T,
) -> Result<T, AnalyticalError> {
    validate_market(forward, strike, expiry)?;
    validate_volatility(volatility)?;

    let zero = T::zero();
    let small = T::from(SMALL).unwrap();
    let root_t = expiry.sqrt();
    let sigma_root_t = volatility * root_t;

    if sigma_root_t < small || sigma_root_t > T::from(LARGE).unwrap() || volatility < small {
        return Ok(zero);
    }

    let (d1, d2) = d1_d2(forward, strike, sigma_root_t);
    Ok(forward * root_t * norm_pdf(d1) * d1 * d2 / volatility)
}

/// Strike recovered from a target forward delta, closed form.
///
/// Inverts `N(d₁) = δ` (call) or `N(d₁) - 1 = δ` (put) and solves the d₁
/// definition for the strike:
///
/// K = F · exp(σ²T/2 - σ√T · ω·N⁻¹(ω·δ)),  ω = +1 call / -1 put
///
/// Strike is strictly decreasing in delta for a call and strictly increasing
/// in (signed) delta for a put.
///
/// # Errors
/// `AnalyticalError::InvalidDelta` when the delta lies outside the open
/// interval for the option type: (0, 1) for a call, (-1, 0) for a put.
///
/// # Examples
/// ```
/// use vol_models::analytical::black;
/// use vol_models::instruments::OptionType;
///
/// // A 50-delta call strikes at the forward growth factor
/// let k = black::strike_for_delta(100.0_f64, 0.5, 1.0, 0.2, OptionType::Call).unwrap();
/// assert!((k - 100.0 * (0.5_f64 * 0.04).exp()).abs() < 1e-10);
/// ```
pub fn strike_for_delta<T: Float>(
    forward: T,
    forward_delta: T,
    expiry: T,
    volatility: T,
    option_type: OptionType,
) -> Result<T, AnalyticalError> {
    let zero = T::zero();
    let one = T::one();

    if !(forward > zero) || !forward.is_finite() {
        return Err(AnalyticalError::InvalidForward {
            forward: forward.to_f64().unwrap_or(f64::NAN),
        });
    }
    if !(expiry >= zero) || !expiry.is_finite() {
        return Err(AnalyticalError::InvalidExpiry {
            expiry: expiry.to_f64().unwrap_or(f64::NAN),
        });
    }
    validate_volatility(volatility)?;

    let in_range = match option_type {
        OptionType::Call => forward_delta > zero && forward_delta < one,
        OptionType::Put => forward_delta > -one && forward_delta < zero,
    };
    if !in_range {
        return Err(AnalyticalError::InvalidDelta {
            delta: forward_delta.to_f64().unwrap_or(f64::NAN),
            option_kind: if option_type.is_call() { "call" } else { "put" },
        });
    }

    let half = T::from(0.5).unwrap();
    let omega: T = option_type.sign();
    let root_t = expiry.sqrt();
    let d1 = norm_inv_cdf(omega * forward_delta);
    Ok(forward * (half * volatility * volatility * expiry - volatility * root_t * omega * d1).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const F: f64 = 100.0;
    const T1: f64 = 1.0;
    const SIGMA: f64 = 0.2;

    // ==========================================================
    // Price tests
    // ==========================================================

    #[test]
    fn test_atm_call_reference_value() {
        // F = K = 100, sigma = 0.2, T = 1: C = F * (2 * N(0.1) - 1)
        let call = price(F, 100.0, T1, SIGMA, OptionType::Call).unwrap();
        assert_relative_eq!(call, 7.965567455405804, epsilon = 1e-10);
    }

    #[test]
    fn test_atm_put_call_parity_exact() {
        let call = price(F, 100.0, T1, SIGMA, OptionType::Call).unwrap();
        let put = price(F, 100.0, T1, SIGMA, OptionType::Put).unwrap();
        assert_abs_diff_eq!(call, put, epsilon = 1e-12);
    }

    #[test]
    fn test_put_call_parity_across_strikes() {
        // C - P = F - K in forward space
        for k in [50.0, 80.0, 100.0, 120.0, 150.0] {
            let call = price(F, k, T1, SIGMA, OptionType::Call).unwrap();
            let put = price(F, k, T1, SIGMA, OptionType::Put).unwrap();
            assert_abs_diff_eq!(call - put, F - k, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_price_bounds_invariant() {
        // intrinsic <= call <= F and intrinsic <= put <= K
        for k in [50.0, 90.0, 100.0, 110.0, 200.0] {
            for t in [0.1, 1.0, 10.0] {
                for sigma in [0.05, 0.2, 0.8] {
                    let call = price(F, k, t, sigma, OptionType::Call).unwrap();
                    assert!(call >= (F - k).max(0.0) - 1e-12);
                    assert!(call <= F);
                    let put = price(F, k, t, sigma, OptionType::Put).unwrap();
                    assert!(put >= (k - F).max(0.0) - 1e-12);
                    assert!(put <= k);
                }
            }
        }
    }

    #[test]
    fn test_zero_expiry_is_intrinsic() {
        assert_abs_diff_eq!(
            price(110.0, 100.0, 0.0, SIGMA, OptionType::Call).unwrap(),
            10.0,
            epsilon = 1e-12
        );
        assert_eq!(price(90.0, 100.0, 0.0, SIGMA, OptionType::Call).unwrap(), 0.0);
        assert_abs_diff_eq!(
            price(90.0, 100.0, 0.0, SIGMA, OptionType::Put).unwrap(),
            10.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_volatility_is_intrinsic() {
        assert_abs_diff_eq!(
            price(110.0, 100.0, T1, 0.0, OptionType::Call).unwrap(),
            10.0,
            epsilon = 1e-12
        );
        assert_eq!(price(90.0, 100.0, T1, 0.0, OptionType::Call).unwrap(), 0.0);
    }

    #[test]
    fn test_huge_variance_saturates() {
        let call = price(F, 100.0, 1e30, 1.0, OptionType::Call).unwrap();
        assert_relative_eq!(call, F, epsilon = 1e-9);
        let put = price(F, 80.0, 1e30, 1.0, OptionType::Put).unwrap();
        assert_relative_eq!(put, 80.0, epsilon = 1e-9);
    }

    #[test]
    fn test_deep_tail_price_positive_and_tiny() {
        // ~29 standard deviations out: the price must stay positive (no
        // underflow to zero) and far below any representable premium
        let k = F * (29.0 * SIGMA + 0.5 * SIGMA * SIGMA).exp();
        let call = price(F, k, T1, SIGMA, OptionType::Call).unwrap();
        assert!(call > 0.0);
        assert!(call < 1e-150);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(matches!(
            price(-1.0, 100.0, T1, SIGMA, OptionType::Call),
            Err(AnalyticalError::InvalidForward { .. })
        ));
        assert!(matches!(
            price(F, 0.0, T1, SIGMA, OptionType::Call),
            Err(AnalyticalError::InvalidStrike { .. })
        ));
        assert!(matches!(
            price(F, 100.0, -1.0, SIGMA, OptionType::Call),
            Err(AnalyticalError::InvalidExpiry { .. })
        ));
        assert!(matches!(
            price(F, 100.0, T1, -0.2, OptionType::Call),
            Err(AnalyticalError::InvalidVolatility { .. })
        ));
        assert!(matches!(
            price(f64::NAN, 100.0, T1, SIGMA, OptionType::Call),
            Err(AnalyticalError::InvalidForward { .. })
        ));
    }

    // ==========================================================
    // Delta tests
    // ==========================================================

    #[test]
    fn test_delta_call_put_pair_parity() {
        // Put delta = call delta - 1 at the same strike
        for k in [80.0, 100.0, 125.0] {
            let dc = forward_delta(F, k, T1, SIGMA, OptionType::Call).unwrap();
            let dp = forward_delta(F, k, T1, SIGMA, OptionType::Put).unwrap();
            assert_abs_diff_eq!(dp, dc - 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_delta_sums_to_zero_at_atm_forward_strike() {
        // K = F exp(sigma^2 T / 2) makes d1 = 0, so call and put deltas
        // are exactly +-0.5
        let k = F * (0.5 * SIGMA * SIGMA * T1).exp();
        let dc = forward_delta(F, k, T1, SIGMA, OptionType::Call).unwrap();
        let dp = forward_delta(F, k, T1, SIGMA, OptionType::Put).unwrap();
        assert_abs_diff_eq!(dc + dp, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dc, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_delta_bounds() {
        for k in [60.0, 90.0, 100.0, 140.0] {
            let dc = forward_delta(F, k, T1, SIGMA, OptionType::Call).unwrap();
            assert!((0.0..=1.0).contains(&dc));
            let dp = forward_delta(F, k, T1, SIGMA, OptionType::Put).unwrap();
            assert!((-1.0..=0.0).contains(&dp));
        }
    }

    #[test]
    fn test_delta_zero_variance_step() {
        assert_eq!(
            forward_delta(110.0, 100.0, T1, 0.0, OptionType::Call).unwrap(),
            1.0
        );
        assert_eq!(
            forward_delta(90.0, 100.0, T1, 0.0, OptionType::Call).unwrap(),
            0.0
        );
        assert_eq!(
            forward_delta(90.0, 100.0, T1, 0.0, OptionType::Put).unwrap(),
            -1.0
        );
        // Ambiguous ATM zero-variance midpoint
        assert_eq!(
            forward_delta(100.0, 100.0, T1, 0.0, OptionType::Call).unwrap(),
            0.5
        );
    }

    #[test]
    fn test_delta_vs_finite_diff() {
        let h = 1e-4;
        for (k, ot) in [(90.0, OptionType::Call), (115.0, OptionType::Put)] {
            let up = price(F + h, k, T1, SIGMA, ot).unwrap();
            let dn = price(F - h, k, T1, SIGMA, ot).unwrap();
            let fd = (up - dn) / (2.0 * h);
            let analytic = forward_delta(F, k, T1, SIGMA, ot).unwrap();
            assert_abs_diff_eq!(analytic, fd, epsilon = 1e-7);
        }
    }

    // ==========================================================
    // Other Greeks vs finite differences
    // ==========================================================

    #[test]
    fn test_dual_delta_vs_finite_diff() {
        let h = 1e-4;
        for (k, ot) in [(95.0, OptionType::Call), (105.0, OptionType::Put)] {
            let up = price(F, k + h, T1, SIGMA, ot).unwrap();
            let dn = price(F, k - h, T1, SIGMA, ot).unwrap();
            let fd = (up - dn) / (2.0 * h);
            let analytic = dual_delta(F, k, T1, SIGMA, ot).unwrap();
            assert_abs_diff_eq!(analytic, fd, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_gamma_vs_finite_diff() {
        let h = 1e-3;
        let up = price(F + h, 105.0, T1, SIGMA, OptionType::Call).unwrap();
        let mid = price(F, 105.0, T1, SIGMA, OptionType::Call).unwrap();
        let dn = price(F - h, 105.0, T1, SIGMA, OptionType::Call).unwrap();
        let fd = (up - 2.0 * mid + dn) / (h * h);
        let analytic = gamma(F, 105.0, T1, SIGMA).unwrap();
        assert_relative_eq!(analytic, fd, max_relative = 1e-5);
    }

    #[test]
    fn test_vega_vs_finite_diff() {
        let h = 1e-6;
        for k in [85.0, 100.0, 120.0] {
            let up = price(F, k, T1, SIGMA + h, OptionType::Call).unwrap();
            let dn = price(F, k, T1, SIGMA - h, OptionType::Call).unwrap();
            let fd = (up - dn) / (2.0 * h);
            let analytic = vega(F, k, T1, SIGMA).unwrap();
            assert_relative_eq!(analytic, fd, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_vega_same_for_call_and_put() {
        // Vega has no option-type argument; parity keeps it shared
        let v = vega(F, 110.0, T1, SIGMA).unwrap();
        let h = 1e-6;
        let put_fd = (price(F, 110.0, T1, SIGMA + h, OptionType::Put).unwrap()
            - price(F, 110.0, T1, SIGMA - h, OptionType::Put).unwrap())
            / (2.0 * h);
        assert_relative_eq!(v, put_fd, max_relative = 1e-6);
    }

    #[test]
    fn test_vega_underflows_deep_otm() {
        let k = F * (40.0 * SIGMA).exp();
        let v = vega(F, k, T1, SIGMA).unwrap();
        assert!(v < 1e-200);
    }

    #[test]
    fn test_driftless_theta_vs_finite_diff() {
        let h = 1e-6;
        let up = price(F, 105.0, T1 + h, SIGMA, OptionType::Call).unwrap();
        let dn = price(F, 105.0, T1 - h, SIGMA, OptionType::Call).unwrap();
        // Theta is the decay as time passes: -dV/dT
        let fd = -(up - dn) / (2.0 * h);
        let analytic = driftless_theta(F, 105.0, T1, SIGMA).unwrap();
        assert_relative_eq!(analytic, fd, max_relative = 1e-5);
    }

    #[test]
    fn test_vomma_vs_finite_diff() {
        let h = 1e-5;
        let up = vega(F, 130.0, T1, SIGMA + h).unwrap();
        let dn = vega(F, 130.0, T1, SIGMA - h).unwrap();
        let fd = (up - dn) / (2.0 * h);
        let analytic = vomma(F, 130.0, T1, SIGMA).unwrap();
        assert_relative_eq!(analytic, fd, max_relative = 1e-4);
    }

    // ==========================================================
    // Strike from delta (closed form)
    // ==========================================================

    #[test]
    fn test_strike_for_delta_half_is_atm_forward() {
        let k_call = strike_for_delta(F, 0.5, T1, SIGMA, OptionType::Call).unwrap();
        let k_put = strike_for_delta(F, -0.5, T1, SIGMA, OptionType::Put).unwrap();
        let atm_forward = F * (0.5 * SIGMA * SIGMA * T1).exp();
        assert_relative_eq!(k_call, atm_forward, epsilon = 1e-12);
        assert_relative_eq!(k_call, k_put, epsilon = 1e-12);
    }

    #[test]
    fn test_strike_for_delta_complementary_pair() {
        // A delta-x call and a delta-(x-1) put share d1, hence the strike
        for delta in [0.1, 0.25, 0.5, 0.75, 0.9] {
            let k_call = strike_for_delta(F, delta, T1, SIGMA, OptionType::Call).unwrap();
            let k_put = strike_for_delta(F, delta - 1.0, T1, SIGMA, OptionType::Put).unwrap();
            assert_relative_eq!(k_call, k_put, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_strike_for_delta_geometric_symmetry() {
        // Matched magnitudes are geometric-mean symmetric about the
        // ATM-forward strike
        let atm_forward = F * (0.5 * SIGMA * SIGMA * T1).exp();
        for delta in [0.1, 0.25, 0.4] {
            let k_call = strike_for_delta(F, delta, T1, SIGMA, OptionType::Call).unwrap();
            let k_put = strike_for_delta(F, -delta, T1, SIGMA, OptionType::Put).unwrap();
            assert_relative_eq!(
                (k_call * k_put).sqrt(),
                atm_forward,
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn test_strike_decreases_as_call_delta_increases() {
        let deltas: Vec<f64> = (1..=9).map(|i| i as f64 / 10.0).collect();
        let strikes: Vec<f64> = deltas
            .iter()
            .map(|&d| strike_for_delta(F, d, T1, SIGMA, OptionType::Call).unwrap())
            .collect();
        for w in strikes.windows(2) {
            assert!(w[1] < w[0], "strike not strictly decreasing: {:?}", strikes);
        }
    }

    #[test]
    fn test_strike_round_trips_through_delta() {
        for delta in [0.15, 0.5, 0.85] {
            let k = strike_for_delta(F, delta, T1, SIGMA, OptionType::Call).unwrap();
            let recovered = forward_delta(F, k, T1, SIGMA, OptionType::Call).unwrap();
            assert_abs_diff_eq!(recovered, delta, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_strike_for_delta_range_validation() {
        assert!(matches!(
            strike_for_delta(F, 0.0, T1, SIGMA, OptionType::Call),
            Err(AnalyticalError::InvalidDelta { .. })
        ));
        assert!(matches!(
            strike_for_delta(F, 1.0, T1, SIGMA, OptionType::Call),
            Err(AnalyticalError::InvalidDelta { .. })
        ));
        // Sign incompatible with the option type
        assert!(matches!(
            strike_for_delta(F, -0.25, T1, SIGMA, OptionType::Call),
            Err(AnalyticalError::InvalidDelta { .. })
        ));
        assert!(matches!(
            strike_for_delta(F, 0.25, T1, SIGMA, OptionType::Put),
            Err(AnalyticalError::InvalidDelta { .. })
        ));
        assert!(matches!(
            strike_for_delta(-100.0, 0.25, T1, SIGMA, OptionType::Call),
            Err(AnalyticalError::InvalidForward { .. })
        ));
    }

    // ==========================================================
    // f32 compatibility
    // ==========================================================

    #[test]
    fn test_f32_compatibility() {
        let call = price(100.0_f32, 100.0, 1.0, 0.2, OptionType::Call).unwrap();
        assert!((call - 7.9655674).abs() < 1e-3);
    }
}
