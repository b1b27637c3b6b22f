//! SABR volatility function (Hagan asymptotic expansion).
//!
//! The SABR model is the stochastic-volatility model
//!
//! ```text
//! dF = alpha * F^beta * dW_F
//! d(alpha) = nu * alpha * dW_alpha
//! E[dW_F * dW_alpha] = rho * dt
//! ```
//!
//! This module evaluates the Hagan et al. (2002) approximation mapping
//! (strike, forward, expiry, parameters) to an effective **lognormal**
//! volatility, which feeds the Black pricer. It is a deterministic closed
//! form with no iterative component — evaluation, not calibration.
//!
//! Reference: Hagan, Kumar, Lesniewski & Woodward, "Managing smile risk",
//! Wilmott Magazine, September 2002.

use num_traits::Float;
use thiserror::Error;
use vol_core::types::PricingError;

/// Strikes below `forward * CUTOFF_MONEYNESS` are floored to the cutoff.
const CUTOFF_MONEYNESS: f64 = 1e-12;
/// |z| below this uses the first-order z/χ(z) expansion.
const SMALL_Z: f64 = 1e-6;
/// Large-|z| asymptotic switch points for the χ argument.
const LARGE_NEG_Z: f64 = -1e6;
const LARGE_POS_Z: f64 = 1e8;
/// Beta within this of 0 or 1 takes the specialised reduction.
const BETA_EPS: f64 = 1e-8;
/// rho within this of +1 (resp. -1) takes the degenerate-correlation limit.
const RHO_EPS: f64 = 1e-5;
const RHO_EPS_NEGATIVE: f64 = 1e-8;
/// |F - K| below this evaluates the dedicated ATM closed form.
const ATM_EPS: f64 = 1e-7;

/// SABR model errors.
///
/// # Examples
/// ```
/// use vol_models::models::sabr::SabrError;
///
/// let err = SabrError::InvalidAlpha(-0.1);
/// assert!(format!("{}", err).contains("-0.1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SabrError {
    /// Initial volatility must be strictly positive.
    #[error("Invalid alpha: {0} (positive value required)")]
    InvalidAlpha(f64),

    /// CEV exponent must lie in [0, 1].
    #[error("Invalid beta: {0} (range [0, 1] required)")]
    InvalidBeta(f64),

    /// Correlation must lie in the open interval (-1, 1).
    #[error("Invalid rho: {0} (open interval (-1, 1) required)")]
    InvalidRho(f64),

    /// Vol-of-vol must be non-negative.
    #[error("Invalid nu: {0} (non-negative value required)")]
    InvalidNu(f64),

    /// Forward must be strictly positive (forward^beta with beta < 1).
    #[error("Invalid forward: F = {0} (positive value required)")]
    InvalidForward(f64),

    /// Strike must be strictly positive.
    #[error("Invalid strike: K = {0} (positive value required)")]
    InvalidStrike(f64),

    /// Expiry must be non-negative.
    #[error("Invalid expiry: T = {0} (non-negative value required)")]
    InvalidExpiry(f64),

    /// The expansion produced a non-positive volatility. The second-order
    /// time correction is not sign-protected and can push the result
    /// negative for extreme parameter combinations.
    #[error("Non-positive volatility {vol} at strike {strike}")]
    NonPositiveVolatility {
        /// The computed volatility value
        vol: f64,
        /// The strike at which it occurred
        strike: f64,
    },

    /// NaN or infinity encountered during evaluation.
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),
}

impl From<SabrError> for PricingError {
    fn from(err: SabrError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

/// Validated SABR parameters.
///
/// # Fields (enforced by [`new`](Self::new))
/// * `alpha` - initial volatility, > 0
/// * `beta` - CEV exponent, in [0, 1] (0 = normal, 1 = lognormal)
/// * `rho` - forward/vol correlation, in (-1, 1)
/// * `nu` - vol-of-vol, >= 0
///
/// # Examples
/// ```
/// use vol_models::models::sabr::SabrParams;
///
/// let params = SabrParams::new(0.2_f64, 0.5, -0.3, 0.4);
/// assert!(params.is_ok());
///
/// // rho = 1 is outside the open interval
/// assert!(SabrParams::new(0.2_f64, 0.5, 1.0, 0.4).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SabrParams<T: Float> {
    alpha: T,
    beta: T,
    rho: T,
    nu: T,
}

impl<T: Float> SabrParams<T> {
    /// Creates validated parameters.
    ///
    /// # Errors
    /// One `SabrError` variant per violated constraint; the parameters are
    /// never silently clamped into range.
    pub fn new(alpha: T, beta: T, rho: T, nu: T) -> Result<Self, SabrError> {
        let zero = T::zero();
        let one = T::one();

        if !(alpha > zero) || !alpha.is_finite() {
            return Err(SabrError::InvalidAlpha(alpha.to_f64().unwrap_or(f64::NAN)));
        }
        if beta < zero || beta > one || !beta.is_finite() {
            return Err(SabrError::InvalidBeta(beta.to_f64().unwrap_or(f64::NAN)));
        }
        if !(rho > -one && rho < one) {
            return Err(SabrError::InvalidRho(rho.to_f64().unwrap_or(f64::NAN)));
        }
        if !(nu >= zero) || !nu.is_finite() {
            return Err(SabrError::InvalidNu(nu.to_f64().unwrap_or(f64::NAN)));
        }

        Ok(Self {
            alpha,
            beta,
            rho,
            nu,
        })
    }

    /// Returns alpha (initial volatility).
    #[inline]
    pub fn alpha(&self) -> T {
        self.alpha
    }

    /// Returns beta (CEV exponent).
    #[inline]
    pub fn beta(&self) -> T {
        self.beta
    }

    /// Returns rho (correlation).
    #[inline]
    pub fn rho(&self) -> T {
        self.rho
    }

    /// Returns nu (vol-of-vol).
    #[inline]
    pub fn nu(&self) -> T {
        self.nu
    }
}

/// Effective lognormal (Black) volatility for a strike under SABR.
///
/// Evaluates the Hagan expansion with its full branch structure:
/// - a dedicated closed form when |F - K| < 1e-7, avoiding the removable
///   singularity of the general formula at the money;
/// - specialised reductions at beta = 0 and beta = 1;
/// - the general `(F·K)^((1-β)/2)` formula otherwise, with the z/χ(z)
///   coefficient evaluated through guarded limits.
///
/// Strikes below `forward * 1e-12` are floored to the cutoff (logged), the
/// original production behaviour for barely-positive quotes.
///
/// # Errors
/// `InvalidForward` / `InvalidStrike` / `InvalidExpiry` on non-positive
/// forward or strike or negative expiry; `NonPositiveVolatility` /
/// `NonFinite` when the expansion leaves the model's admissible range.
///
/// # Examples
/// ```
/// use vol_models::models::sabr::{lognormal_volatility, SabrParams};
///
/// let params = SabrParams::new(0.2_f64, 0.5, -0.3, 0.4).unwrap();
/// let atm = lognormal_volatility(100.0, 100.0, 1.0, &params).unwrap();
/// assert!(atm > 0.0);
///
/// // A smile: wings sit above the money
/// let wing = lognormal_volatility(140.0, 100.0, 1.0, &params).unwrap();
/// assert!(wing.is_finite());
/// ```
pub fn lognormal_volatility<T: Float>(
    strike: T,
    forward: T,
    expiry: T,
    params: &SabrParams<T>,
) -> Result<T, SabrError> {
    let zero = T::zero();
    let one = T::one();

    if !(forward > zero) || !forward.is_finite() {
        return Err(SabrError::InvalidForward(
            forward.to_f64().unwrap_or(f64::NAN),
        ));
    }
    if !(strike > zero) || !strike.is_finite() {
        return Err(SabrError::InvalidStrike(strike.to_f64().unwrap_or(f64::NAN)));
    }
    if !(expiry >= zero) || !expiry.is_finite() {
        return Err(SabrError::InvalidExpiry(expiry.to_f64().unwrap_or(f64::NAN)));
    }

    let alpha = params.alpha;
    let beta = params.beta;
    let rho = params.rho;
    let nu = params.nu;

    let cutoff = forward * T::from(CUTOFF_MONEYNESS).unwrap();
    let k = if strike < cutoff {
        tracing::warn!(
            strike = strike.to_f64().unwrap_or(f64::NAN),
            cutoff = cutoff.to_f64().unwrap_or(f64::NAN),
            "strike below cutoff moneyness; flooring to cutoff"
        );
        cutoff
    } else {
        strike
    };

    let two = T::from(2.0).unwrap();
    let three = T::from(3.0).unwrap();
    let four = T::from(4.0).unwrap();
    let twenty_four = T::from(24.0).unwrap();
    let beta1 = one - beta;

    let vol = if (forward - k).abs() < T::from(ATM_EPS).unwrap() {
        // ATM closed form: sigma = alpha/F^(1-b) * [1 + T*(...)]
        let f1 = forward.powf(beta1);
        alpha
            * (one
                + expiry
                    * (beta1 * beta1 * alpha * alpha / twenty_four / f1 / f1
                        + rho * alpha * beta * nu / four / f1
                        + nu * nu * (two - three * rho * rho) / twenty_four))
            / f1
    } else if beta.abs() < T::from(BETA_EPS).unwrap() {
        // Normal SABR (beta = 0)
        let ln = (forward / k).ln();
        let z = nu * (forward * k).sqrt() * ln / alpha;
        let z_over_chi = z_over_chi(rho, z);
        alpha * ln * z_over_chi
            * (one
                + expiry * (alpha * alpha / forward / k + nu * nu * (two - three * rho * rho))
                    / twenty_four)
            / (forward - k)
    } else if (beta - one).abs() < T::from(BETA_EPS).unwrap() {
        // Lognormal SABR (beta = 1)
        let ln = (forward / k).ln();
        let z = nu * ln / alpha;
        let z_over_chi = z_over_chi(rho, z);
        alpha
            * z_over_chi
            * (one + expiry * (rho * alpha * nu / four + nu * nu * (two - three * rho * rho) / twenty_four))
    } else {
        // General Hagan formula
        let ln = (forward / k).ln();
        let f1 = (forward * k).powf(beta1);
        let f1_sqrt = f1.sqrt();
        let ln_beta_sq = (beta1 * ln) * (beta1 * ln);
        let z = nu * f1_sqrt * ln / alpha;
        let z_over_chi = z_over_chi(rho, z);
        let first = alpha
            / (f1_sqrt
                * (one
                    + ln_beta_sq / twenty_four
                    + ln_beta_sq * ln_beta_sq / T::from(1920.0).unwrap()));
        let third = one
            + expiry
                * (beta1 * beta1 * alpha * alpha / twenty_four / f1
                    + rho * nu * beta * alpha / four / f1_sqrt
                    + nu * nu * (two - three * rho * rho) / twenty_four);
        first * z_over_chi * third
    };

    if !vol.is_finite() {
        return Err(SabrError::NonFinite("lognormal_volatility"));
    }
    if vol <= zero {
        return Err(SabrError::NonPositiveVolatility {
            vol: vol.to_f64().unwrap_or(f64::NAN),
            strike: strike.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(vol)
}

/// The z/χ(z) coefficient, χ(z) = ln((√(1-2ρz+z²) + z - ρ)/(1-ρ)).
///
/// Direct evaluation is 0/0 near the money and cancels catastrophically for
/// extreme z or |ρ| → 1; each regime gets its own limit.
fn z_over_chi<T: Float>(rho: T, z: T) -> T {
    let zero = T::zero();
    let one = T::one();
    let two = T::from(2.0).unwrap();
    let half = T::from(0.5).unwrap();

    // First-order expansion around z = 0 avoids 0/0 at the money.
    if z.abs() < T::from(SMALL_Z).unwrap() {
        return one - rho * z / two;
    }

    let rho_star = one - rho;
    if rho_star.abs() < T::from(RHO_EPS).unwrap() {
        return if z > one {
            if rho_star == zero {
                zero
            } else {
                z / ((two * (z - one)).ln() - rho_star.ln())
            }
        } else if z < one {
            let w = z / (z - one);
            z / (-(one - z).ln() - half * w * w * rho_star)
        } else {
            zero
        };
    }

    let rho_hat = one + rho;
    if rho_hat.abs() < T::from(RHO_EPS_NEGATIVE).unwrap() {
        return if z > -one {
            z / (one + z).ln()
        } else if z < -one {
            if rho_hat == zero {
                zero
            } else {
                z / (rho_hat.ln() - (-(one + z) / rho_star).ln())
            }
        } else {
            zero
        };
    }

    let arg = if z < T::from(LARGE_NEG_Z).unwrap() {
        // Finely balanced cancellation for very large negative z
        (rho * rho - one) / two / z
    } else if z > T::from(LARGE_POS_Z).unwrap() {
        two * (z - rho)
    } else {
        let a = (one - two * rho * z + z * z).sqrt() + z - rho;
        // Mathematically non-negative; rounding can still push it under
        if a <= zero {
            return zero;
        }
        a
    };

    z / (arg.ln() - rho_star.ln())
}
