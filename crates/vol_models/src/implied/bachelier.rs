//! Normal (Bachelier) implied volatility.

use num_traits::Float;
use vol_core::math::solvers::{SafeguardedNewtonSolver, SolverConfig};
use vol_core::types::PricingError;

use crate::analytical::{bachelier, black};
use crate::instruments::OptionType;

fn solver_config<T: Float>() -> SolverConfig<T> {
    SolverConfig::new(T::from(1e-12).unwrap(), T::from(1e-9).unwrap(), 100)
}

/// Cap on geometric bracket-expansion rounds.
const MAX_BRACKET_EXPANSIONS: usize = 120;

/// Normal (Bachelier) implied volatility of a European option.
///
/// Same contract shape as
/// [`black_implied_volatility`](super::black_implied_volatility), for the
/// Bachelier model. The normal price function is monotonic and smoother in
/// volatility — no lognormal blow-up — so a single safeguarded Newton pass
/// from a closed-form seed (the inverted at-the-money Bachelier price,
/// straddle-adjusted off the money) is sufficient, with the bisection
/// fallback still guarding the deep wings.
///
/// The quoted volatility is in price units; there is no upper no-arbitrage
/// price bound beyond finiteness, since the normal price is unbounded in σ.
///
/// # Errors
/// - [`PricingError::InvalidInput`] for non-positive forward/strike,
///   negative expiry or a non-finite price;
/// - [`PricingError::ArbitrageViolation`] for a price below intrinsic
///   value, or carrying time value at zero expiry;
/// - [`PricingError::SolverDivergence`] on budget exhaustion.
///
/// # Examples
/// ```
/// use vol_models::analytical::bachelier;
/// use vol_models::implied::normal_implied_volatility;
/// use vol_models::instruments::OptionType;
///
/// let price = bachelier::price(100.0_f64, 105.0, 1.0, 12.0, OptionType::Call).unwrap();
/// let vol = normal_implied_volatility(price, 100.0, 105.0, 1.0, OptionType::Call).unwrap();
/// assert!((vol - 12.0).abs() < 1e-8);
/// ```
pub fn normal_implied_volatility<T: Float>(
    price: T,
    forward: T,
    strike: T,
    expiry: T,
    option_type: OptionType,
) -> Result<T, PricingError> {
    let zero = T::zero();
    let two = T::from(2.0).unwrap();

    black::validate_market(forward, strike, expiry)?;
    if !price.is_finite() {
        return Err(PricingError::InvalidInput(format!(
            "non-finite price: {}",
            price.to_f64().unwrap_or(f64::NAN)
        )));
    }

    let sign: T = option_type.sign();
    let intrinsic = (sign * (forward - strike)).max(zero);

    if price < intrinsic {
        return Err(PricingError::ArbitrageViolation(format!(
            "price {} below intrinsic value {}",
            price.to_f64().unwrap_or(f64::NAN),
            intrinsic.to_f64().unwrap_or(f64::NAN)
        )));
    }

    let otm_price = price - intrinsic;
    if otm_price == zero {
        return Ok(zero);
    }
    if expiry == zero {
        return Err(PricingError::ArbitrageViolation(format!(
            "time value {} with zero time to expiry",
            otm_price.to_f64().unwrap_or(f64::NAN)
        )));
    }
    let otm_type = if strike >= forward {
        OptionType::Call
    } else {
        OptionType::Put
    };

    // Inverted ATM Bachelier price sigma = p sqrt(2 pi / T), with the
    // straddle half-width restoring the scale away from the money.
    let two_pi = T::from(2.0 * std::f64::consts::PI).unwrap();
    let half = T::from(0.5).unwrap();
    let seed = (two_pi / expiry).sqrt() * (otm_price + half * (forward - strike).abs());

    let target = otm_price;
    let ln_target = target.ln();
    let underflow_floor = T::from(-1e10).unwrap();
    let residual = |sigma: T| match bachelier::price(forward, strike, expiry, sigma, otm_type) {
        Ok(p) if p > zero => p.ln() - ln_target,
        Ok(_) => underflow_floor,
        Err(_) => T::nan(),
    };
    let slope = |sigma: T| {
        let p = bachelier::price(forward, strike, expiry, sigma, otm_type)
            .unwrap_or_else(|_| T::nan());
        let v = bachelier::vega(forward, strike, expiry, sigma).unwrap_or_else(|_| T::nan());
        if p > zero {
            v / p
        } else {
            zero
        }
    };

    // The normal price is unbounded in sigma, so an upper edge always
    // exists; grow it geometrically from twice the seed, keeping the seed
    // itself interior to the bracket.
    let mut hi = seed * two;
    let mut expansions = 0;
    while residual(hi) < zero {
        hi = hi * two;
        expansions += 1;
        if expansions > MAX_BRACKET_EXPANSIONS {
            return Err(PricingError::SolverDivergence(format!(
                "failed to bracket the normal implied volatility below {}",
                hi.to_f64().unwrap_or(f64::NAN)
            )));
        }
    }

    let solver = SafeguardedNewtonSolver::new(solver_config());
    let vol = solver.find_root(residual, slope, seed, zero, hi).map_err(|err| {
        tracing::debug!(%err, "normal implied volatility solve failed");
        PricingError::from(err)
    })?;
    Ok(vol.max(zero))
}
