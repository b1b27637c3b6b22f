//! Strike-from-delta inversion by generic root finding.

use num_traits::Float;
use vol_core::math::solvers::{BrentSolver, SolverConfig};
use vol_core::types::PricingError;

use crate::analytical::black;
use crate::analytical::AnalyticalError;
use crate::instruments::OptionType;

/// Cap on geometric bracket-expansion rounds.
const MAX_BRACKET_EXPANSIONS: usize = 120;

/// Strike recovered from a target forward delta by one-dimensional root
/// finding on the forward-delta function.
///
/// Solves `forward_delta(K) = target` with Brent's method over a strike
/// bracket expanded geometrically around the forward. The closed form
/// [`black::strike_for_delta`] is the production path; this derivative-free
/// route exists to validate it — the two must agree to solver tolerance,
/// and any divergence is a formula defect, not a preference — and as the
/// template for models without an analytic inverse.
///
/// # Errors
/// Same input validation as the closed form, plus
/// [`PricingError::SolverDivergence`] if bracketing or iteration fails.
///
/// # Examples
/// ```
/// use vol_models::analytical::black;
/// use vol_models::implied::strike_for_delta_root_find;
/// use vol_models::instruments::OptionType;
///
/// let closed = black::strike_for_delta(100.0_f64, -0.25, 1.0, 0.2, OptionType::Put).unwrap();
/// let generic =
///     strike_for_delta_root_find(100.0_f64, -0.25, 1.0, 0.2, OptionType::Put).unwrap();
/// assert!((closed - generic).abs() < 1e-9);
/// ```
pub fn strike_for_delta_root_find<T: Float>(
    forward: T,
    forward_delta: T,
    expiry: T,
    volatility: T,
    option_type: OptionType,
) -> Result<T, PricingError> {
    let zero = T::zero();
    let one = T::one();
    let two = T::from(2.0).unwrap();

    if !(forward > zero) || !forward.is_finite() {
        return Err(AnalyticalError::InvalidForward {
            forward: forward.to_f64().unwrap_or(f64::NAN),
        }
        .into());
    }
    if !(expiry >= zero) || !expiry.is_finite() {
        return Err(AnalyticalError::InvalidExpiry {
            expiry: expiry.to_f64().unwrap_or(f64::NAN),
        }
        .into());
    }
    if !(volatility >= zero) || !volatility.is_finite() {
        return Err(AnalyticalError::InvalidVolatility {
            volatility: volatility.to_f64().unwrap_or(f64::NAN),
        }
        .into());
    }
    let in_range = match option_type {
        OptionType::Call => forward_delta > zero && forward_delta < one,
        OptionType::Put => forward_delta > -one && forward_delta < zero,
    };
    if !in_range {
        return Err(AnalyticalError::InvalidDelta {
            delta: forward_delta.to_f64().unwrap_or(f64::NAN),
            option_kind: if option_type.is_call() { "call" } else { "put" },
        }
        .into());
    }

    // Delta is strictly decreasing in strike for both option types, so the
    // residual crosses zero exactly once; expand the bracket around the
    // forward until it straddles.
    let residual = |k: T| {
        black::forward_delta(forward, k, expiry, volatility, option_type)
            .map(|d| d - forward_delta)
            .unwrap_or_else(|_| T::nan())
    };

    let mut lo = forward / two;
    let mut expansions = 0;
    while residual(lo) <= zero {
        lo = lo / two;
        expansions += 1;
        if expansions > MAX_BRACKET_EXPANSIONS {
            return Err(PricingError::SolverDivergence(
                "failed to bracket the strike from below".to_string(),
            ));
        }
    }
    let mut hi = forward * two;
    expansions = 0;
    while residual(hi) >= zero {
        hi = hi * two;
        expansions += 1;
        if expansions > MAX_BRACKET_EXPANSIONS {
            return Err(PricingError::SolverDivergence(
                "failed to bracket the strike from above".to_string(),
            ));
        }
    }

    // Tight tolerances so the oracle is comparable to the closed form at
    // the 1e-9 level.
    let config = SolverConfig::new(
        T::from(1e-13).unwrap(),
        T::from(1e-10).unwrap(),
        200,
    );
    let solver = BrentSolver::new(config);
    solver.find_root(residual, lo, hi).map_err(PricingError::from)
}
