//! Safeguarded Newton root finder with bisection fallback.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Newton-Raphson iteration safeguarded by a sign-change bracket.
///
/// Every Newton step is clamped to stay inside a bracketing interval that is
/// recomputed at each iteration; whenever the derivative is unusable (near
/// zero, non-finite) or the proposed step would leave the bracket, the
/// iteration takes a bisection step instead. Convergence is declared on the
/// residual (`|f(x)| < tolerance`) or on bracket collapse
/// (width `< step_tolerance`), whichever comes first.
///
/// This two-tier design exists for functions whose derivative underflows to
/// numerically zero over part of the domain — the implied-volatility residual
/// far out of the money being the motivating case — where pure Newton
/// divides by near-zero and diverges, yet the root is still well defined and
/// bracketed.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Example
///
/// ```
/// use vol_core::math::solvers::{SafeguardedNewtonSolver, SolverConfig};
///
/// let solver = SafeguardedNewtonSolver::new(SolverConfig::default());
///
/// // Solve x³ - x - 2 = 0 in [1, 2]
/// let f = |x: f64| x * x * x - x - 2.0;
/// let f_prime = |x: f64| 3.0 * x * x - 1.0;
///
/// let root = solver.find_root(f, f_prime, 1.5, 1.0, 2.0).unwrap();
/// assert!(f(root).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct SafeguardedNewtonSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> SafeguardedNewtonSolver<T> {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Find a root of `f` inside the bracket `[a, b]`, starting from `x0`.
    ///
    /// Requires `f(a)` and `f(b)` to have opposite signs (or one of them to
    /// be an exact root). `x0` is clamped into the bracket; pass the bracket
    /// midpoint when no better guess is available.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - root with `|f(x)| < tolerance`, or the bracket midpoint
    ///   once the bracket has collapsed below `step_tolerance`
    /// * `Err(SolverError::NoBracket)` - same sign at both endpoints
    /// * `Err(SolverError::MaxIterationsExceeded)` - budget exhausted
    /// * `Err(SolverError::NumericalInstability)` - non-finite residual
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: T, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
    {
        self.solve(f, Some(f_prime), x0, a, b)
    }

    /// Find a root of `f` in `[a, b]` by pure bisection.
    ///
    /// The derivative-free entry point, for callers with no usable
    /// derivative. Same convergence and error contract as
    /// [`find_root`](Self::find_root).
    pub fn bisect<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let two = T::from(2.0).unwrap();
        let x0 = (a + b) / two;
        self.solve(f, None::<fn(T) -> T>, x0, a, b)
    }

    fn solve<F, G>(
        &self,
        f: F,
        f_prime: Option<G>,
        x0: T,
        a: T,
        b: T,
    ) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
    {
        let zero = T::zero();
        let two = T::from(2.0).unwrap();
        let derivative_floor = T::from(1e-30).unwrap();

        let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };

        let f_lo = f(lo);
        if f_lo == zero {
            return Ok(lo);
        }
        let f_hi = f(hi);
        if f_hi == zero {
            return Ok(hi);
        }
        if (f_lo > zero) == (f_hi > zero) {
            return Err(SolverError::NoBracket {
                a: lo.to_f64().unwrap_or(f64::NAN),
                b: hi.to_f64().unwrap_or(f64::NAN),
            });
        }
        // Orient on the sign of the upper endpoint so bracket updates below
        // need only one comparison.
        let hi_positive = f_hi > zero;

        let mut x = if x0 > lo && x0 < hi {
            x0
        } else {
            (lo + hi) / two
        };

        for _iteration in 0..self.config.max_iterations {
            let fx = f(x);

            if fx.abs() < self.config.tolerance {
                return Ok(x);
            }
            if !fx.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "residual evaluated to a non-finite value".to_string(),
                ));
            }

            if (fx > zero) == hi_positive {
                hi = x;
            } else {
                lo = x;
            }

            if (hi - lo).abs() < self.config.step_tolerance {
                return Ok((lo + hi) / two);
            }

            let newton_step = f_prime.as_ref().and_then(|g| {
                let d = g(x);
                if d.is_finite() && d.abs() > derivative_floor {
                    Some(x - fx / d)
                } else {
                    None
                }
            });

            // Bisect whenever Newton is unavailable or would leave the bracket.
            x = match newton_step {
                Some(t) if t > lo && t < hi && t.is_finite() => t,
                _ => (lo + hi) / two,
            };
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Newton path
    // ========================================

    #[test]
    fn test_find_sqrt_2() {
        let solver = SafeguardedNewtonSolver::new(SolverConfig::default());

        let f = |x: f64| x * x - 2.0;
        let f_prime = |x: f64| 2.0 * x;

        let root = solver.find_root(f, f_prime, 1.0, 0.0, 2.0).unwrap();
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn test_find_exp_root() {
        let solver = SafeguardedNewtonSolver::new(SolverConfig::default());

        // Solve e^x - 2 = 0 (find ln 2)
        let f = |x: f64| x.exp() - 2.0;
        let f_prime = |x: f64| x.exp();

        let root = solver.find_root(f, f_prime, 0.5, 0.0, 1.0).unwrap();
        assert!((root - 2.0_f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_guess_outside_bracket_is_clamped() {
        let solver = SafeguardedNewtonSolver::new(SolverConfig::default());

        let f = |x: f64| x * x - 2.0;
        let f_prime = |x: f64| 2.0 * x;

        let root = solver.find_root(f, f_prime, 50.0, 0.0, 2.0).unwrap();
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn test_flat_derivative_falls_back_to_bisection() {
        let solver = SafeguardedNewtonSolver::new(SolverConfig::default());

        // Derivative reported as zero everywhere: must still converge
        let f = |x: f64| x - 1.0;
        let f_prime = |_x: f64| 0.0;

        let root = solver.find_root(f, f_prime, 0.2, 0.0, 2.0).unwrap();
        assert!((root - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_wild_derivative_stays_bracketed() {
        let solver = SafeguardedNewtonSolver::new(SolverConfig::default());

        // A misleading derivative throws Newton far outside the bracket;
        // the safeguard must keep every iterate inside [0, 2].
        let f = |x: f64| x * x * x - x - 2.0;
        let f_prime = |_x: f64| 1e-6;

        let root = solver.find_root(f, f_prime, 1.5, 1.0, 2.0).unwrap();
        assert!(f(root).abs() < 1e-8 || (1.0..=2.0).contains(&root));
        assert!((root - 1.5213797068045676).abs() < 1e-8);
    }

    #[test]
    fn test_root_at_endpoint() {
        let solver = SafeguardedNewtonSolver::new(SolverConfig::default());

        let f = |x: f64| x - 1.0;
        let f_prime = |_x: f64| 1.0;

        let root = solver.find_root(f, f_prime, 1.5, 1.0, 2.0).unwrap();
        assert_eq!(root, 1.0);
    }

    // ========================================
    // Bisection path
    // ========================================

    #[test]
    fn test_bisect_sqrt_2() {
        let solver = SafeguardedNewtonSolver::new(SolverConfig::default());

        let root = solver.bisect(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-8);
    }

    #[test]
    fn test_bisect_reversed_bracket() {
        let solver = SafeguardedNewtonSolver::new(SolverConfig::default());

        let root = solver.bisect(|x: f64| x * x - 2.0, 2.0, 0.0).unwrap();
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-8);
    }

    // ========================================
    // Error handling
    // ========================================

    #[test]
    fn test_no_bracket() {
        let solver = SafeguardedNewtonSolver::new(SolverConfig::default());

        let f = |x: f64| x * x + 1.0;
        let f_prime = |x: f64| 2.0 * x;

        let result = solver.find_root(f, f_prime, 0.0, -1.0, 1.0);
        assert!(matches!(result, Err(SolverError::NoBracket { .. })));
    }

    #[test]
    fn test_max_iterations_exceeded() {
        // Impossible tolerance and a budget too small for bisection to
        // collapse the bracket
        let config = SolverConfig::new(1e-300, 1e-300, 5);
        let solver = SafeguardedNewtonSolver::new(config);

        let f = |x: f64| x * x - 2.0;
        let f_prime = |_x: f64| 0.0;

        let result = solver.find_root(f, f_prime, 1.0, 0.0, 2.0);
        match result {
            Err(SolverError::MaxIterationsExceeded { iterations }) => {
                assert_eq!(iterations, 5);
            }
            other => panic!("expected MaxIterationsExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_residual() {
        let solver = SafeguardedNewtonSolver::new(SolverConfig::default());

        let f = |x: f64| {
            if x > 0.5 && x < 1.5 {
                f64::NAN
            } else {
                x - 1.0
            }
        };
        let f_prime = |_x: f64| 1.0;

        let result = solver.find_root(f, f_prime, 1.0, 0.0, 2.0);
        assert!(matches!(
            result,
            Err(SolverError::NumericalInstability(_))
        ));
    }

    #[test]
    fn test_with_defaults_and_config_accessor() {
        let solver: SafeguardedNewtonSolver<f64> = SafeguardedNewtonSolver::with_defaults();
        assert_eq!(solver.config().max_iterations, 100);
    }

    #[test]
    fn test_with_f32() {
        let solver: SafeguardedNewtonSolver<f32> = SafeguardedNewtonSolver::with_defaults();

        let f = |x: f32| x * x - 2.0;
        let f_prime = |x: f32| 2.0 * x;

        let root = solver.find_root(f, f_prime, 1.0_f32, 0.0, 2.0).unwrap();
        assert!((root - std::f32::consts::SQRT_2).abs() < 1e-5);
    }
}
