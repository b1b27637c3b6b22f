//! Brent's method root finder.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's method: derivative-free root finding on a bracket.
///
/// Combines bisection, the secant method and inverse quadratic
/// interpolation, falling back to bisection whenever an interpolated step is
/// unreliable. Guaranteed to converge for a continuous function with a valid
/// sign-change bracket.
///
/// Used where no analytic derivative is available — the generic
/// strike-from-delta inversion that validates the closed form.
///
/// # Example
///
/// ```
/// use vol_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
///
/// // Solve sin(x) = 0 in [3, 4] (finds pi)
/// let root = solver.find_root(|x: f64| x.sin(), 3.0, 4.0).unwrap();
/// assert!((root - std::f64::consts::PI).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
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

    /// Find a root of `f` in the bracket `[a, b]`.
    ///
    /// Requires `f(a)` and `f(b)` to have opposite signs.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - root with `|f(x)| < tolerance`, or the current iterate
    ///   once the bracket has collapsed below `step_tolerance`
    /// * `Err(SolverError::NoBracket)` - same sign at both endpoints
    /// * `Err(SolverError::MaxIterationsExceeded)` - budget exhausted
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let zero = T::zero();
        let one = T::one();
        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();

        let mut a = a;
        let mut b = b;
        let mut fa = f(a);
        let mut fb = f(b);

        if fa == zero {
            return Ok(a);
        }
        if fb == zero {
            return Ok(b);
        }
        if (fa > zero) == (fb > zero) {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        // b holds the best iterate throughout; c the counterpoint with
        // opposite sign.
        if fa.abs() < fb.abs() {
            core::mem::swap(&mut a, &mut b);
            core::mem::swap(&mut fa, &mut fb);
        }
        let mut c = a;
        let mut fc = fa;
        let mut d = b - a;
        let mut e = d;

        for _iteration in 0..self.config.max_iterations {
            if fb.abs() < self.config.tolerance {
                return Ok(b);
            }

            let m = (c - b) / two;
            if m.abs() <= self.config.step_tolerance {
                return Ok(b);
            }

            // Try an interpolated step; fall back to bisection when the
            // step is out of range or shrinking too slowly.
            let mut bisect = true;
            if fa != fc && fb != fc {
                // Inverse quadratic interpolation
                let r = fb / fc;
                let s = fb / fa;
                let t = fa / fc;
                let p = s * (t * (r - t) * (c - b) - (one - r) * (b - a));
                let q = (t - one) * (r - one) * (s - one);
                if p.abs() < (three * m * q).abs() / two && p.abs() < (e * q).abs() / two {
                    e = d;
                    d = p / q;
                    bisect = false;
                }
            } else if fb != fa {
                // Secant step
                let s = fb / fa;
                let p = two * m * s;
                let q = one - s;
                if p.abs() < (three * m * q).abs() / two && p.abs() < (e * q).abs() / two {
                    e = d;
                    d = p / q;
                    bisect = false;
                }
            }
            if bisect {
                d = m;
                e = m;
            }

            a = b;
            fa = fb;
            let step = if d.abs() > self.config.step_tolerance {
                d
            } else if m > zero {
                self.config.step_tolerance
            } else {
                -self.config.step_tolerance
            };
            b = b + step;
            fb = f(b);

            // Re-anchor the counterpoint whenever b and c stop straddling
            // the root.
            if (fb > zero) == (fc > zero) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }
}
