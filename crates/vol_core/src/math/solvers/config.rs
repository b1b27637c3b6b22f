//! Solver configuration types.

use num_traits::Float;

/// Configuration for root-finding algorithms.
///
/// Shared by all solver implementations in this crate.
///
/// # Type Parameters
///
/// * `T` - Floating-point type for tolerances (e.g., `f64`)
///
/// # Example
///
/// ```
/// use vol_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.tolerance <= 1e-12);
/// assert!(config.max_iterations >= 50);
///
/// let custom = SolverConfig::new(1e-10, 1e-8, 200);
/// assert_eq!(custom.max_iterations, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Residual convergence tolerance: the solver stops when
    /// `|f(x)| < tolerance`.
    pub tolerance: T,

    /// Argument convergence tolerance: the solver also stops when the
    /// bracketing interval has collapsed below this width. Needed in deep
    /// out-of-the-money regimes where the residual stalls at a scale set by
    /// rounding long after the argument has converged.
    pub step_tolerance: T,

    /// Maximum number of iterations before reporting failure.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default values: `tolerance` 1e-12, `step_tolerance` 1e-9,
    /// `max_iterations` 100.
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-12).unwrap(),
            step_tolerance: T::from(1e-9).unwrap(),
            max_iterations: 100,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a new configuration with specified values.
    ///
    /// # Panics
    ///
    /// Panics if either tolerance is non-positive or `max_iterations == 0`.
    pub fn new(tolerance: T, step_tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(
            step_tolerance > T::zero(),
            "step_tolerance must be positive"
        );
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            step_tolerance,
            max_iterations,
        }
    }
}
