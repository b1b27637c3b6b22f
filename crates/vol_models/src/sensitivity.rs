//! Volatility with bucketed sensitivities.

use std::hash::{Hash, Hasher};

use vol_core::types::PricingError;

/// A volatility together with its bucketed sensitivity grid.
///
/// The sole heap-allocated result type in the library: an immutable value
/// object pairing a volatility with a rectangular rows × columns grid of
/// sensitivities to the calibration buckets that produced it. Constructed
/// fresh on each request, owned solely by its creator, never mutated after
/// construction.
///
/// Equality and hashing are structural (deep element-wise over the bit
/// patterns of the values, so `Eq` and `Hash` stay consistent).
///
/// # Examples
/// ```
/// use vol_models::sensitivity::VolatilityAndBucketedSensitivities;
///
/// let a = VolatilityAndBucketedSensitivities::new(
///     0.2,
///     Some(vec![vec![1.0, 2.0], vec![3.0, 4.0]]),
/// )
/// .unwrap();
/// let b = VolatilityAndBucketedSensitivities::new(
///     0.2,
///     Some(vec![vec![1.0, 2.0], vec![3.0, 4.0]]),
/// )
/// .unwrap();
/// assert_eq!(a, b);
///
/// // A missing grid reference is an input error, not an empty grid
/// assert!(VolatilityAndBucketedSensitivities::new(0.2, None).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct VolatilityAndBucketedSensitivities {
    volatility: f64,
    sensitivities: Vec<Vec<f64>>,
}

impl VolatilityAndBucketedSensitivities {
    /// Creates the value object.
    ///
    /// The grid dimensions are fixed here: every row must have the same
    /// length. An empty grid is legal; an absent (`None`) grid reference is
    /// not.
    ///
    /// # Errors
    /// [`PricingError::InvalidInput`] when `sensitivities` is `None` or the
    /// rows are ragged.
    pub fn new(
        volatility: f64,
        sensitivities: Option<Vec<Vec<f64>>>,
    ) -> Result<Self, PricingError> {
        let sensitivities = sensitivities.ok_or_else(|| {
            PricingError::InvalidInput("missing sensitivity grid".to_string())
        })?;

        if let Some(first) = sensitivities.first() {
            let columns = first.len();
            if sensitivities.iter().any(|row| row.len() != columns) {
                return Err(PricingError::InvalidInput(
                    "ragged sensitivity grid: all rows must have the same length".to_string(),
                ));
            }
        }

        Ok(Self {
            volatility,
            sensitivities,
        })
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the sensitivity grid.
    #[inline]
    pub fn sensitivities(&self) -> &[Vec<f64>] {
        &self.sensitivities
    }

    /// Grid dimensions as (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        let rows = self.sensitivities.len();
        let columns = self.sensitivities.first().map_or(0, Vec::len);
        (rows, columns)
    }
}

impl PartialEq for VolatilityAndBucketedSensitivities {
    fn eq(&self, other: &Self) -> bool {
        if self.volatility.to_bits() != other.volatility.to_bits() {
            return false;
        }
        if self.sensitivities.len() != other.sensitivities.len() {
            return false;
        }
        self.sensitivities
            .iter()
            .zip(&other.sensitivities)
            .all(|(a, b)| {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            })
    }
}

impl Eq for VolatilityAndBucketedSensitivities {}

impl Hash for VolatilityAndBucketedSensitivities {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.volatility.to_bits().hash(state);
        self.sensitivities.len().hash(state);
        for row in &self.sensitivities {
            row.len().hash(state);
            for value in row {
                value.to_bits().hash(state);
            }
        }
    }
}
