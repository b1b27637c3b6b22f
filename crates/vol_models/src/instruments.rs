//! Instrument-side types: option type and validated market inputs.

use num_traits::Float;

use crate::analytical::AnalyticalError;

/// Call/put flag.
///
/// Determines sign conventions throughout the library via [`sign`](Self::sign).
///
/// # Examples
/// ```
/// use vol_models::instruments::OptionType;
///
/// assert_eq!(OptionType::Call.sign::<f64>(), 1.0);
/// assert_eq!(OptionType::Put.sign::<f64>(), -1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Call option: pays max(F - K, 0).
    Call,
    /// Put option: pays max(K - F, 0).
    Put,
}

impl OptionType {
    /// Sign convention: +1 for a call, -1 for a put.
    #[inline]
    pub fn sign<T: Float>(self) -> T {
        match self {
            OptionType::Call => T::one(),
            OptionType::Put => -T::one(),
        }
    }

    /// True for a call.
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, OptionType::Call)
    }
}

/// Validated market inputs for a single pricing or inversion call.
///
/// Immutable and `Copy`; owned by the caller, used for one calculation and
/// discarded.
///
/// # Examples
/// ```
/// use vol_models::instruments::MarketScenario;
///
/// let scenario = MarketScenario::new(100.0_f64, 110.0, 0.5).unwrap();
/// assert_eq!(scenario.forward(), 100.0);
///
/// // Non-positive forward is rejected up front
/// assert!(MarketScenario::new(-100.0_f64, 110.0, 0.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketScenario<T: Float> {
    forward: T,
    strike: T,
    expiry: T,
}

impl<T: Float> MarketScenario<T> {
    /// Creates a validated scenario.
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidForward` if `forward <= 0` or non-finite
    /// - `AnalyticalError::InvalidStrike` if `strike <= 0` or non-finite
    /// - `AnalyticalError::InvalidExpiry` if `expiry < 0` or non-finite
    pub fn new(forward: T, strike: T, expiry: T) -> Result<Self, AnalyticalError> {
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
        Ok(Self {
            forward,
            strike,
            expiry,
        })
    }

    /// Returns the forward.
    #[inline]
    pub fn forward(&self) -> T {
        self.forward
    }

    /// Returns the strike.
    #[inline]
    pub fn strike(&self) -> T {
        self.strike
    }

    /// Returns the time to expiry in years.
    #[inline]
    pub fn expiry(&self) -> T {
        self.expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type_sign() {
        assert_eq!(OptionType::Call.sign::<f64>(), 1.0);
        assert_eq!(OptionType::Put.sign::<f64>(), -1.0);
    }

    #[test]
    fn test_option_type_is_call() {
        assert!(OptionType::Call.is_call());
        assert!(!OptionType::Put.is_call());
    }

    #[test]
    fn test_scenario_valid() {
        let s = MarketScenario::new(100.0_f64, 95.0, 1.5).unwrap();
        assert_eq!(s.forward(), 100.0);
        assert_eq!(s.strike(), 95.0);
        assert_eq!(s.expiry(), 1.5);
    }

    #[test]
    fn test_scenario_zero_expiry_allowed() {
        assert!(MarketScenario::new(100.0_f64, 95.0, 0.0).is_ok());
    }

    #[test]
    fn test_scenario_invalid_forward() {
        assert!(matches!(
            MarketScenario::new(0.0_f64, 95.0, 1.0),
            Err(AnalyticalError::InvalidForward { .. })
        ));
        assert!(matches!(
            MarketScenario::new(-1.0_f64, 95.0, 1.0),
            Err(AnalyticalError::InvalidForward { .. })
        ));
        assert!(matches!(
            MarketScenario::new(f64::NAN, 95.0, 1.0),
            Err(AnalyticalError::InvalidForward { .. })
        ));
    }

    #[test]
    fn test_scenario_invalid_strike() {
        assert!(matches!(
            MarketScenario::new(100.0_f64, -95.0, 1.0),
            Err(AnalyticalError::InvalidStrike { .. })
        ));
    }

    #[test]
    fn test_scenario_invalid_expiry() {
        assert!(matches!(
            MarketScenario::new(100.0_f64, 95.0, -0.5),
            Err(AnalyticalError::InvalidExpiry { .. })
        ));
        assert!(matches!(
            MarketScenario::new(100.0_f64, 95.0, f64::INFINITY),
            Err(AnalyticalError::InvalidExpiry { .. })
        ));
    }

    #[test]
    fn test_scenario_copy() {
        let s = MarketScenario::new(100.0_f64, 95.0, 1.0).unwrap();
        let t = s;
        assert_eq!(s, t);
    }
}
