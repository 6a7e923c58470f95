//! Multiplicative load surges and the factor sources that drive them.
//!
//! A surge of `p` percent scales every active element's load by
//! `1 + p/100 * factor`. The factor is 1.0 for a uniform surge; for a random
//! surge it is drawn independently per element from `[0.5, 1.5]` by default.
//!
//! Factor sources are passed in explicitly so a run is fully reproducible
//! from its seed (or from a scripted factor list in tests).

use crate::error::{CascadeError, CascadeResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default bounds for random per-element surge factors.
pub const RANDOM_FACTOR_RANGE: (f64, f64) = (0.5, 1.5);

/// Source of per-element surge factors.
pub trait SurgeFactors {
    /// Factor for the next element. Called once per active node, then once per active line.
    fn next_factor(&mut self) -> f64;

    /// Whether factors vary between elements (reporting only).
    fn is_random(&self) -> bool {
        true
    }
}

impl<T: SurgeFactors + ?Sized> SurgeFactors for &mut T {
    fn next_factor(&mut self) -> f64 {
        (**self).next_factor()
    }

    fn is_random(&self) -> bool {
        (**self).is_random()
    }
}

/// Every element gets the full surge.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSurge;

impl SurgeFactors for UniformSurge {
    fn next_factor(&mut self) -> f64 {
        1.0
    }

    fn is_random(&self) -> bool {
        false
    }
}

/// Factors drawn uniformly from `[min, max]`.
#[derive(Debug, Clone)]
pub struct RandomSurge<R: Rng = StdRng> {
    rng: R,
    min: f64,
    max: f64,
}

impl RandomSurge<StdRng> {
    /// Reproducible generator over the default range.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            min: RANDOM_FACTOR_RANGE.0,
            max: RANDOM_FACTOR_RANGE.1,
        }
    }

    /// Seeded when `seed` is given, otherwise from OS entropy.
    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        let rng = seed
            .map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_entropy);
        Self {
            rng,
            min: RANDOM_FACTOR_RANGE.0,
            max: RANDOM_FACTOR_RANGE.1,
        }
    }
}

impl<R: Rng> RandomSurge<R> {
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            min: RANDOM_FACTOR_RANGE.0,
            max: RANDOM_FACTOR_RANGE.1,
        }
    }

    /// Override the factor range. Requires `0 < min <= max`, both finite.
    pub fn with_range(mut self, min: f64, max: f64) -> CascadeResult<Self> {
        validate_factor_range(min, max)?;
        self.min = min;
        self.max = max;
        Ok(self)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl<R: Rng> SurgeFactors for RandomSurge<R> {
    fn next_factor(&mut self) -> f64 {
        if self.min == self.max {
            return self.min;
        }
        self.rng.gen_range(self.min..=self.max)
    }
}

/// Replays a fixed list of factors, cycling when exhausted. An empty list yields 1.0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFactors {
    factors: Vec<f64>,
    cursor: usize,
}

impl ScriptedFactors {
    pub fn new(factors: impl Into<Vec<f64>>) -> Self {
        Self {
            factors: factors.into(),
            cursor: 0,
        }
    }
}

impl SurgeFactors for ScriptedFactors {
    fn next_factor(&mut self) -> f64 {
        if self.factors.is_empty() {
            return 1.0;
        }
        let factor = self.factors[self.cursor % self.factors.len()];
        self.cursor += 1;
        factor
    }
}

/// Check a random factor range: finite, `0 < min <= max`.
pub fn validate_factor_range(min: f64, max: f64) -> CascadeResult<()> {
    if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
        return Err(CascadeError::invalid(
            "random_factor_range",
            format!("expected finite 0 < min <= max, got [{min}, {max}]"),
        ));
    }
    Ok(())
}

/// Check a surge percentage: finite and non-negative.
pub fn validate_percent(percent: f64) -> CascadeResult<()> {
    if !percent.is_finite() || percent < 0.0 {
        return Err(CascadeError::invalid(
            "load_increase_percent",
            format!("must be a finite value >= 0, got {percent}"),
        ));
    }
    Ok(())
}

/// The multiplier `1 + percent/100 * factor`.
#[inline]
pub fn surge_multiplier(percent: f64, factor: f64) -> f64 {
    1.0 + percent / 100.0 * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_surge_is_one() {
        let mut surge = UniformSurge;
        assert_eq!(surge.next_factor(), 1.0);
        assert!(!surge.is_random());
    }

    #[test]
    fn test_random_surge_stays_in_range() {
        let mut surge = RandomSurge::seeded(42);
        for _ in 0..1000 {
            let f = surge.next_factor();
            assert!((0.5..=1.5).contains(&f), "factor {f} out of range");
        }
    }

    #[test]
    fn test_random_surge_reproducible_from_seed() {
        let mut a = RandomSurge::seeded(7);
        let mut b = RandomSurge::seeded(7);
        let xs: Vec<f64> = (0..16).map(|_| a.next_factor()).collect();
        let ys: Vec<f64> = (0..16).map(|_| b.next_factor()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_custom_range() {
        let mut surge = RandomSurge::seeded(1).with_range(1.0, 1.0).unwrap();
        assert_eq!(surge.next_factor(), 1.0);
        assert!(RandomSurge::seeded(1).with_range(1.5, 0.5).is_err());
        assert!(RandomSurge::seeded(1).with_range(0.0, 0.5).is_err());
        assert!(RandomSurge::seeded(1).with_range(0.5, f64::NAN).is_err());
    }

    #[test]
    fn test_scripted_factors_cycle() {
        let mut script = ScriptedFactors::new(vec![0.5, 1.5]);
        assert_eq!(script.next_factor(), 0.5);
        assert_eq!(script.next_factor(), 1.5);
        assert_eq!(script.next_factor(), 0.5);
        assert_eq!(ScriptedFactors::default().next_factor(), 1.0);
    }

    #[test]
    fn test_validate_percent() {
        assert!(validate_percent(0.0).is_ok());
        assert!(validate_percent(250.0).is_ok());
        assert!(validate_percent(-0.1).is_err());
        assert!(validate_percent(f64::INFINITY).is_err());
    }

    #[test]
    fn test_surge_multiplier() {
        assert!((surge_multiplier(20.0, 1.0) - 1.2).abs() < 1e-12);
        assert!((surge_multiplier(20.0, 0.5) - 1.1).abs() < 1e-12);
        assert_eq!(surge_multiplier(0.0, 1.5), 1.0);
    }
}
