//! Rescaling of raw measurements into the bounded quality domain
//!
//! Raw values are standardized with the population mean and standard
//! deviation, multiplied by [`SCALE_FACTOR`] so that +/-3 sigma lands on the
//! domain bounds, then clipped into [-6, 6].

use crate::error::{AssessmentError, Result};
use crate::{QUALITY_MAX, QUALITY_MIN};

/// Multiplier applied to the z-score
pub const SCALE_FACTOR: f64 = 2.0;

/// Population mean and standard deviation of a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationStats {
    pub mean: f64,
    /// Divides by N, not N - 1
    pub std_dev: f64,
}

impl PopulationStats {
    /// Compute stats for a non-empty sample of finite values
    pub fn of(values: &[f64]) -> Result<Self> {
        let unit = UnitSample::of(values)?;
        Ok(Self {
            mean: unit.mean * unit.magnitude,
            std_dev: unit.std_dev * unit.magnitude,
        })
    }
}

/// A sample divided by its largest magnitude, so every value lies in
/// [-1, 1] and the sums of squares cannot overflow. z-scores are the same
/// in either space.
struct UnitSample {
    magnitude: f64,
    mean: f64,
    std_dev: f64,
}

impl UnitSample {
    fn of(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(AssessmentError::domain("empty input"));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(AssessmentError::domain(format!(
                "non-finite value {}",
                bad
            )));
        }

        let magnitude = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        // All zeros; any divisor works
        let magnitude = if magnitude == 0.0 { 1.0 } else { magnitude };

        let n = values.len() as f64;
        let mean = values.iter().map(|v| v / magnitude).sum::<f64>() / n;
        let variance = values
            .iter()
            .map(|v| (v / magnitude - mean).powi(2))
            .sum::<f64>()
            / n;

        Ok(Self {
            magnitude,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    fn z_score(&self, value: f64) -> f64 {
        (value / self.magnitude - self.mean) / self.std_dev
    }
}

/// Converts raw samples into quality values
#[derive(Debug, Clone, Copy)]
pub struct Rescaler {
    /// Multiplier applied to the z-score before clipping
    scale_factor: f64,
}

impl Rescaler {
    /// Rescaler with the default [`SCALE_FACTOR`]
    pub fn new() -> Self {
        Self {
            scale_factor: SCALE_FACTOR,
        }
    }

    /// Map `factor` standard deviations to one quality unit.
    /// With 1.0, +/-6 sigma spans the domain.
    pub fn with_scale_factor(mut self, factor: f64) -> Self {
        self.scale_factor = factor;
        self
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Rescale one feature's raw values across products.
    ///
    /// Output has the input's length and order. With `inverse`, every value
    /// is negated after clipping so "lower is better" features align with
    /// "higher quality is better".
    pub fn rescale(&self, values: &[f64], inverse: bool) -> Result<Vec<f64>> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(AssessmentError::domain(format!(
                "scale factor {} must be positive and finite",
                self.scale_factor
            )));
        }

        let unit = UnitSample::of(values)?;
        if values.iter().all(|v| *v == values[0]) || unit.std_dev == 0.0 {
            return Err(AssessmentError::domain(format!(
                "zero variance across {} value(s)",
                values.len()
            )));
        }

        Ok(values
            .iter()
            .map(|&v| {
                let clipped =
                    (unit.z_score(v) * self.scale_factor).clamp(QUALITY_MIN, QUALITY_MAX);
                if inverse {
                    -clipped
                } else {
                    clipped
                }
            })
            .collect())
    }
}

impl Default for Rescaler {
    fn default() -> Self {
        Self::new()
    }
}

/// Rescale with the default scale factor
pub fn rescale(values: &[f64], inverse: bool) -> Result<Vec<f64>> {
    Rescaler::new().rescale(values, inverse)
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn varied_sample() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-1.0e6f64..1.0e6, 2..60).prop_filter("needs variance", |v| {
            PopulationStats::of(v)
                .map(|s| s.std_dev > 1e-9)
                .unwrap_or(false)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn output_is_length_preserving_and_bounded(values in varied_sample()) {
            let out = rescale(&values, false).unwrap();
            prop_assert_eq!(out.len(), values.len());
            for v in &out {
                prop_assert!((QUALITY_MIN..=QUALITY_MAX).contains(v));
            }
        }

        #[test]
        fn output_preserves_order_of_inputs(values in varied_sample()) {
            let out = rescale(&values, false).unwrap();
            for i in 0..values.len() {
                for j in 0..values.len() {
                    if values[i] < values[j] {
                        prop_assert!(out[i] <= out[j]);
                    }
                }
            }
        }

        #[test]
        fn inverse_is_elementwise_negation(values in varied_sample()) {
            let plain = rescale(&values, false).unwrap();
            let inverted = rescale(&values, true).unwrap();
            for (p, i) in plain.iter().zip(&inverted) {
                prop_assert_eq!(*i, -*p);
            }
        }
    }
}
