//! Assessment engine - quality to novelty transform and batch evaluation

use crate::config::EffectiveConfig;
use crate::dataset::{Dataset, QualityTable};
use crate::error::{AssessmentError, Result};
use crate::{
    AssessmentResult, Category, FeatureRecord, Quadrant, DEFAULT_PRECISION, MAX_PRECISION,
    QUALITY_MAX, QUALITY_MIN,
};
use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info};

use super::curves::{novelty, round_to};
use super::quadrant::quadrant_breakdown;

/// Rounded novelty and area for one quality value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub novelty: f64,
    pub area: f64,
}

/// Evaluate one quality value on a curve.
///
/// Novelty is rounded first; area is `|rounded novelty * quality|`, rounded
/// again. Quality outside [-6, 6] is rejected, never clamped, and so is a
/// precision above [`MAX_PRECISION`].
pub fn evaluate(quality: f64, category: Category, precision: u32) -> Result<Evaluation> {
    if precision > MAX_PRECISION {
        return Err(AssessmentError::Precision { precision });
    }
    if !(QUALITY_MIN..=QUALITY_MAX).contains(&quality) {
        return Err(AssessmentError::OutOfRange { quality });
    }

    let novelty = round_to(novelty(quality, category), precision);
    let area = round_to((novelty * quality).abs(), precision);

    Ok(Evaluation { novelty, area })
}

/// Engine that turns qualities into feature records
pub struct AssessmentEngine {
    /// Decimal places for novelty and area
    precision: u32,
    /// Evaluate batches on the rayon pool
    parallel: bool,
}

impl AssessmentEngine {
    /// Create a new engine with the default precision
    pub fn new() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            parallel: false,
        }
    }

    /// Set the rounding precision
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Evaluate features in parallel when assessing products
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Novelty and area for one quality value
    pub fn evaluate(&self, quality: f64, category: Category) -> Result<Evaluation> {
        evaluate(quality, category, self.precision)
    }

    /// Like [`evaluate`](Self::evaluate) but takes a raw label ("LQ", "MB", "A")
    pub fn evaluate_label(&self, quality: f64, label: &str) -> Result<Evaluation> {
        let category: Category = label.parse()?;
        self.evaluate(quality, category)
    }

    /// Build the full record for one feature
    pub fn record(&self, feature: &str, quality: f64, category: Category) -> Result<FeatureRecord> {
        let Evaluation { novelty, area } = self
            .evaluate(quality, category)
            .map_err(|e| e.for_feature(feature))?;

        Ok(FeatureRecord {
            feature_name: feature.to_string(),
            category,
            quality,
            novelty,
            area,
            quadrant: Quadrant::classify(quality, novelty),
        })
    }

    fn check_arity<S>(features: &[S], qualities: &[f64], categories: &[Category]) -> Result<()> {
        if features.len() != qualities.len() || features.len() != categories.len() {
            return Err(AssessmentError::ArityMismatch {
                features: features.len(),
                qualities: qualities.len(),
                categories: categories.len(),
            });
        }
        Ok(())
    }

    /// Evaluate aligned feature/quality/category sequences.
    ///
    /// Records come back in input order. The first failing feature aborts
    /// the batch and its name is attached to the error.
    pub fn evaluate_batch<S: AsRef<str>>(
        &self,
        features: &[S],
        qualities: &[f64],
        categories: &[Category],
    ) -> Result<Vec<FeatureRecord>> {
        Self::check_arity(features, qualities, categories)?;

        features
            .iter()
            .zip(qualities)
            .zip(categories)
            .map(|((feature, &quality), &category)| self.record(feature.as_ref(), quality, category))
            .collect()
    }

    /// Same as [`evaluate_batch`](Self::evaluate_batch), evaluated with rayon
    pub fn evaluate_batch_parallel<S: AsRef<str> + Sync>(
        &self,
        features: &[S],
        qualities: &[f64],
        categories: &[Category],
    ) -> Result<Vec<FeatureRecord>> {
        use rayon::prelude::*;

        Self::check_arity(features, qualities, categories)?;

        features
            .par_iter()
            .zip(qualities.par_iter())
            .zip(categories.par_iter())
            .map(|((feature, &quality), &category)| self.record(feature.as_ref(), quality, category))
            .collect()
    }

    fn run_batch(&self, table: &QualityTable, index: usize) -> Result<Vec<FeatureRecord>> {
        let qualities = table.row(index);
        if self.parallel {
            self.evaluate_batch_parallel(&table.features, &qualities, &table.categories)
        } else {
            self.evaluate_batch(&table.features, &qualities, &table.categories)
        }
    }

    fn prepare(&self, dataset: &Dataset, config: &EffectiveConfig) -> anyhow::Result<QualityTable> {
        let features = dataset.feature_columns(&config.categories)?;
        debug!(
            dataset = %dataset.name,
            features = features.len(),
            inverse = config.inverse.len(),
            "rescaling feature columns"
        );
        dataset.quality_table(&features, &config.inverse)
    }

    fn result_for(
        &self,
        dataset: &Dataset,
        table: &QualityTable,
        index: usize,
    ) -> anyhow::Result<AssessmentResult> {
        let product = dataset.products[index].reference();
        let records = self
            .run_batch(table, index)
            .with_context(|| format!("Failed to assess product {} ({})", product.id, product.name))?;
        let quadrants = quadrant_breakdown(&records);

        Ok(AssessmentResult {
            dataset: dataset.name.clone(),
            product,
            precision: self.precision,
            records,
            quadrants,
        })
    }

    /// Assess one product of a dataset, looked up by id or name
    pub fn assess_product(
        &self,
        dataset: &Dataset,
        product: &str,
        config: &EffectiveConfig,
    ) -> anyhow::Result<AssessmentResult> {
        let (index, _) = dataset.find_product(product).with_context(|| {
            format!("Product '{}' not found in dataset '{}'", product, dataset.name)
        })?;
        let table = self.prepare(dataset, config)?;
        let result = self.result_for(dataset, &table, index)?;
        info!(
            dataset = %result.dataset,
            product = %result.product.name,
            features = result.records.len(),
            "assessed product"
        );
        Ok(result)
    }

    /// Assess every product of a dataset, in dataset order
    pub fn assess_all(
        &self,
        dataset: &Dataset,
        config: &EffectiveConfig,
    ) -> anyhow::Result<Vec<AssessmentResult>> {
        let table = self.prepare(dataset, config)?;
        (0..dataset.products.len())
            .map(|index| self.result_for(dataset, &table, index))
            .collect()
    }
}

impl Default for AssessmentEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_quality_is_identity() {
        let e = evaluate(3.0, Category::LinearQuality, 3).unwrap();
        assert_eq!(e, Evaluation { novelty: 3.0, area: 9.0 });
    }

    #[test]
    fn must_be_at_zero() {
        let e = evaluate(0.0, Category::MustBe, 3).unwrap();
        assert_eq!(e.novelty, -1.0);
        assert_eq!(e.area, 0.0);
        assert_eq!(Quadrant::classify(0.0, e.novelty), Quadrant::Q3);
    }

    #[test]
    fn attractiveness_at_two() {
        let e = evaluate(2.0, Category::Attractiveness, 3).unwrap();
        assert_eq!(e.novelty, 2.414);
        assert_eq!(e.area, 4.828);
        assert_eq!(Quadrant::classify(2.0, e.novelty), Quadrant::Q1);
    }

    #[test]
    fn area_uses_rounded_novelty() {
        let e = evaluate(3.0, Category::LinearQuality, 1).unwrap();
        assert_eq!(e.area, 9.0);
        // 0.5 * (1 + sqrt(5)) = 1.618.. rounds to 1.6 before the area is taken
        let e = evaluate(1.0, Category::Attractiveness, 1).unwrap();
        assert_eq!(e.novelty, 1.6);
        assert_eq!(e.area, 1.6);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(evaluate(6.0, Category::MustBe, 3).is_ok());
        assert!(evaluate(-6.0, Category::Attractiveness, 3).is_ok());
    }

    #[test]
    fn out_of_range_is_rejected_not_clamped() {
        let err = evaluate(7.0, Category::LinearQuality, 3).unwrap_err();
        assert_eq!(err, AssessmentError::OutOfRange { quality: 7.0 });
        assert!(evaluate(-6.0001, Category::LinearQuality, 3).is_err());
        assert!(evaluate(f64::NAN, Category::LinearQuality, 3).is_err());
    }

    #[test]
    fn precision_beyond_maximum_is_rejected() {
        for precision in [16, 308, 400, u32::MAX] {
            assert_eq!(
                evaluate(3.0, Category::LinearQuality, precision).unwrap_err(),
                AssessmentError::Precision { precision }
            );
        }
        let e = evaluate(2.0, Category::Attractiveness, MAX_PRECISION).unwrap();
        assert!(e.novelty.is_finite() && e.area.is_finite());
        assert!((e.novelty - 2.414213562373095).abs() < 1e-12);

        let err = AssessmentEngine::new()
            .with_precision(400)
            .record("Weight", 1.0, Category::MustBe)
            .unwrap_err();
        assert_eq!(err.root_cause(), &AssessmentError::Precision { precision: 400 });
    }

    #[test]
    fn unknown_label_is_invalid_category() {
        let engine = AssessmentEngine::new();
        let err = engine.evaluate_label(1.0, "XYZ").unwrap_err();
        assert!(matches!(err, AssessmentError::InvalidCategory { .. }));
        assert_eq!(
            engine.evaluate_label(3.0, "LQ").unwrap(),
            Evaluation { novelty: 3.0, area: 9.0 }
        );
    }

    #[test]
    fn batch_classifies_in_input_order() {
        let engine = AssessmentEngine::new();
        let records = engine
            .evaluate_batch(
                &["f1", "f2"],
                &[3.0, -2.0],
                &[Category::LinearQuality, Category::MustBe],
            )
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].feature_name, "f1");
        assert_eq!(records[0].novelty, 3.0);
        assert_eq!(records[0].quadrant, Quadrant::Q1);
        assert_eq!(records[1].feature_name, "f2");
        assert_eq!(records[1].novelty, -2.414);
        assert_eq!(records[1].area, 4.828);
        assert_eq!(records[1].quadrant, Quadrant::Q3);
    }

    #[test]
    fn batch_rejects_misaligned_inputs() {
        let engine = AssessmentEngine::new();
        let err = engine
            .evaluate_batch(&["f1", "f2"], &[1.0], &[Category::MustBe, Category::MustBe])
            .unwrap_err();
        assert_eq!(
            err,
            AssessmentError::ArityMismatch {
                features: 2,
                qualities: 1,
                categories: 2
            }
        );
    }

    #[test]
    fn batch_failure_names_the_feature() {
        let engine = AssessmentEngine::new();
        let err = engine
            .evaluate_batch(
                &["ok", "bad"],
                &[1.0, 9.5],
                &[Category::LinearQuality, Category::LinearQuality],
            )
            .unwrap_err();
        assert_eq!(err.feature(), Some("bad"));
        assert_eq!(err.root_cause(), &AssessmentError::OutOfRange { quality: 9.5 });
    }

    #[test]
    fn parallel_batch_matches_sequential() {
        let engine = AssessmentEngine::new();
        let features: Vec<String> = (0..40).map(|i| format!("f{}", i)).collect();
        let qualities: Vec<f64> = (0..40).map(|i| -6.0 + i as f64 * 0.3).collect();
        let categories: Vec<Category> = (0..40).map(|i| Category::ALL[i % 3]).collect();

        let sequential = engine.evaluate_batch(&features, &qualities, &categories).unwrap();
        let parallel = engine
            .evaluate_batch_parallel(&features, &qualities, &categories)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn empty_batch_is_empty() {
        let engine = AssessmentEngine::new();
        let names: [&str; 0] = [];
        assert!(engine.evaluate_batch(&names, &[], &[]).unwrap().is_empty());
    }
}
