//! Normality diagnostics for a single feature column
//!
//! Rescaling treats every column as roughly normal. A [`DistributionReport`]
//! lets that be checked before assessing: a maximum-likelihood normal fit,
//! a density histogram with the fitted pdf over it, and the ordered sample
//! paired with theoretical normal quantiles (a Q-Q probability plot).

use crate::error::{AssessmentError, Result};
use crate::rescale::PopulationStats;
use serde::Serialize;
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Samples of the fitted density curve
pub const DENSITY_POINTS: usize = 100;

/// Maximum-likelihood normal fit (population standard deviation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalFit {
    pub mean: f64,
    pub std_dev: f64,
}

impl NormalFit {
    pub fn of(values: &[f64]) -> Result<Self> {
        let stats = PopulationStats::of(values)?;
        if values.iter().all(|v| *v == values[0]) || stats.std_dev == 0.0 {
            return Err(AssessmentError::domain(format!(
                "zero variance across {} value(s)",
                values.len()
            )));
        }
        Ok(Self {
            mean: stats.mean,
            std_dev: stats.std_dev,
        })
    }

    fn normal(&self) -> Result<Normal> {
        Normal::new(self.mean, self.std_dev).map_err(|e| AssessmentError::domain(e.to_string()))
    }
}

/// One histogram bar, normalized so the bar areas sum to 1
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    pub density: f64,
}

/// A point on the fitted pdf
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

/// Theoretical standard-normal quantile against the observed ordered value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantilePair {
    pub theoretical: f64,
    pub ordered: f64,
}

/// Q-Q pairs plus their least-squares line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityPlot {
    pub pairs: Vec<QuantilePair>,
    pub slope: f64,
    pub intercept: f64,
    /// Correlation of the pairs; near 1 for normal data
    pub r: f64,
}

/// Everything needed to judge whether a column is normal enough to rescale
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionReport {
    pub dataset: String,
    pub feature: String,
    pub count: usize,
    pub fit: NormalFit,
    pub histogram: Vec<HistogramBin>,
    pub density_curve: Vec<DensityPoint>,
    pub probability_plot: ProbabilityPlot,
}

impl DistributionReport {
    /// Analyze one column. `bins` defaults to Sturges' rule.
    pub fn analyze(
        dataset: &str,
        feature: &str,
        values: &[f64],
        bins: Option<usize>,
    ) -> Result<Self> {
        let fit = NormalFit::of(values)?;
        let bins = bins.unwrap_or_else(|| sturges_bins(values.len())).max(1);

        Ok(Self {
            dataset: dataset.to_string(),
            feature: feature.to_string(),
            count: values.len(),
            fit,
            histogram: histogram(values, bins),
            density_curve: density_curve(values, &fit)?,
            probability_plot: probability_plot(values)?,
        })
    }
}

/// `ceil(log2 n) + 1`
pub fn sturges_bins(n: usize) -> usize {
    (n.max(1) as f64).log2().ceil() as usize + 1
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Equal-width bins over [min, max]; the last bin is closed on the right
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (lo, hi) = min_max(values);
    let bins = bins.max(1);
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let index = if width > 0.0 {
            (((v - lo) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[index] += 1;
    }

    let n = values.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
            density: if width > 0.0 {
                count as f64 / (n * width)
            } else {
                0.0
            },
        })
        .collect()
}

/// Fitted pdf sampled evenly over the observed range
fn density_curve(values: &[f64], fit: &NormalFit) -> Result<Vec<DensityPoint>> {
    let normal = fit.normal()?;
    let (lo, hi) = min_max(values);
    let step = (hi - lo) / (DENSITY_POINTS - 1) as f64;
    Ok((0..DENSITY_POINTS)
        .map(|i| {
            let x = lo + step * i as f64;
            DensityPoint {
                x,
                density: normal.pdf(x),
            }
        })
        .collect())
}

/// Filliben's estimate of the uniform order-statistic medians
pub fn order_statistic_medians(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let last = 0.5f64.powf(1.0 / n as f64);
    (1..=n)
        .map(|i| match i {
            1 => 1.0 - last,
            i if i == n => last,
            i => (i as f64 - 0.3175) / (n as f64 + 0.365),
        })
        .collect()
}

/// Ordered sample against standard-normal quantiles, with a least-squares fit
pub fn probability_plot(values: &[f64]) -> Result<ProbabilityPlot> {
    let standard = Normal::new(0.0, 1.0).map_err(|e| AssessmentError::domain(e.to_string()))?;

    let mut ordered = values.to_vec();
    ordered.sort_by(f64::total_cmp);
    let pairs: Vec<QuantilePair> = order_statistic_medians(ordered.len())
        .into_iter()
        .zip(ordered)
        .map(|(p, ordered)| QuantilePair {
            theoretical: standard.inverse_cdf(p),
            ordered,
        })
        .collect();

    let (slope, intercept, r) = least_squares(&pairs);
    Ok(ProbabilityPlot {
        pairs,
        slope,
        intercept,
        r,
    })
}

fn least_squares(pairs: &[QuantilePair]) -> (f64, f64, f64) {
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.theoretical).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.ordered).sum::<f64>() / n;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for p in pairs {
        let (dx, dy) = (p.theoretical - mean_x, p.ordered - mean_y);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return (0.0, mean_y, 0.0);
    }
    let slope = sxy / sxx;
    (slope, mean_y - slope * mean_x, sxy / (sxx * syy).sqrt())
}
