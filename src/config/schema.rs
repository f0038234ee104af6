//! Config schema and deserialization

use crate::{Category, CategoryLabel, DEFAULT_PRECISION, MAX_PRECISION};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Stroke/fill colour per category for the chart
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryColors {
    pub linear_quality: String,
    pub must_be: String,
    pub attractiveness: String,
}

impl Default for CategoryColors {
    fn default() -> Self {
        Self {
            linear_quality: "orange".to_string(),
            must_be: "red".to_string(),
            attractiveness: "green".to_string(),
        }
    }
}

impl CategoryColors {
    pub fn for_category(&self, category: Category) -> &str {
        match category {
            Category::LinearQuality => &self.linear_quality,
            Category::MustBe => &self.must_be,
            Category::Attractiveness => &self.attractiveness,
        }
    }
}

/// Chart rendering options, handed to the SVG reporter at construction
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    /// Width and height in pixels
    pub size: u32,
    /// Show a per-feature legend (N, Q, A values)
    pub legend: bool,
    /// Optional title above the plot
    pub title: Option<String>,
    /// Sample points per reference curve
    pub curve_points: usize,
    pub colors: CategoryColors,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            size: 640,
            legend: false,
            title: None,
            curve_points: 100,
            colors: CategoryColors::default(),
        }
    }
}

/// Per-dataset override configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetOverride {
    /// Dataset name patterns this override applies to
    pub datasets: Vec<String>,

    /// Optional precision override for matched datasets
    #[serde(default)]
    pub precision: Option<u32>,

    /// Extra "lower is better" features for matched datasets
    #[serde(default)]
    pub inverse: Vec<String>,

    /// Category overrides for matched datasets
    #[serde(default)]
    pub categories: HashMap<String, CategoryLabel>,
}

/// Root config structure for .kanorc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Decimal places for novelty and area. Default: 3
    #[serde(default)]
    pub precision: Option<u32>,

    /// Features where a lower raw value is better
    #[serde(default)]
    pub inverse: Vec<String>,

    /// Per-feature category overrides (LQ, MB, A or NA)
    #[serde(default)]
    pub categories: HashMap<String, CategoryLabel>,

    /// Evaluate features on the rayon pool
    #[serde(default)]
    pub parallel: Option<bool>,

    /// Chart rendering options
    #[serde(default)]
    pub chart: Option<ChartConfig>,

    /// Per-dataset overrides
    #[serde(default)]
    pub overrides: Vec<DatasetOverride>,
}

impl Config {
    /// Reject values the engine cannot honor
    pub fn validate(&self) -> anyhow::Result<()> {
        let precisions = self
            .precision
            .iter()
            .chain(self.overrides.iter().filter_map(|o| o.precision.as_ref()));
        for &precision in precisions {
            if precision > MAX_PRECISION {
                anyhow::bail!(
                    "precision {} exceeds the maximum of {} decimal places",
                    precision,
                    MAX_PRECISION
                );
            }
        }
        Ok(())
    }

    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(
        mut self,
        cli_precision: Option<u32>,
        cli_inverse: &[String],
        cli_parallel: bool,
    ) -> Self {
        if cli_precision.is_some() {
            self.precision = cli_precision;
        }
        for feature in cli_inverse {
            if !self.inverse.contains(feature) {
                self.inverse.push(feature.clone());
            }
        }
        if cli_parallel {
            self.parallel = Some(true);
        }
        self
    }

    /// Get effective config for a dataset, applying overrides
    pub fn effective_for_dataset(&self, dataset_name: &str) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            precision: self.precision.unwrap_or(DEFAULT_PRECISION),
            inverse: self.inverse.iter().cloned().collect(),
            categories: self.categories.clone(),
            parallel: self.parallel.unwrap_or(false),
            chart: self.chart.clone().unwrap_or_default(),
        };

        // Apply matching overrides in order
        for override_cfg in &self.overrides {
            if Self::matches_override(dataset_name, &override_cfg.datasets) {
                if let Some(precision) = override_cfg.precision {
                    effective.precision = precision;
                }
                effective
                    .inverse
                    .extend(override_cfg.inverse.iter().cloned());
                for (feature, label) in &override_cfg.categories {
                    effective.categories.insert(feature.clone(), *label);
                }
            }
        }

        effective
    }

    /// Check if a dataset name matches any of the override patterns
    fn matches_override(dataset_name: &str, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| {
            globset::Glob::new(pattern)
                .map(|glob| glob.compile_matcher().is_match(dataset_name))
                .unwrap_or(false)
        })
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.precision.is_none() {
            self.precision = base.precision;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.parallel.is_none() {
            self.parallel = base.parallel;
        }
        if self.chart.is_none() {
            self.chart = base.chart;
        }

        // Merge categories (this config takes precedence)
        for (feature, label) in base.categories {
            self.categories.entry(feature).or_insert(label);
        }

        // Merge inverse features
        let mut all_inverse = base.inverse;
        for feature in self.inverse.drain(..) {
            if !all_inverse.contains(&feature) {
                all_inverse.push(feature);
            }
        }
        self.inverse = all_inverse;

        // Prepend base overrides
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }
}

/// Effective configuration for a specific dataset (after applying overrides)
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub precision: u32,
    pub inverse: HashSet<String>,
    pub categories: HashMap<String, CategoryLabel>,
    pub parallel: bool,
    pub chart: ChartConfig,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Config::default().effective_for_dataset("")
    }
}
