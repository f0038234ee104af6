//! Product datasets: raw measurements plus a category per column
//!
//! A dataset is the data-source side of the pipeline. It owns the raw
//! per-product measurements and the category table, filters out identifier
//! columns tagged `NA`, and produces rescaled quality rows for the engine.

pub mod synthetic;

use crate::distribution::DistributionReport;
use crate::error::AssessmentError;
use crate::rescale::Rescaler;
use crate::{Category, CategoryLabel, ProductRef};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One product row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    /// Raw measurement per feature column
    pub values: BTreeMap<String, f64>,
}

impl Product {
    pub fn reference(&self) -> ProductRef {
        ProductRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// A catalog of products and the category table for its columns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Catalog name (e.g. "bicycle")
    pub name: String,
    /// Feature columns in display order
    pub columns: Vec<String>,
    /// Category label per column; identifier columns carry NA
    pub attributes: BTreeMap<String, CategoryLabel>,
    pub products: Vec<Product>,
}

/// Rescaled qualities for a set of assessable features
#[derive(Debug, Clone)]
pub struct QualityTable {
    pub features: Vec<String>,
    pub categories: Vec<Category>,
    /// One rescaled column per feature, indexed by product position
    columns: Vec<Vec<f64>>,
}

impl QualityTable {
    /// Qualities of the product at `index`, in feature order
    pub fn row(&self, index: usize) -> Vec<f64> {
        self.columns.iter().map(|column| column[index]).collect()
    }

    pub fn product_count(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }
}

impl Dataset {
    /// Read a dataset from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
        let dataset: Dataset = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in dataset: {}", path.display()))?;
        dataset
            .validate()
            .with_context(|| format!("Malformed dataset: {}", path.display()))?;
        debug!(
            dataset = %dataset.name,
            products = dataset.products.len(),
            columns = dataset.columns.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Write the dataset as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write dataset: {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.as_str()) {
                anyhow::bail!("duplicate column '{}'", column);
            }
        }
        if self.products.is_empty() {
            anyhow::bail!("dataset '{}' has no products", self.name);
        }
        Ok(())
    }

    /// Find a product by numeric id or by exact name
    pub fn find_product(&self, key: &str) -> Option<(usize, &Product)> {
        let by_id = key.parse::<u32>().ok();
        self.products
            .iter()
            .enumerate()
            .find(|(_, p)| Some(p.id) == by_id || p.name == key)
    }

    /// Category of a feature. Overrides win over the dataset's own table;
    /// `None` means the column is an NA identifier.
    pub fn category_of(
        &self,
        feature: &str,
        overrides: &HashMap<String, CategoryLabel>,
    ) -> crate::Result<Option<Category>> {
        overrides
            .get(feature)
            .or_else(|| self.attributes.get(feature))
            .map(|label| label.category())
            .ok_or_else(|| AssessmentError::UnknownFeature {
                feature: feature.to_string(),
            })
    }

    /// Assessable columns with their categories, NA columns dropped
    pub fn feature_columns(
        &self,
        overrides: &HashMap<String, CategoryLabel>,
    ) -> crate::Result<Vec<(String, Category)>> {
        let mut features = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            match self.category_of(column, overrides)? {
                Some(category) => features.push((column.clone(), category)),
                None => debug!(column = %column, "skipping NA column"),
            }
        }
        Ok(features)
    }

    /// Raw values of one column across all products
    pub fn column_values(&self, feature: &str) -> Result<Vec<f64>> {
        self.products
            .iter()
            .map(|p| {
                p.values.get(feature).copied().with_context(|| {
                    format!(
                        "Product {} ({}) has no value for '{}'",
                        p.id, p.name, feature
                    )
                })
            })
            .collect()
    }

    /// Normality diagnostics for one raw column
    pub fn distribution(&self, feature: &str, bins: Option<usize>) -> Result<DistributionReport> {
        if !self.columns.iter().any(|c| c == feature) {
            anyhow::bail!(
                "Feature '{}' is not a column of dataset '{}'",
                feature,
                self.name
            );
        }
        let values = self.column_values(feature)?;
        let report = DistributionReport::analyze(&self.name, feature, &values, bins)
            .map_err(|e| e.for_feature(feature))?;
        Ok(report)
    }

    /// Rescale every assessable column across products.
    ///
    /// Features named in `inverse` are sign-flipped ("lower is better").
    pub fn quality_table(
        &self,
        features: &[(String, Category)],
        inverse: &HashSet<String>,
    ) -> Result<QualityTable> {
        for name in inverse {
            if !features.iter().any(|(f, _)| f == name) {
                warn!(feature = %name, dataset = %self.name, "inverse feature not in dataset");
            }
        }

        let rescaler = Rescaler::new();
        let mut columns = Vec::with_capacity(features.len());
        for (feature, _) in features {
            let raw = self.column_values(feature)?;
            let rescaled = rescaler
                .rescale(&raw, inverse.contains(feature))
                .map_err(|e| e.for_feature(feature.as_str()))?;
            columns.push(rescaled);
        }

        Ok(QualityTable {
            features: features.iter().map(|(f, _)| f.clone()).collect(),
            categories: features.iter().map(|(_, c)| *c).collect(),
            columns,
        })
    }
}
