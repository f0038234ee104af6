//! Kano: innovation assessment for product features
//!
//! This library maps measured feature qualities onto the three canonical Kano
//! response curves, derives a novelty value and an area metric per feature,
//! classifies each feature into one of four quadrants and reports the most
//! influential feature in every quadrant.

pub mod assessment;
pub mod config;
pub mod dataset;
pub mod distribution;
pub mod error;
pub mod logging;
pub mod reporter;
pub mod rescale;

pub use error::{AssessmentError, Result};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Lower bound of the quality (and novelty) domain
pub const QUALITY_MIN: f64 = -6.0;
/// Upper bound of the quality (and novelty) domain
pub const QUALITY_MAX: f64 = 6.0;
/// Decimal places used for novelty and area unless configured otherwise
pub const DEFAULT_PRECISION: u32 = 3;
/// Most decimal places a rounding step may keep; beyond this `10^p` leaves f64's exact range
pub const MAX_PRECISION: u32 = 15;

/// Kano response curve of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Linear quality: novelty grows one-to-one with quality
    #[serde(rename = "LQ")]
    LinearQuality,
    /// Must-be: never yields positive novelty
    #[serde(rename = "MB")]
    MustBe,
    /// Attractiveness: never yields negative novelty
    #[serde(rename = "A")]
    Attractiveness,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::LinearQuality,
        Category::MustBe,
        Category::Attractiveness,
    ];

    /// Short label as used in datasets (LQ, MB, A)
    pub fn code(self) -> &'static str {
        match self {
            Category::LinearQuality => "LQ",
            Category::MustBe => "MB",
            Category::Attractiveness => "A",
        }
    }

    /// Human-readable curve name
    pub fn name(self) -> &'static str {
        match self {
            Category::LinearQuality => "Linear Quality",
            Category::MustBe => "Must Be",
            Category::Attractiveness => "Attractiveness",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Category {
    type Err = AssessmentError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "LQ" => Ok(Category::LinearQuality),
            "MB" => Ok(Category::MustBe),
            "A" => Ok(Category::Attractiveness),
            other => Err(AssessmentError::InvalidCategory {
                label: other.to_string(),
            }),
        }
    }
}

/// Category label as carried by a data source. `NA` marks identifier
/// columns (product id, name) that never reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryLabel {
    #[serde(rename = "LQ")]
    LinearQuality,
    #[serde(rename = "MB")]
    MustBe,
    #[serde(rename = "A")]
    Attractiveness,
    #[serde(rename = "NA")]
    NotApplicable,
}

impl CategoryLabel {
    /// The assessable category, or None for the NA sentinel
    pub fn category(self) -> Option<Category> {
        match self {
            CategoryLabel::LinearQuality => Some(Category::LinearQuality),
            CategoryLabel::MustBe => Some(Category::MustBe),
            CategoryLabel::Attractiveness => Some(Category::Attractiveness),
            CategoryLabel::NotApplicable => None,
        }
    }
}

impl From<Category> for CategoryLabel {
    fn from(category: Category) -> Self {
        match category {
            Category::LinearQuality => CategoryLabel::LinearQuality,
            Category::MustBe => CategoryLabel::MustBe,
            Category::Attractiveness => CategoryLabel::Attractiveness,
        }
    }
}

impl FromStr for CategoryLabel {
    type Err = AssessmentError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "NA" {
            return Ok(CategoryLabel::NotApplicable);
        }
        s.parse::<Category>().map(CategoryLabel::from)
    }
}

impl std::fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.category() {
            Some(category) => write!(f, "{}", category),
            None => write!(f, "NA"),
        }
    }
}

/// Quadrant of the novelty x quality plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quadrant {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    /// Classify by sign of quality and novelty. Zero counts as non-positive
    /// on both axes.
    pub fn classify(quality: f64, novelty: f64) -> Self {
        if quality > 0.0 {
            if novelty > 0.0 {
                Quadrant::Q1
            } else {
                Quadrant::Q2
            }
        } else if novelty > 0.0 {
            Quadrant::Q4
        } else {
            Quadrant::Q3
        }
    }

    /// Field name used in reports
    pub fn label(self) -> &'static str {
        match self {
            Quadrant::Q1 => "Effective innovation",
            Quadrant::Q2 => "Standard solutions",
            Quadrant::Q3 => "Design error field",
            Quadrant::Q4 => "Ineffective innovation",
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quadrant::Q1 => write!(f, "Q1"),
            Quadrant::Q2 => write!(f, "Q2"),
            Quadrant::Q3 => write!(f, "Q3"),
            Quadrant::Q4 => write!(f, "Q4"),
        }
    }
}

/// One assessed feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    /// Feature (column) name
    pub feature_name: String,
    /// Kano curve the feature follows
    pub category: Category,
    /// Quality as supplied, within [-6, 6]
    pub quality: f64,
    /// Rounded novelty value
    pub novelty: f64,
    /// Rounded |novelty * quality|
    pub area: f64,
    /// Quadrant derived from quality and novelty
    pub quadrant: Quadrant,
}

/// Per-quadrant view: the max-area leader (if any) and all member names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadrantBreakdown {
    pub quadrant: Quadrant,
    pub label: String,
    /// None when the quadrant holds no features
    pub leader: Option<FeatureRecord>,
    pub members: Vec<String>,
}

/// Maximum-area record per quadrant; empty quadrants map to None
pub type QuadrantLeaders = BTreeMap<Quadrant, Option<FeatureRecord>>;

/// Product an assessment was computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: u32,
    pub name: String,
}

/// The complete assessment of one product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    /// Dataset name (e.g. "bicycle")
    pub dataset: String,
    /// The assessed product
    pub product: ProductRef,
    /// Decimal places used for novelty and area
    pub precision: u32,
    /// Per-feature records in column order
    pub records: Vec<FeatureRecord>,
    /// Q1..Q4 breakdown
    pub quadrants: Vec<QuadrantBreakdown>,
}

impl AssessmentResult {
    /// Breakdown entry for a quadrant
    pub fn quadrant(&self, quadrant: Quadrant) -> Option<&QuadrantBreakdown> {
        self.quadrants.iter().find(|q| q.quadrant == quadrant)
    }
}

/// Public API: load a dataset file and assess one product (by id or name).
///
/// * `dataset_path` - JSON dataset file
/// * `product` - product id or product name
/// * `work_dir` - directory for config lookup
/// * `config_path` - optional path to .kanorc.json; if None, searches from work_dir
pub fn assess_file(
    dataset_path: &std::path::Path,
    product: &str,
    work_dir: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<AssessmentResult> {
    let config = crate::config::load_config(work_dir, config_path)?;
    let dataset = crate::dataset::Dataset::load(dataset_path)?;
    let effective = config.effective_for_dataset(&dataset.name);
    let engine = crate::assessment::AssessmentEngine::new()
        .with_precision(effective.precision)
        .with_parallel(effective.parallel);
    engine.assess_product(&dataset, product, &effective)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_known_labels() {
        assert_eq!("LQ".parse::<Category>().unwrap(), Category::LinearQuality);
        assert_eq!("MB".parse::<Category>().unwrap(), Category::MustBe);
        assert_eq!("A".parse::<Category>().unwrap(), Category::Attractiveness);
    }

    #[test]
    fn category_rejects_unknown_label() {
        let err = "XYZ".parse::<Category>().unwrap_err();
        assert!(matches!(err, AssessmentError::InvalidCategory { ref label } if label == "XYZ"));
        // NA is a data-source sentinel, not a category
        assert!("NA".parse::<Category>().is_err());
        assert_eq!(
            "NA".parse::<CategoryLabel>().unwrap(),
            CategoryLabel::NotApplicable
        );
    }

    #[test]
    fn quadrant_routes_zero_to_non_positive_branch() {
        assert_eq!(Quadrant::classify(3.0, 3.0), Quadrant::Q1);
        assert_eq!(Quadrant::classify(3.0, -1.0), Quadrant::Q2);
        assert_eq!(Quadrant::classify(-2.0, -2.414), Quadrant::Q3);
        assert_eq!(Quadrant::classify(-2.0, 0.414), Quadrant::Q4);
        assert_eq!(Quadrant::classify(0.0, 5.0), Quadrant::Q4);
        assert_eq!(Quadrant::classify(5.0, 0.0), Quadrant::Q2);
        assert_eq!(Quadrant::classify(0.0, 0.0), Quadrant::Q3);
        assert_eq!(Quadrant::classify(0.0, -1.0), Quadrant::Q3);
    }

    #[test]
    fn category_serializes_as_code() {
        let json = serde_json::to_string(&Category::MustBe).unwrap();
        assert_eq!(json, "\"MB\"");
        let label: CategoryLabel = serde_json::from_str("\"NA\"").unwrap();
        assert_eq!(label.category(), None);
    }
}
