//! Seeded synthetic catalogs for trying the assessment without real data

use super::{Dataset, Product};
use crate::{Category, CategoryLabel};
use anyhow::Result;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::{LogNormal, Normal};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Built-in catalog kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Bicycle,
    Smartphone,
    Car,
}

impl CatalogKind {
    fn name(self) -> &'static str {
        match self {
            CatalogKind::Bicycle => "bicycle",
            CatalogKind::Smartphone => "smartphone",
            CatalogKind::Car => "car",
        }
    }

    /// Product name prefix ("Bicycle 1", "Car 7", ...)
    fn product_prefix(self) -> &'static str {
        match self {
            CatalogKind::Bicycle => "Bicycle",
            CatalogKind::Smartphone => "Smartphone",
            CatalogKind::Car => "Car",
        }
    }

    fn features(self) -> &'static [(&'static str, Spread)] {
        use Spread::{LogNormal, Normal};
        match self {
            CatalogKind::Bicycle => &[
                ("Weight", Normal { mean: 15.0, std_dev: 2.0 }),
                ("AeroEff", Normal { mean: 7.0, std_dev: 1.5 }),
                ("WheelSize", Normal { mean: 26.0, std_dev: 1.5 }),
                ("FrameSize", Normal { mean: 55.0, std_dev: 5.0 }),
                ("GearCount", LogNormal { mu: 2.0, sigma: 0.25 }),
                ("MaxSpeed", Normal { mean: 30.0, std_dev: 5.0 }),
                ("BrakeEff", LogNormal { mu: 0.9, sigma: 0.1 }),
                ("Comfort", LogNormal { mu: 1.5, sigma: 0.2 }),
                ("Durability", LogNormal { mu: 3.0, sigma: 0.3 }),
                ("RideSmooth", LogNormal { mu: 2.0, sigma: 0.2 }),
            ],
            CatalogKind::Smartphone => &[
                ("BatteryLife", Normal { mean: 24.0, std_dev: 4.0 }),
                ("ScreenSize", Normal { mean: 6.0, std_dev: 0.5 }),
                ("ProcessorClock", Normal { mean: 2.5, std_dev: 0.5 }),
                ("CameraRes", LogNormal { mu: 2.5, sigma: 0.3 }),
                ("Memory", LogNormal { mu: 6.0, sigma: 0.4 }),
                ("Weight", Normal { mean: 200.0, std_dev: 20.0 }),
                ("Thickness", Normal { mean: 8.0, std_dev: 1.0 }),
                ("ChargingTime", LogNormal { mu: 0.5, sigma: 0.2 }),
                ("SignalQual", LogNormal { mu: 1.8, sigma: 0.1 }),
                ("Durability", LogNormal { mu: 2.0, sigma: 0.2 }),
            ],
            CatalogKind::Car => &[
                ("EnginePower", Normal { mean: 200.0, std_dev: 50.0 }),
                ("FuelEff", Normal { mean: 30.0, std_dev: 5.0 }),
                ("Acceleration", LogNormal { mu: 2.5, sigma: 0.25 }),
                ("CargoSpace", LogNormal { mu: 2.0, sigma: 0.5 }),
                ("Weight", Normal { mean: 1500.0, std_dev: 300.0 }),
                ("Length", Normal { mean: 4.5, std_dev: 0.5 }),
                ("Safety", LogNormal { mu: 2.0, sigma: 0.2 }),
                ("RideSmooth", LogNormal { mu: 2.0, sigma: 0.2 }),
                ("MaintenanceFreq", LogNormal { mu: 0.5, sigma: 0.3 }),
                ("Durability", Normal { mean: 10.0, std_dev: 3.0 }),
            ],
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CatalogKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bicycle" | "bicycles" | "bike" => Ok(CatalogKind::Bicycle),
            "smartphone" | "smartphones" | "phone" => Ok(CatalogKind::Smartphone),
            "car" | "cars" => Ok(CatalogKind::Car),
            other => anyhow::bail!(
                "Unknown catalog '{}': choose bicycle, smartphone or car",
                other
            ),
        }
    }
}

/// Sampling distribution of one feature column
#[derive(Debug, Clone, Copy)]
enum Spread {
    Normal { mean: f64, std_dev: f64 },
    /// Parameters of the underlying normal
    LogNormal { mu: f64, sigma: f64 },
}

impl Spread {
    fn sample_column(self, rng: &mut StdRng, n: usize) -> Result<Vec<f64>> {
        let column = match self {
            Spread::Normal { mean, std_dev } => {
                let normal = Normal::new(mean, std_dev)?;
                (0..n).map(|_| normal.sample(&mut *rng)).collect()
            }
            Spread::LogNormal { mu, sigma } => {
                let log_normal = LogNormal::new(mu, sigma)?;
                (0..n).map(|_| log_normal.sample(&mut *rng)).collect()
            }
        };
        Ok(column)
    }
}

/// Generate a catalog of `n_products` products. The same seed always yields
/// the same dataset; without one the catalog is drawn from entropy.
pub fn generate(kind: CatalogKind, n_products: usize, seed: Option<u64>) -> Result<Dataset> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let features = kind.features();
    let mut attributes = BTreeMap::new();
    attributes.insert("ProductID".to_string(), CategoryLabel::NotApplicable);
    attributes.insert("Name".to_string(), CategoryLabel::NotApplicable);

    // Sample column by column, like drawing one array per feature
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(features.len());
    for (_, spread) in features {
        columns.push(spread.sample_column(&mut rng, n_products)?);
    }

    for (feature, _) in features {
        let category = Category::ALL[rng.gen_range(0..Category::ALL.len())];
        attributes.insert(feature.to_string(), category.into());
    }

    let products = (0..n_products)
        .map(|i| Product {
            id: i as u32 + 1,
            name: format!("{} {}", kind.product_prefix(), i + 1),
            values: features
                .iter()
                .zip(&columns)
                .map(|((feature, _), column)| (feature.to_string(), column[i]))
                .collect(),
        })
        .collect();

    Ok(Dataset {
        name: kind.name().to_string(),
        columns: features.iter().map(|(f, _)| f.to_string()).collect(),
        attributes,
        products,
    })
}
