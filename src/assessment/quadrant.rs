//! Quadrant aggregation over assessed features

use crate::{FeatureRecord, Quadrant, QuadrantBreakdown, QuadrantLeaders};

/// Record with the largest area in each quadrant.
///
/// Ties keep the first record in input order. Quadrants without members map
/// to `None` rather than failing.
pub fn max_area_per_quadrant(records: &[FeatureRecord]) -> QuadrantLeaders {
    let mut leaders: QuadrantLeaders = Quadrant::ALL.iter().map(|q| (*q, None)).collect();

    for record in records {
        let slot = leaders.entry(record.quadrant).or_insert(None);
        let replace = match slot {
            Some(current) => record.area > current.area,
            None => true,
        };
        if replace {
            *slot = Some(record.clone());
        }
    }

    leaders
}

/// Names of the features in a quadrant, in input order
pub fn members(records: &[FeatureRecord], quadrant: Quadrant) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.quadrant == quadrant)
        .map(|r| r.feature_name.clone())
        .collect()
}

/// Q1..Q4 breakdown combining leaders and member lists
pub fn quadrant_breakdown(records: &[FeatureRecord]) -> Vec<QuadrantBreakdown> {
    let mut leaders = max_area_per_quadrant(records);
    Quadrant::ALL
        .iter()
        .map(|&quadrant| QuadrantBreakdown {
            quadrant,
            label: quadrant.label().to_string(),
            leader: leaders.remove(&quadrant).flatten(),
            members: members(records, quadrant),
        })
        .collect()
}
