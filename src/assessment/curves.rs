//! Kano response curves and decimal rounding

use crate::Category;

/// Unrounded novelty for a quality value on the given curve
pub fn novelty(quality: f64, category: Category) -> f64 {
    match category {
        Category::LinearQuality => quality,
        Category::MustBe => 0.5 * (quality - (quality * quality + 4.0).sqrt()),
        Category::Attractiveness => 0.5 * (quality + (quality * quality + 4.0).sqrt()),
    }
}

/// Round to `precision` decimal places, ties to even (scale, round, unscale)
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round_ties_even() / factor
}

/// Background curve used by the chart: novelty x mapped to quality y.
///
/// Must-be is drawn on the negative half, attractiveness on the positive
/// half, both as `y = x - 1/x`; linear quality is the diagonal.
pub fn reference_curve(novelty: f64, category: Category) -> Option<f64> {
    match category {
        Category::LinearQuality => Some(novelty),
        Category::MustBe if novelty < 0.0 => Some(novelty - 1.0 / novelty),
        Category::Attractiveness if novelty > 0.0 => Some(novelty - 1.0 / novelty),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn must_be_at_zero_is_minus_one() {
        assert_eq!(novelty(0.0, Category::MustBe), -1.0);
    }

    #[test]
    fn attractiveness_at_zero_is_plus_one() {
        assert_eq!(novelty(0.0, Category::Attractiveness), 1.0);
    }

    #[test]
    fn curves_mirror_each_other() {
        for q in [-6.0, -2.5, -0.1, 0.7, 3.0, 6.0] {
            let mb = novelty(q, Category::MustBe);
            let a = novelty(-q, Category::Attractiveness);
            assert!((mb + a).abs() < 1e-12, "q={}", q);
        }
    }

    #[test]
    fn rounding_uses_fixed_decimals() {
        assert_eq!(round_to(2.41421356, 3), 2.414);
        assert_eq!(round_to(-2.41421356, 3), -2.414);
        assert_eq!(round_to(4.82842712, 2), 4.83);
        assert_eq!(round_to(1.5, 0), 2.0);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn reference_curve_is_the_inverse_of_the_response() {
        // y = x - 1/x inverts n = 0.5 * (q + sqrt(q^2 + 4))
        let q = 2.0;
        let n = novelty(q, Category::Attractiveness);
        let back = reference_curve(n, Category::Attractiveness).unwrap();
        assert!((back - q).abs() < 1e-12);
        assert_eq!(reference_curve(1.0, Category::MustBe), None);
        assert_eq!(reference_curve(-1.0, Category::Attractiveness), None);
    }
}
