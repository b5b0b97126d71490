//! Gaussian kernel density estimation over depth vectors.
//!
//! Raw tallies are not comparable across categories of different sizes;
//! KDE turns each category's tallies into a probability distribution.
//! Each depth slot `d` contributes the mass a standard normal kernel of
//! bandwidth `h` assigns to the unit interval around `d`, so shallow
//! (near-keyword) occurrences dominate and deep ones fade smoothly
//! instead of cutting off.

use std::collections::BTreeMap;

use crate::error::{Result, TailGraphError};
use crate::model::Model;
use crate::types::{Category, ConceptKey};

/// Depth slots covered by the kernel. Slots beyond this carry no
/// probability mass.
pub const KERNEL_SLOTS: usize = 6;

/// Per-category concept probabilities, summing to 1.
pub type Distribution = BTreeMap<ConceptKey, f64>;

/// Error function, Abramowitz & Stegun 7.1.26. Absolute error below
/// 1.5e-7, well inside what the classifier can distinguish.
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal CDF.
fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Kernel weight of each covered depth slot: the normal mass over the
/// unit interval centered on the slot, scaled by bandwidth `h`.
pub fn kernel_weights(h: f64) -> [f64; KERNEL_SLOTS] {
    let mut weights = [0.0; KERNEL_SLOTS];
    for (d, w) in weights.iter_mut().enumerate() {
        let d = d as f64;
        *w = normal_cdf((d + 0.5) / h) - normal_cdf((d - 0.5) / h);
    }
    weights
}

/// Probability distribution over one category's concepts.
///
/// An empty category yields an empty distribution: every token misses,
/// which the classifier handles with the floor probability. A non-empty
/// category whose covered slots are all zero cannot be normalized and is
/// reported as degenerate.
pub fn category_probabilities(model: &Model, category: Category, h: f64) -> Result<Distribution> {
    let concepts = model.category(category);
    if concepts.is_empty() {
        return Ok(Distribution::new());
    }

    let n = model.total_mass(category) as f64;
    let weights = kernel_weights(h);
    let scale = 1.0 / (n * h);

    let mut scores = Distribution::new();
    for (key, depth_vector) in concepts {
        let kernel_sum: f64 = (0..KERNEL_SLOTS)
            .map(|d| f64::from(depth_vector.get(d)) * weights[d])
            .sum();
        scores.insert(key.clone(), scale * kernel_sum);
    }

    let total: f64 = scores.values().sum();
    if total <= 0.0 {
        return Err(TailGraphError::DegenerateCategory(category));
    }
    for score in scores.values_mut() {
        *score /= total;
    }
    Ok(scores)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn erf_matches_reference_values() {
        assert!((erf(0.0)).abs() < EPS);
        assert!((erf(1.0) - 0.842_700_79).abs() < 1e-6);
        assert!((erf(-1.0) + 0.842_700_79).abs() < 1e-6);
        assert!((erf(3.0) - 0.999_977_91).abs() < 1e-6);
    }

    #[test]
    fn cdf_is_symmetric_around_zero() {
        assert!((normal_cdf(0.0) - 0.5).abs() < EPS);
        assert!((normal_cdf(1.3) + normal_cdf(-1.3) - 1.0).abs() < EPS);
    }

    #[test]
    fn unit_bandwidth_weights() {
        let w = kernel_weights(1.0);
        // slot 0 straddles the mode: 2 * Phi(0.5) - 1
        assert!((w[0] - 0.382_924_9).abs() < 1e-5);
        // weights decay monotonically with depth
        for d in 1..KERNEL_SLOTS {
            assert!(w[d] < w[d - 1]);
        }
    }

    #[test]
    fn wider_bandwidth_flattens_the_kernel() {
        let narrow = kernel_weights(1.0);
        let wide = kernel_weights(3.0);
        assert!(wide[0] < narrow[0]);
        assert!(wide[5] > narrow[5]);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let mut model = Model::new();
        model.record(Category::Admin, "/c/en/office/", 0);
        model.record(Category::Admin, "/c/en/office/", 1);
        model.record(Category::Admin, "/c/en/desk/", 1);
        model.record(Category::Admin, "/c/en/files/", 2);

        let dist = category_probabilities(&model, Category::Admin, 1.0).unwrap();
        let total: f64 = dist.values().sum();
        assert!((total - 1.0).abs() < EPS);
        assert_eq!(dist.len(), 3);
    }

    #[test]
    fn shallow_mass_outweighs_deep_mass() {
        let mut model = Model::new();
        model.record(Category::Admin, "/c/en/near/", 0);
        model.record(Category::Admin, "/c/en/far/", 4);

        let dist = category_probabilities(&model, Category::Admin, 1.0).unwrap();
        assert!(dist[&ConceptKey::from_word("near")] > dist[&ConceptKey::from_word("far")]);
    }

    #[test]
    fn sole_concept_gets_full_probability() {
        let mut model = Model::new();
        model.record(Category::Legal, "/c/en/law/", 0);

        let dist = category_probabilities(&model, Category::Legal, 1.0).unwrap();
        assert!((dist[&ConceptKey::from_word("law")] - 1.0).abs() < EPS);
    }

    #[test]
    fn empty_category_yields_empty_distribution() {
        let model = Model::new();
        let dist = category_probabilities(&model, Category::Finance, 1.0).unwrap();
        assert!(dist.is_empty());
    }

    #[test]
    fn mass_beyond_kernel_reach_is_degenerate() {
        let mut model = Model::new();
        model.record_extended(Category::Health, "/c/en/remote/", 9, 5);

        let err = category_probabilities(&model, Category::Health, 1.0).unwrap_err();
        assert!(matches!(
            err,
            TailGraphError::DegenerateCategory(Category::Health)
        ));
    }
}
