//! Weighted aggregation of category scores into the walkability index.

use crate::report::{CategoryResult, round_tenth};

/// Combine category scores into a 0–100 index.
///
/// The index is the weighted mean of the category scores, scaled to
/// 0–100 and rounded to one decimal place; the rounding is part of the
/// output contract. A total weight of zero yields `0.0` rather than an
/// error, so zero-weight categories can be reported without ever
/// dividing by zero. Aggregation is order-independent.
///
/// # Examples
/// ```
/// use flaneur_core::{Category, CategoryResult, combine_scores};
///
/// let entry = |label: &str, score: f64, weight: f64| CategoryResult {
///     category: Category::new(label).unwrap(),
///     score,
///     weight,
///     threshold_m: 300.0,
///     nearest_distance_m: None,
///     nearest_name: None,
///     nearby_count: 0,
/// };
/// let breakdown = [entry("park", 0.5, 1.0), entry("grocery", 1.0, 1.0)];
/// assert_eq!(combine_scores(&breakdown), 75.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "weighted-mean aggregation")]
pub fn combine_scores(breakdown: &[CategoryResult]) -> f64 {
    let total_weight: f64 = breakdown.iter().map(|entry| entry.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted_sum: f64 = breakdown
        .iter()
        .map(|entry| entry.score * entry.weight)
        .sum();
    round_tenth(100.0 * weighted_sum / total_weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poi::Category;
    use rstest::rstest;

    fn entry(label: &str, score: f64, weight: f64) -> CategoryResult {
        CategoryResult {
            category: Category::new(label).expect("valid category"),
            score,
            weight,
            threshold_m: 300.0,
            nearest_distance_m: None,
            nearest_name: None,
            nearby_count: 0,
        }
    }

    #[rstest]
    fn blends_scores_by_weight() {
        let breakdown = [entry("park", 0.5, 1.0), entry("grocery", 1.0, 1.0)];
        assert_eq!(combine_scores(&breakdown), 75.0);
    }

    #[rstest]
    fn zero_weight_categories_are_excluded() {
        let breakdown = [entry("park", 0.5, 0.0), entry("grocery", 1.0, 1.0)];
        assert_eq!(combine_scores(&breakdown), 100.0);
    }

    #[rstest]
    fn zero_total_weight_yields_zero_index() {
        let breakdown = [entry("park", 0.9, 0.0), entry("grocery", 1.0, 0.0)];
        assert_eq!(combine_scores(&breakdown), 0.0);
    }

    #[rstest]
    fn empty_breakdown_yields_zero_index() {
        assert_eq!(combine_scores(&[]), 0.0);
    }

    #[rstest]
    fn aggregation_is_order_independent() {
        let forward = [entry("park", 0.5, 1.0), entry("grocery", 1.0, 3.0)];
        let reversed = [entry("grocery", 1.0, 3.0), entry("park", 0.5, 1.0)];
        assert_eq!(combine_scores(&forward), combine_scores(&reversed));
    }

    #[rstest]
    fn index_is_rounded_to_one_decimal() {
        let breakdown = [entry("park", 1.0, 1.0), entry("grocery", 0.0, 2.0)];
        // 100 / 3 = 33.333...
        assert_eq!(combine_scores(&breakdown), 33.3);
    }
}
