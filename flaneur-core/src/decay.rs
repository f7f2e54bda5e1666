//! Distance-decay scoring policies.
//!
//! A decay policy maps the distance to the nearest POI of a category onto a
//! desirability score in `0.0..=1.0`. The policy is a deployment-wide
//! constant chosen once when the engine is built, never per request.

/// Sigmoid steepness is derived from the threshold: `k = threshold / 4`.
const SIGMOID_STEEPNESS_DIVISOR: f64 = 4.0;

/// Maps a distance to a desirability score in `0.0..=1.0`.
///
/// Both policies are monotonically non-increasing in distance and clamp to
/// the unit interval. `None` (no POI of the category exists) always scores
/// `0.0`.
///
/// # Examples
/// ```
/// use flaneur_core::DecayPolicy;
///
/// let policy = DecayPolicy::default();
/// assert_eq!(policy.score(Some(0.0), 200.0), 1.0);
/// assert_eq!(policy.score(Some(100.0), 200.0), 0.5);
/// assert_eq!(policy.score(Some(200.0), 200.0), 0.0);
/// assert_eq!(policy.score(None, 200.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecayPolicy {
    /// `1 - d/t` inside the threshold, `0` at or beyond it.
    #[default]
    Linear,
    /// `1 / (1 + exp((d - t) / k))` with `k = t / 4`.
    ///
    /// A smoother falloff than [`DecayPolicy::Linear`]: the score is ~0.5
    /// at the threshold rather than 0.
    Sigmoid,
}

impl DecayPolicy {
    /// Score a distance against a threshold in metres.
    ///
    /// The threshold must be finite and positive;
    /// [`CategoryQuery`](crate::CategoryQuery) upholds this before any
    /// distance reaches the scorer. Non-finite distances score `0.0`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "decay curves are arithmetic on metric distances"
    )]
    pub fn score(self, distance_m: Option<f64>, threshold_m: f64) -> f64 {
        debug_assert!(threshold_m.is_finite() && threshold_m > 0.0);
        let Some(distance_m) = distance_m else {
            return 0.0;
        };
        if !distance_m.is_finite() {
            return 0.0;
        }
        let raw = match self {
            Self::Linear => {
                if distance_m >= threshold_m {
                    0.0
                } else {
                    1.0 - distance_m / threshold_m
                }
            }
            Self::Sigmoid => {
                let k = threshold_m / SIGMOID_STEEPNESS_DIVISOR;
                1.0 / (1.0 + ((distance_m - threshold_m) / k).exp())
            }
        };
        raw.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-9;

    #[rstest]
    #[case(Some(0.0), 200.0, 1.0)]
    #[case(Some(50.0), 200.0, 0.75)]
    #[case(Some(100.0), 200.0, 0.5)]
    #[case(Some(200.0), 200.0, 0.0)]
    #[case(Some(350.0), 200.0, 0.0)]
    #[case(None, 200.0, 0.0)]
    fn linear_decay_scenarios(
        #[case] distance_m: Option<f64>,
        #[case] threshold_m: f64,
        #[case] expected: f64,
    ) {
        let score = DecayPolicy::Linear.score(distance_m, threshold_m);
        assert!((score - expected).abs() <= TOLERANCE);
    }

    #[rstest]
    fn sigmoid_is_half_at_the_threshold() {
        let score = DecayPolicy::Sigmoid.score(Some(400.0), 400.0);
        assert!((score - 0.5).abs() <= TOLERANCE);
    }

    #[rstest]
    fn sigmoid_scores_none_as_zero() {
        assert_eq!(DecayPolicy::Sigmoid.score(None, 400.0), 0.0);
    }

    #[rstest]
    #[case(DecayPolicy::Linear)]
    #[case(DecayPolicy::Sigmoid)]
    fn scores_decrease_with_distance(#[case] policy: DecayPolicy) {
        let near = policy.score(Some(10.0), 300.0);
        let far = policy.score(Some(250.0), 300.0);
        assert!(far < near);
    }

    #[rstest]
    #[case(DecayPolicy::Linear)]
    #[case(DecayPolicy::Sigmoid)]
    fn non_finite_distances_score_zero(#[case] policy: DecayPolicy) {
        assert_eq!(policy.score(Some(f64::NAN), 300.0), 0.0);
        assert_eq!(policy.score(Some(f64::INFINITY), 300.0), 0.0);
    }
}
