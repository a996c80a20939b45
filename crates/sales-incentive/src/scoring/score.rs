use serde::Serialize;

pub const DEFAULT_MIN_THRESHOLD: f64 = 0.85;
pub const DEFAULT_MAX_THRESHOLD: f64 = 1.65;

/// Rate floor and ceiling applied when turning an achievement rate into points.
///
/// Only built through [`ScoreBand::new`] or `Default`, so the floor is always
/// below the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBand {
    min_threshold: f64,
    max_threshold: f64,
}

impl Default for ScoreBand {
    fn default() -> Self {
        Self {
            min_threshold: DEFAULT_MIN_THRESHOLD,
            max_threshold: DEFAULT_MAX_THRESHOLD,
        }
    }
}

impl ScoreBand {
    pub fn new(min_threshold: f64, max_threshold: f64) -> Option<Self> {
        (min_threshold < max_threshold).then_some(Self {
            min_threshold,
            max_threshold,
        })
    }

    pub fn min_threshold(&self) -> f64 {
        self.min_threshold
    }

    pub fn max_threshold(&self) -> f64 {
        self.max_threshold
    }

    /// Below the floor earns nothing, above the ceiling is capped at `weight * max_threshold`.
    pub fn score(&self, rate: f64, weight: f64) -> f64 {
        if rate < self.min_threshold {
            0.0
        } else if rate > self.max_threshold {
            weight * self.max_threshold
        } else {
            weight * rate
        }
    }
}

/// Score with the default 0.85 / 1.65 band.
pub fn score(rate: f64, weight: f64) -> f64 {
    ScoreBand::default().score(rate, weight)
}

/// `actual / target`, or 0 when there is no positive target to measure against.
///
/// Negative actuals are not clamped; they yield a negative rate.
pub fn achievement_rate(actual: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    actual / target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_divides_actual_by_positive_target() {
        assert_eq!(achievement_rate(850.0, 1000.0), 0.85);
        assert_eq!(achievement_rate(1000.0, 1000.0), 1.0);
        assert_eq!(achievement_rate(1650.0, 1000.0), 1.65);
        assert_eq!(achievement_rate(0.0, 1000.0), 0.0);
    }

    #[test]
    fn rate_is_zero_without_positive_target() {
        assert_eq!(achievement_rate(100.0, 0.0), 0.0);
        assert_eq!(achievement_rate(100.0, -50.0), 0.0);
        assert_eq!(achievement_rate(-100.0, -50.0), 0.0);
    }

    #[test]
    fn negative_actual_propagates_into_rate() {
        assert_eq!(achievement_rate(-200.0, 1000.0), -0.2);
    }

    #[test]
    fn below_floor_scores_zero() {
        assert_eq!(score(0.84, 10.0), 0.0);
        assert_eq!(score(0.50, 15.0), 0.0);
        assert_eq!(score(-0.2, 60.0), 0.0);
    }

    #[test]
    fn floor_is_inclusive() {
        assert_eq!(score(0.85, 60.0), 60.0 * 0.85);
        assert_eq!(score(0.85, 60.0), 51.0);
    }

    #[test]
    fn linear_between_floor_and_ceiling() {
        assert_eq!(score(1.0, 10.0), 10.0);
        assert_eq!(score(0.90, 10.0), 9.0);
        assert_eq!(score(1.20, 15.0), 18.0);
        assert_eq!(score(1.65, 60.0), 60.0 * 1.65);
    }

    #[test]
    fn ceiling_caps_over_achievement() {
        assert_eq!(score(1.80, 15.0), 15.0 * 1.65);
        assert_eq!(score(2.0, 10.0), 16.5);
        assert_eq!(score(2.0, 60.0), score(1.65, 60.0));
    }

    #[test]
    fn custom_band_requires_ordered_thresholds() {
        assert!(ScoreBand::new(1.0, 1.0).is_none());
        assert!(ScoreBand::new(1.2, 1.0).is_none());

        let band = ScoreBand::new(0.5, 1.0).expect("ordered band");
        assert_eq!(band.score(0.49, 10.0), 0.0);
        assert_eq!(band.score(0.5, 10.0), 5.0);
        assert_eq!(band.score(3.0, 10.0), 10.0);
        assert_eq!(band.min_threshold(), 0.5);
        assert_eq!(band.max_threshold(), 1.0);
    }

    #[test]
    fn default_band_uses_standard_thresholds() {
        let band = ScoreBand::default();
        assert_eq!(band.min_threshold(), DEFAULT_MIN_THRESHOLD);
        assert_eq!(band.max_threshold(), DEFAULT_MAX_THRESHOLD);
    }
}
