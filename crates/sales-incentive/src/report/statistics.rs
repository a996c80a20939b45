use crate::scoring::RepresentativeScore;
use serde::Serialize;

/// Distribution of total scores across a cohort. All zero for an empty cohort.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CohortStatistics {
    pub count: usize,
    pub eligible_count: usize,
    /// Percentage, 0 to 100.
    pub eligible_rate: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl CohortStatistics {
    pub fn from_scores(scores: &[RepresentativeScore]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }

        let mut totals: Vec<f64> = scores.iter().map(|score| score.total_score).collect();
        totals.sort_by(f64::total_cmp);

        let count = totals.len();
        let eligible_count = scores
            .iter()
            .filter(|score| score.eligible_for_bonus)
            .count();
        let mean = totals.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (totals[count / 2 - 1] + totals[count / 2]) / 2.0
        } else {
            totals[count / 2]
        };
        let variance = totals
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / count as f64;

        Self {
            count,
            eligible_count,
            eligible_rate: eligible_count as f64 / count as f64 * 100.0,
            mean,
            median,
            min: totals[0],
            max: totals[count - 1],
            std_dev: variance.sqrt(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
