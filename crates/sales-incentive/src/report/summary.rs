use crate::facts::ManagerId;
use crate::grouping::partition_by;
use crate::scoring::RepresentativeScore;
use serde::Serialize;

/// Manager standing derived from the share of bonus-eligible representatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerRating {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl ManagerRating {
    pub fn from_eligible_rate(eligible_rate: f64) -> Self {
        if eligible_rate >= 80.0 {
            Self::Excellent
        } else if eligible_rate >= 60.0 {
            Self::Good
        } else if eligible_rate >= 40.0 {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerSummary {
    pub manager: ManagerId,
    pub average_score: f64,
    pub representative_count: usize,
    pub eligible_count: usize,
    /// Percentage, 0 to 100.
    pub eligible_rate: f64,
    pub rating: ManagerRating,
    pub rating_label: &'static str,
}

impl ManagerSummary {
    fn from_group(manager: ManagerId, group: &[&RepresentativeScore]) -> Self {
        let representative_count = group.len();
        let eligible_count = group
            .iter()
            .filter(|score| score.eligible_for_bonus)
            .count();

        let (average_score, eligible_rate) = if representative_count == 0 {
            (0.0, 0.0)
        } else {
            let total: f64 = group.iter().map(|score| score.total_score).sum();
            (
                total / representative_count as f64,
                eligible_count as f64 / representative_count as f64 * 100.0,
            )
        };

        let rating = ManagerRating::from_eligible_rate(eligible_rate);
        Self {
            manager,
            average_score,
            representative_count,
            eligible_count,
            eligible_rate,
            rating,
            rating_label: rating.label(),
        }
    }
}

/// Summary for one explicitly requested manager; zero-filled when nobody reports to them.
pub fn manager_summary(scores: &[RepresentativeScore], manager: &ManagerId) -> ManagerSummary {
    let group: Vec<&RepresentativeScore> = scores
        .iter()
        .filter(|score| &score.manager == manager)
        .collect();
    ManagerSummary::from_group(manager.clone(), &group)
}

/// One summary per manager present in `scores`, ordered by manager id.
pub fn manager_summaries(scores: &[RepresentativeScore]) -> Vec<ManagerSummary> {
    partition_by(scores, |score: &&RepresentativeScore| score.manager.clone())
        .into_iter()
        .map(|(manager, group)| ManagerSummary::from_group(manager, &group))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::score_for;

    #[test]
    fn averages_scores_per_manager() {
        let scores = vec![
            score_for("ST-1", "BM-1", 90.0, true),
            score_for("ST-2", "BM-1", 70.0, false),
            score_for("ST-3", "BM-2", 86.0, true),
        ];

        let summaries = manager_summaries(&scores);
        assert_eq!(summaries.len(), 2);

        let first = &summaries[0];
        assert_eq!(first.manager.as_str(), "BM-1");
        assert_eq!(first.average_score, 80.0);
        assert_eq!(first.representative_count, 2);
        assert_eq!(first.eligible_count, 1);
        assert_eq!(first.eligible_rate, 50.0);
        assert_eq!(first.rating, ManagerRating::Fair);

        let second = &summaries[1];
        assert_eq!(second.eligible_rate, 100.0);
        assert_eq!(second.rating, ManagerRating::Excellent);
    }

    #[test]
    fn requested_manager_without_representatives_is_zeroed() {
        let scores = vec![score_for("ST-1", "BM-1", 90.0, true)];
        let summary = manager_summary(&scores, &"BM-7".into());

        assert_eq!(summary.representative_count, 0);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.eligible_rate, 0.0);
        assert_eq!(summary.rating, ManagerRating::NeedsImprovement);
    }

    #[test]
    fn summaries_are_never_synthesized_for_absent_managers() {
        assert!(manager_summaries(&[]).is_empty());
    }

    #[test]
    fn rating_thresholds_are_inclusive() {
        assert_eq!(ManagerRating::from_eligible_rate(80.0), ManagerRating::Excellent);
        assert_eq!(ManagerRating::from_eligible_rate(60.0), ManagerRating::Good);
        assert_eq!(ManagerRating::from_eligible_rate(40.0), ManagerRating::Fair);
        assert_eq!(
            ManagerRating::from_eligible_rate(39.9),
            ManagerRating::NeedsImprovement
        );
    }
}
