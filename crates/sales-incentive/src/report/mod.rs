//! Cohort-level rollups handed to the report writer.
//!
//! Everything here is derived fresh from a list of representative scores and
//! carries no formatting concerns.

mod products;
mod ranking;
mod statistics;
mod summary;

pub use products::{product_rollup, ProductRollup};
pub use ranking::{
    bonus_roster, bottom_performers, top_performers, PerformanceTier, RankedRepresentative,
};
pub use statistics::CohortStatistics;
pub use summary::{manager_summaries, manager_summary, ManagerRating, ManagerSummary};

use crate::facts::Quarter;
use crate::scoring::{RepresentativeScore, ScoringObserver, ScoringWarning};
use serde::Serialize;

/// Representative score annotated with its threshold tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepresentativeEntry {
    #[serde(flatten)]
    pub score: RepresentativeScore,
    pub tier: PerformanceTier,
    pub tier_label: &'static str,
}

/// Everything the report writer needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortReport {
    pub quarter: Quarter,
    pub bonus_threshold: f64,
    pub representatives: Vec<RepresentativeEntry>,
    pub managers: Vec<ManagerSummary>,
    pub statistics: CohortStatistics,
    pub top_performers: Vec<RankedRepresentative>,
    pub bottom_performers: Vec<RankedRepresentative>,
    pub products: Vec<ProductRollup>,
    pub bonus_roster: Vec<RankedRepresentative>,
}

impl CohortReport {
    pub fn build(
        quarter: Quarter,
        scores: &[RepresentativeScore],
        bonus_threshold: f64,
        top_n: usize,
        observer: &dyn ScoringObserver,
    ) -> Self {
        if scores.is_empty() {
            observer.warning(&ScoringWarning::EmptyCohort);
        }

        let representatives = scores
            .iter()
            .map(|score| {
                let tier = PerformanceTier::classify(score.total_score, bonus_threshold);
                RepresentativeEntry {
                    score: score.clone(),
                    tier,
                    tier_label: tier.label(),
                }
            })
            .collect();

        Self {
            quarter,
            bonus_threshold,
            representatives,
            managers: manager_summaries(scores),
            statistics: CohortStatistics::from_scores(scores),
            top_performers: RankedRepresentative::rank_all(top_performers(scores, top_n)),
            bottom_performers: RankedRepresentative::rank_all(bottom_performers(scores, top_n)),
            products: product_rollup(scores),
            bonus_roster: bonus_roster(scores),
        }
    }
}
