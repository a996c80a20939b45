use crate::facts::{ManagerId, Region, RepresentativeId};
use crate::scoring::RepresentativeScore;
use serde::Serialize;
use std::cmp::Ordering;

/// Where a total score sits relative to the bonus threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Eligible,
    NearThreshold,
    BelowThreshold,
}

impl PerformanceTier {
    /// Scores within 10% under the threshold count as near it.
    pub fn classify(total_score: f64, bonus_threshold: f64) -> Self {
        if total_score >= bonus_threshold {
            Self::Eligible
        } else if total_score >= bonus_threshold * 0.9 {
            Self::NearThreshold
        } else {
            Self::BelowThreshold
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Eligible => "Eligible",
            Self::NearThreshold => "Near Threshold",
            Self::BelowThreshold => "Below Threshold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRepresentative {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub representative: RepresentativeId,
    pub manager: ManagerId,
    pub region: Region,
    pub total_score: f64,
}

impl RankedRepresentative {
    pub fn rank_all<'a, I>(scores: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a RepresentativeScore>,
    {
        scores
            .into_iter()
            .enumerate()
            .map(|(index, score)| Self {
                rank: index + 1,
                representative: score.representative.clone(),
                manager: score.manager.clone(),
                region: score.region.clone(),
                total_score: score.total_score,
            })
            .collect()
    }
}

/// Total order on scores, matching the sort in cohort statistics. A NaN total
/// sorts above every number.
fn by_score(left: &RepresentativeScore, right: &RepresentativeScore) -> Ordering {
    left.total_score.total_cmp(&right.total_score)
}

/// Highest `n` scores; equal scores keep their cohort order.
pub fn top_performers(scores: &[RepresentativeScore], n: usize) -> Vec<&RepresentativeScore> {
    let mut ranked: Vec<&RepresentativeScore> = scores.iter().collect();
    ranked.sort_by(|left, right| by_score(right, left));
    ranked.truncate(n);
    ranked
}

/// Lowest `n` scores; equal scores keep their cohort order.
pub fn bottom_performers(scores: &[RepresentativeScore], n: usize) -> Vec<&RepresentativeScore> {
    let mut ranked: Vec<&RepresentativeScore> = scores.iter().collect();
    ranked.sort_by(|left, right| by_score(left, right));
    ranked.truncate(n);
    ranked
}

/// Bonus-eligible representatives, best first.
pub fn bonus_roster(scores: &[RepresentativeScore]) -> Vec<RankedRepresentative> {
    let mut eligible: Vec<&RepresentativeScore> = scores
        .iter()
        .filter(|score| score.eligible_for_bonus)
        .collect();
    eligible.sort_by(|left, right| by_score(right, left));
    RankedRepresentative::rank_all(eligible)
}
