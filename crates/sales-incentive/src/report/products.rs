use crate::facts::ProductGroup;
use crate::grouping::partition_by;
use crate::scoring::{ProductScore, RepresentativeScore};
use serde::Serialize;

/// Cohort-wide target versus sell-out for one product group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRollup {
    pub product_group: ProductGroup,
    pub total_target: f64,
    pub total_actual: f64,
    /// `total_actual / total_target * 100`, or 0 without a positive target.
    pub achievement_pct: f64,
    pub representative_count: usize,
}

/// One rollup per product group appearing in any score, ordered by group name.
pub fn product_rollup(scores: &[RepresentativeScore]) -> Vec<ProductRollup> {
    let entries = scores.iter().flat_map(|score| score.product_scores.iter());

    partition_by(entries, |(group, _): &(&ProductGroup, &ProductScore)| {
        (*group).clone()
    })
    .into_iter()
    .map(|(product_group, rows)| {
        let total_target: f64 = rows.iter().map(|(_, product)| product.target).sum();
        let total_actual: f64 = rows.iter().map(|(_, product)| product.actual).sum();
        let achievement_pct = if total_target > 0.0 {
            total_actual / total_target * 100.0
        } else {
            0.0
        };

        ProductRollup {
            product_group,
            total_target,
            total_actual,
            achievement_pct,
            representative_count: rows.len(),
        }
    })
    .collect()
}
