use super::score::achievement_rate;
use super::weights::{KpiCategory, KpiWeight, WeightRegistry};
use crate::facts::{FactTables, Quarter, RepresentativeId};
use serde::{Deserialize, Serialize};

/// Orders expected per representative per quarter unless configured otherwise.
pub const DEFAULT_ORDER_BASELINE: f64 = 100.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderOutcome {
    pub target: f64,
    pub actual: u64,
    pub rate: f64,
    pub score: f64,
}

/// Measures order volume against a flat baseline shared by the whole cohort.
pub struct OrderSuccessScorer {
    kpi: KpiWeight,
    baseline: f64,
}

impl OrderSuccessScorer {
    pub fn new(registry: &WeightRegistry, baseline: f64) -> Self {
        Self {
            kpi: registry.kpi_weight(KpiCategory::OrderSuccess),
            baseline,
        }
    }

    pub fn score(
        &self,
        tables: &FactTables,
        representative: &RepresentativeId,
        quarter: Quarter,
    ) -> OrderOutcome {
        let rows: Vec<_> = tables
            .orders
            .iter()
            .filter(|order| &order.representative == representative)
            .filter(|order| quarter.contains(order.date))
            .collect();

        if rows.is_empty() {
            return OrderOutcome::default();
        }

        let actual: u64 = rows.iter().map(|order| u64::from(order.orders)).sum();
        let rate = achievement_rate(actual as f64, self.baseline);
        OrderOutcome {
            target: self.baseline,
            actual,
            rate,
            score: self.kpi.score(rate),
        }
    }
}
