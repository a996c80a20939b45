use super::weights::{KpiCategory, KpiWeight, WeightRegistry};
use crate::facts::{FactTables, Quarter, RepresentativeId};
use serde::{Deserialize, Serialize};

/// Planned versus completed visits for one representative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteOutcome {
    pub planned: usize,
    pub actual: usize,
    pub rate: f64,
    pub score: f64,
}

pub struct RouteComplianceScorer {
    kpi: KpiWeight,
}

impl RouteComplianceScorer {
    pub fn new(registry: &WeightRegistry) -> Self {
        Self {
            kpi: registry.kpi_weight(KpiCategory::RouteCompliance),
        }
    }

    pub fn score(
        &self,
        tables: &FactTables,
        representative: &RepresentativeId,
        quarter: Quarter,
    ) -> RouteOutcome {
        let (planned, actual) = tables
            .visits
            .iter()
            .filter(|visit| &visit.representative == representative)
            .filter(|visit| quarter.contains(visit.date))
            .fold((0usize, 0usize), |(planned, actual), visit| {
                (planned + 1, actual + usize::from(visit.completed))
            });

        route_outcome(planned, actual, self.kpi)
    }
}

fn route_outcome(planned: usize, actual: usize, kpi: KpiWeight) -> RouteOutcome {
    if planned == 0 {
        return RouteOutcome::default();
    }

    let rate = actual as f64 / planned as f64;
    RouteOutcome {
        planned,
        actual,
        rate,
        score: kpi.score(rate),
    }
}
