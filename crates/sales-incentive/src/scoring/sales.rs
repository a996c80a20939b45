use super::observer::ScoringObserver;
use super::score::achievement_rate;
use super::weights::{KpiCategory, WeightRegistry};
use crate::facts::{Brick, FactTables, ProductGroup, Quarter, RepresentativeId, TargetFact};
use crate::grouping::partition_by;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per product group outcome for one representative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductScore {
    pub target: f64,
    pub actual: f64,
    pub rate: f64,
    pub weight: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesOutcome {
    pub products: BTreeMap<ProductGroup, ProductScore>,
    /// Sum of the product scores; no cap beyond the per-group one.
    pub total: f64,
}

/// Scores sell-out against targets per product group.
///
/// Actuals are reported per brick, so a representative is credited with the
/// sell-out of exactly those bricks they hold a target for in that product group.
pub struct SalesScorer<'a> {
    registry: &'a WeightRegistry,
}

impl<'a> SalesScorer<'a> {
    pub fn new(registry: &'a WeightRegistry) -> Self {
        Self { registry }
    }

    pub fn score(
        &self,
        tables: &FactTables,
        representative: &RepresentativeId,
        quarter: Quarter,
        observer: &dyn ScoringObserver,
    ) -> SalesOutcome {
        let band = self.registry.kpi_weight(KpiCategory::SalesVolume).band();

        let own_targets = tables
            .targets
            .iter()
            .filter(|fact| &fact.representative == representative)
            .filter(|fact| quarter.contains_month(fact.month));
        let by_product = partition_by(own_targets, |fact: &&TargetFact| {
            fact.product_group.clone()
        });

        let products: BTreeMap<ProductGroup, ProductScore> = by_product
            .into_iter()
            .map(|(product, rows)| {
                let target: f64 = rows.iter().map(|fact| fact.quantity).sum();
                let bricks: BTreeSet<&Brick> = rows.iter().map(|fact| &fact.brick).collect();
                let actual = attributed_actual(tables, &product, &bricks, quarter);

                let rate = achievement_rate(actual, target);
                let weight = self.registry.resolve(&product, observer);
                let score = band.score(rate, weight);

                (
                    product,
                    ProductScore {
                        target,
                        actual,
                        rate,
                        weight,
                        score,
                    },
                )
            })
            .collect();

        let total = products.values().map(|product| product.score).sum();
        SalesOutcome { products, total }
    }
}

fn attributed_actual(
    tables: &FactTables,
    product: &ProductGroup,
    bricks: &BTreeSet<&Brick>,
    quarter: Quarter,
) -> f64 {
    tables
        .actuals
        .iter()
        .filter(|fact| &fact.product_group == product)
        .filter(|fact| bricks.contains(&fact.brick))
        .filter(|fact| quarter.contains(fact.date))
        .map(|fact| fact.quantity)
        .sum()
}
