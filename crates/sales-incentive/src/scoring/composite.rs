use super::observer::{ScoringObserver, ScoringWarning};
use super::orders::{OrderOutcome, OrderSuccessScorer};
use super::route::{RouteComplianceScorer, RouteOutcome};
use super::sales::{ProductScore, SalesScorer};
use super::weights::{KpiCategory, ScorecardRow, WeightRegistry};
use crate::config::EngineConfig;
use crate::facts::{
    AssignmentField, Assignments, FactTables, ManagerId, ProductGroup, Quarter, Region,
    RepresentativeId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scoring result for one representative and one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepresentativeScore {
    pub representative: RepresentativeId,
    pub manager: ManagerId,
    pub region: Region,
    pub kpi_scores: BTreeMap<KpiCategory, f64>,
    pub product_scores: BTreeMap<ProductGroup, ProductScore>,
    pub route: RouteOutcome,
    pub orders: OrderOutcome,
    /// Sum of `kpi_scores`.
    pub total_score: f64,
    pub eligible_for_bonus: bool,
}

impl RepresentativeScore {
    pub fn kpi_score(&self, category: KpiCategory) -> f64 {
        self.kpi_scores.get(&category).copied().unwrap_or(0.0)
    }
}

/// Combines every KPI category into a total and a bonus decision.
///
/// Holds only read-only state, so one engine can score any number of
/// representatives concurrently.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    registry: WeightRegistry,
    bonus_threshold: f64,
    order_baseline: f64,
}

impl ScoringEngine {
    pub fn new(registry: WeightRegistry, bonus_threshold: f64, order_baseline: f64) -> Self {
        Self {
            registry,
            bonus_threshold,
            order_baseline,
        }
    }

    /// Builds the weight registry from configuration and scorecard rows.
    pub fn from_config(
        config: &EngineConfig,
        scorecard: &[ScorecardRow],
        observer: &dyn ScoringObserver,
    ) -> Self {
        let registry = WeightRegistry::new(config.kpi_weights.clone(), config.default_product_weight)
            .with_scorecard(scorecard, observer);
        Self::new(registry, config.bonus_threshold, config.order_baseline)
    }

    pub fn registry(&self) -> &WeightRegistry {
        &self.registry
    }

    pub fn bonus_threshold(&self) -> f64 {
        self.bonus_threshold
    }

    pub fn order_baseline(&self) -> f64 {
        self.order_baseline
    }

    pub fn is_eligible(&self, total_score: f64) -> bool {
        total_score >= self.bonus_threshold
    }

    pub fn score_representative(
        &self,
        tables: &FactTables,
        assignments: &Assignments,
        representative: &RepresentativeId,
        quarter: Quarter,
        observer: &dyn ScoringObserver,
    ) -> RepresentativeScore {
        let manager = assignments
            .manager_of(representative)
            .cloned()
            .unwrap_or_else(|| {
                observer.warning(&ScoringWarning::UnmappedRepresentative {
                    representative: representative.clone(),
                    field: AssignmentField::Manager,
                });
                ManagerId::unknown()
            });
        let region = assignments
            .region_of(representative)
            .cloned()
            .unwrap_or_else(|| {
                observer.warning(&ScoringWarning::UnmappedRepresentative {
                    representative: representative.clone(),
                    field: AssignmentField::Region,
                });
                Region::unknown()
            });

        let sales =
            SalesScorer::new(&self.registry).score(tables, representative, quarter, observer);
        let route = RouteComplianceScorer::new(&self.registry).score(tables, representative, quarter);
        let orders = OrderSuccessScorer::new(&self.registry, self.order_baseline)
            .score(tables, representative, quarter);

        let kpi_scores: BTreeMap<KpiCategory, f64> = KpiCategory::ordered()
            .into_iter()
            .map(|category| {
                let score = match category {
                    KpiCategory::SalesVolume => sales.total,
                    // Reserved: no distribution facts are scored yet.
                    KpiCategory::Distribution => 0.0,
                    KpiCategory::RouteCompliance => route.score,
                    KpiCategory::OrderSuccess => orders.score,
                };
                (category, score)
            })
            .collect();

        let total_score: f64 = kpi_scores.values().sum();
        let score = RepresentativeScore {
            representative: representative.clone(),
            manager,
            region,
            kpi_scores,
            product_scores: sales.products,
            route,
            orders,
            total_score,
            eligible_for_bonus: self.is_eligible(total_score),
        };

        observer.representative_scored(&score);
        score
    }

    /// Scores every representative holding a target, in representative id order.
    pub fn score_all(
        &self,
        tables: &FactTables,
        assignments: &Assignments,
        quarter: Quarter,
        observer: &dyn ScoringObserver,
    ) -> Vec<RepresentativeScore> {
        tables
            .representatives()
            .iter()
            .map(|representative| {
                self.score_representative(tables, assignments, representative, quarter, observer)
            })
            .collect()
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self::new(
            WeightRegistry::new(config.kpi_weights, config.default_product_weight),
            config.bonus_threshold,
            config.order_baseline,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{ActualFact, OrderFact, TargetFact, VisitFact};
    use crate::scoring::observer::{NullObserver, RecordingObserver};
    use chrono::NaiveDate;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
    }

    fn single_product_tables(target: f64, actual: f64) -> FactTables {
        FactTables {
            targets: vec![TargetFact {
                month: 1,
                manager: "BM-1".into(),
                representative: "ST-1".into(),
                brick: "B-1".into(),
                product_group: "CARDIO".into(),
                quantity: target,
            }],
            actuals: vec![ActualFact {
                date: date(1, 20),
                brick: "B-1".into(),
                product_group: "CARDIO".into(),
                quantity: actual,
            }],
            ..FactTables::default()
        }
    }

    fn engine() -> ScoringEngine {
        ScoringEngine::from_config(
            &EngineConfig::default(),
            &[ScorecardRow::new("CARDIO", 60.0)],
            &NullObserver,
        )
    }

    fn assignments() -> Assignments {
        let mut assignments = Assignments::default();
        assignments.managers.insert("ST-1".into(), "BM-1".into());
        assignments.regions.insert("ST-1".into(), "North".into());
        assignments
    }

    #[test]
    fn floor_rate_scenario_is_not_eligible() {
        let tables = single_product_tables(1000.0, 850.0);
        let score = engine().score_representative(
            &tables,
            &assignments(),
            &"ST-1".into(),
            Quarter::Q1,
            &NullObserver,
        );

        let cardio = &score.product_scores[&ProductGroup::new("CARDIO")];
        assert_eq!(cardio.rate, 0.85);
        assert_eq!(cardio.score, 51.0);
        assert_eq!(score.kpi_score(KpiCategory::SalesVolume), 51.0);
        assert_eq!(score.kpi_score(KpiCategory::RouteCompliance), 0.0);
        assert_eq!(score.kpi_score(KpiCategory::OrderSuccess), 0.0);
        assert_eq!(score.total_score, 51.0);
        assert!(!score.eligible_for_bonus);
    }

    #[test]
    fn ceiling_scenario_caps_product_score() {
        for actual in [1650.0, 2000.0] {
            let tables = single_product_tables(1000.0, actual);
            let score = engine().score_representative(
                &tables,
                &assignments(),
                &"ST-1".into(),
                Quarter::Q1,
                &NullObserver,
            );
            assert_eq!(score.product_scores[&ProductGroup::new("CARDIO")].score, 99.0);
            assert_eq!(score.total_score, 99.0);
            assert!(score.eligible_for_bonus);
        }
    }

    #[test]
    fn total_is_sum_of_kpi_scores_including_reserved_distribution() {
        let mut tables = single_product_tables(1000.0, 1000.0);
        tables.visits = (1..=4)
            .map(|day| VisitFact {
                date: date(2, day),
                representative: "ST-1".into(),
                completed: true,
            })
            .collect();
        tables.orders = vec![OrderFact {
            date: date(3, 1),
            representative: "ST-1".into(),
            orders: 100,
        }];

        let score = engine().score_representative(
            &tables,
            &assignments(),
            &"ST-1".into(),
            Quarter::Q1,
            &NullObserver,
        );

        assert_eq!(score.kpi_scores.len(), 4);
        assert_eq!(score.kpi_score(KpiCategory::Distribution), 0.0);
        assert_eq!(score.kpi_score(KpiCategory::SalesVolume), 60.0);
        assert_eq!(score.kpi_score(KpiCategory::RouteCompliance), 15.0);
        assert_eq!(score.kpi_score(KpiCategory::OrderSuccess), 10.0);
        assert_eq!(score.total_score, 85.0);
        assert!(score.eligible_for_bonus);
        assert_eq!(score.route.planned, 4);
        assert_eq!(score.orders.actual, 100);
    }

    #[test]
    fn eligibility_boundary_is_inclusive() {
        let engine = engine();
        assert!(engine.is_eligible(85.0));
        assert!(!engine.is_eligible(84.999));
    }

    #[test]
    fn unmapped_representative_resolves_to_unknown() {
        let tables = single_product_tables(1000.0, 900.0);
        let observer = RecordingObserver::default();
        let score = engine().score_representative(
            &tables,
            &Assignments::default(),
            &"ST-1".into(),
            Quarter::Q1,
            &observer,
        );

        assert_eq!(score.manager.as_str(), "Unknown");
        assert_eq!(score.region.as_str(), "Unknown");
        assert_eq!(observer.warnings().len(), 2);
        assert_eq!(observer.scored(), vec![RepresentativeId::new("ST-1")]);
    }

    #[test]
    fn score_all_is_ordered_by_representative() {
        let mut tables = single_product_tables(1000.0, 900.0);
        let mut second = tables.targets[0].clone();
        second.representative = "ST-0".into();
        tables.targets.push(second);

        let scores = engine().score_all(&tables, &assignments(), Quarter::Q1, &NullObserver);
        let ids: Vec<&str> = scores
            .iter()
            .map(|score| score.representative.as_str())
            .collect();
        assert_eq!(ids, vec!["ST-0", "ST-1"]);
    }

    #[test]
    fn bonus_threshold_is_configurable() {
        let config = EngineConfig {
            bonus_threshold: 50.0,
            ..EngineConfig::default()
        };
        let engine =
            ScoringEngine::from_config(&config, &[ScorecardRow::new("CARDIO", 60.0)], &NullObserver);
        let score = engine.score_representative(
            &single_product_tables(1000.0, 850.0),
            &assignments(),
            &"ST-1".into(),
            Quarter::Q1,
            &NullObserver,
        );
        assert!(score.eligible_for_bonus);
    }
}
