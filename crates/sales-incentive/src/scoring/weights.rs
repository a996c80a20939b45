use super::observer::{ScoringObserver, ScoringWarning};
use super::score::ScoreBand;
use crate::facts::ProductGroup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Weight applied to product groups missing from the scorecard.
pub const DEFAULT_PRODUCT_WEIGHT: f64 = 10.0;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Fixed scoring dimensions contributing to a representative's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiCategory {
    SalesVolume,
    Distribution,
    RouteCompliance,
    OrderSuccess,
}

impl KpiCategory {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::SalesVolume,
            Self::Distribution,
            Self::RouteCompliance,
            Self::OrderSuccess,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::SalesVolume => "sales_volume",
            Self::Distribution => "distribution",
            Self::RouteCompliance => "route_compliance",
            Self::OrderSuccess => "order_success",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SalesVolume => "Sales Volume",
            Self::Distribution => "Distribution",
            Self::RouteCompliance => "Route Compliance",
            Self::OrderSuccess => "Order Success",
        }
    }

    const fn default_weight(self) -> f64 {
        match self {
            Self::SalesVolume => 60.0,
            Self::Distribution => 15.0,
            Self::RouteCompliance => 15.0,
            Self::OrderSuccess => 10.0,
        }
    }
}

impl fmt::Display for KpiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for KpiCategory {
    type Err = WeightError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|category| category.key() == normalized)
            .ok_or_else(|| WeightError::UnknownKpiCategory(value.trim().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("{category} thresholds must satisfy min < max (got {min} and {max})")]
    InvalidThresholds {
        category: KpiCategory,
        min: f64,
        max: f64,
    },
    #[error("{category} weight {weight} must lie between 0 and 100")]
    WeightOutOfRange { category: KpiCategory, weight: f64 },
    #[error("KPI weights must sum to 100 (got {total})")]
    WeightsDoNotSumTo100 { total: f64 },
    #[error("unknown KPI category '{0}'")]
    UnknownKpiCategory(String),
    #[error("malformed KPI weight entry '{0}', expected category=weight")]
    MalformedEntry(String),
}

/// Weight and rate band for one KPI category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiWeight {
    category: KpiCategory,
    weight: f64,
    band: ScoreBand,
}

impl KpiWeight {
    pub fn new(
        category: KpiCategory,
        weight: f64,
        min_threshold: f64,
        max_threshold: f64,
    ) -> Result<Self, WeightError> {
        if !(0.0..=100.0).contains(&weight) {
            return Err(WeightError::WeightOutOfRange { category, weight });
        }

        let band = ScoreBand::new(min_threshold, max_threshold).ok_or(
            WeightError::InvalidThresholds {
                category,
                min: min_threshold,
                max: max_threshold,
            },
        )?;

        Ok(Self {
            category,
            weight,
            band,
        })
    }

    pub fn category(&self) -> KpiCategory {
        self.category
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn band(&self) -> ScoreBand {
        self.band
    }

    pub fn min_threshold(&self) -> f64 {
        self.band.min_threshold()
    }

    pub fn max_threshold(&self) -> f64 {
        self.band.max_threshold()
    }

    /// Points for `rate` under this category's weight and band.
    pub fn score(&self, rate: f64) -> f64 {
        self.band.score(rate, self.weight)
    }
}

/// The full KPI weight set. Always covers every category and sums to 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiWeights {
    weights: BTreeMap<KpiCategory, KpiWeight>,
}

impl Default for KpiWeights {
    fn default() -> Self {
        Self::with_band(ScoreBand::default())
    }
}

impl KpiWeights {
    /// Default weights (60/15/15/10) sharing one rate band.
    pub fn with_band(band: ScoreBand) -> Self {
        let weights = KpiCategory::ordered()
            .into_iter()
            .map(|category| {
                (
                    category,
                    KpiWeight {
                        category,
                        weight: category.default_weight(),
                        band,
                    },
                )
            })
            .collect();

        Self { weights }
    }

    /// Replaces weights together; categories not listed keep their current weight.
    pub fn with_overrides(
        &self,
        overrides: &BTreeMap<KpiCategory, f64>,
    ) -> Result<Self, WeightError> {
        let weights = self
            .weights
            .iter()
            .map(|(category, current)| {
                let weight = overrides.get(category).copied().unwrap_or(current.weight);
                KpiWeight::new(
                    *category,
                    weight,
                    current.min_threshold(),
                    current.max_threshold(),
                )
                .map(|kpi| (*category, kpi))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let total: f64 = weights.values().map(|kpi| kpi.weight).sum();
        if (total - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightError::WeightsDoNotSumTo100 { total });
        }

        Ok(Self { weights })
    }

    /// Parses `sales_volume=50,distribution=20` style override lists.
    pub fn parse_overrides(raw: &str) -> Result<BTreeMap<KpiCategory, f64>, WeightError> {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (key, value) = entry
                    .split_once('=')
                    .ok_or_else(|| WeightError::MalformedEntry(entry.to_string()))?;
                let category = key.parse::<KpiCategory>()?;
                let weight = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| WeightError::MalformedEntry(entry.to_string()))?;
                Ok((category, weight))
            })
            .collect()
    }

    pub fn get(&self, category: KpiCategory) -> KpiWeight {
        self.weights[&category]
    }

    pub fn total(&self) -> f64 {
        self.weights.values().map(|kpi| kpi.weight).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KpiWeight> {
        self.weights.values()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGroupWeight {
    pub group: ProductGroup,
    pub weight: f64,
}

/// Raw scorecard row as supplied by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardRow {
    pub group: ProductGroup,
    pub weight: f64,
}

impl ScorecardRow {
    pub fn new(group: impl Into<ProductGroup>, weight: f64) -> Self {
        Self {
            group: group.into(),
            weight,
        }
    }
}

/// Product-group and KPI weights, built once and read-only during scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightRegistry {
    kpi: KpiWeights,
    products: BTreeMap<ProductGroup, ProductGroupWeight>,
    default_product_weight: f64,
}

impl Default for WeightRegistry {
    fn default() -> Self {
        Self::new(KpiWeights::default(), DEFAULT_PRODUCT_WEIGHT)
    }
}

impl WeightRegistry {
    pub fn new(kpi: KpiWeights, default_product_weight: f64) -> Self {
        Self {
            kpi,
            products: BTreeMap::new(),
            default_product_weight,
        }
    }

    /// Loads scorecard rows. Rows with weight <= 0 are excluded and reported; later
    /// rows for the same group replace earlier ones.
    pub fn with_scorecard(
        mut self,
        rows: &[ScorecardRow],
        observer: &dyn ScoringObserver,
    ) -> Self {
        for row in rows {
            if row.weight <= 0.0 || row.weight.is_nan() {
                observer.warning(&ScoringWarning::NonPositiveProductWeight {
                    group: row.group.clone(),
                    weight: row.weight,
                });
                continue;
            }

            self.products.insert(
                row.group.clone(),
                ProductGroupWeight {
                    group: row.group.clone(),
                    weight: row.weight,
                },
            );
        }

        self
    }

    pub fn kpi(&self) -> &KpiWeights {
        &self.kpi
    }

    pub fn kpi_weight(&self, category: KpiCategory) -> KpiWeight {
        self.kpi.get(category)
    }

    pub fn default_product_weight(&self) -> f64 {
        self.default_product_weight
    }

    pub fn product_weight(&self, group: &ProductGroup) -> Option<f64> {
        self.products.get(group).map(|entry| entry.weight)
    }

    /// Registered weight for `group`, or the default weight with a warning.
    pub fn resolve(&self, group: &ProductGroup, observer: &dyn ScoringObserver) -> f64 {
        match self.product_weight(group) {
            Some(weight) => weight,
            None => {
                observer.warning(&ScoringWarning::UnknownProductGroup {
                    group: group.clone(),
                    fallback: self.default_product_weight,
                });
                self.default_product_weight
            }
        }
    }

    pub fn product_groups(&self) -> impl Iterator<Item = &ProductGroupWeight> {
        self.products.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::observer::{NullObserver, RecordingObserver};

    #[test]
    fn default_kpi_weights_sum_to_100() {
        let weights = KpiWeights::default();
        assert_eq!(weights.total(), 100.0);
        assert_eq!(weights.get(KpiCategory::SalesVolume).weight(), 60.0);
        assert_eq!(weights.get(KpiCategory::Distribution).weight(), 15.0);
        assert_eq!(weights.get(KpiCategory::RouteCompliance).weight(), 15.0);
        assert_eq!(weights.get(KpiCategory::OrderSuccess).weight(), 10.0);
    }

    #[test]
    fn default_band_applies_to_every_category() {
        let weights = KpiWeights::default();
        assert!(weights.iter().all(|kpi| kpi.min_threshold() == 0.85
            && kpi.max_threshold() == 1.65));
    }

    #[test]
    fn kpi_weight_rejects_inverted_thresholds() {
        let err = KpiWeight::new(KpiCategory::OrderSuccess, 10.0, 1.65, 0.85)
            .expect_err("inverted band");
        assert!(matches!(err, WeightError::InvalidThresholds { .. }));
    }

    #[test]
    fn kpi_weight_scores_through_its_own_band() {
        let kpi = KpiWeight::new(KpiCategory::RouteCompliance, 20.0, 0.5, 1.0)
            .expect("valid weight");
        assert_eq!(kpi.category(), KpiCategory::RouteCompliance);
        assert_eq!(kpi.weight(), 20.0);
        assert_eq!(kpi.band(), ScoreBand::new(0.5, 1.0).expect("ordered band"));
        assert_eq!(kpi.score(0.4), 0.0);
        assert_eq!(kpi.score(0.75), 15.0);
        assert_eq!(kpi.score(2.0), 20.0);
    }

    #[test]
    fn kpi_weight_rejects_out_of_range_weight() {
        let err = KpiWeight::new(KpiCategory::SalesVolume, 120.0, 0.85, 1.65)
            .expect_err("weight above 100");
        assert!(matches!(err, WeightError::WeightOutOfRange { .. }));
    }

    #[test]
    fn overrides_must_resum_to_100() {
        let overrides = KpiWeights::parse_overrides("sales_volume=50").expect("parses");
        let err = KpiWeights::default()
            .with_overrides(&overrides)
            .expect_err("sum is 90");
        assert_eq!(err, WeightError::WeightsDoNotSumTo100 { total: 90.0 });

        let overrides =
            KpiWeights::parse_overrides("sales_volume=50, distribution=25").expect("parses");
        let weights = KpiWeights::default()
            .with_overrides(&overrides)
            .expect("sums to 100");
        assert_eq!(weights.get(KpiCategory::SalesVolume).weight(), 50.0);
        assert_eq!(weights.get(KpiCategory::Distribution).weight(), 25.0);
        assert_eq!(weights.total(), 100.0);
    }

    #[test]
    fn parse_overrides_reports_bad_entries() {
        assert_eq!(
            KpiWeights::parse_overrides("coverage=10"),
            Err(WeightError::UnknownKpiCategory("coverage".to_string()))
        );
        assert!(matches!(
            KpiWeights::parse_overrides("sales_volume"),
            Err(WeightError::MalformedEntry(_))
        ));
        assert!(matches!(
            KpiWeights::parse_overrides("sales_volume=lots"),
            Err(WeightError::MalformedEntry(_))
        ));
    }

    #[test]
    fn scorecard_excludes_non_positive_weights() {
        let observer = RecordingObserver::default();
        let registry = WeightRegistry::default().with_scorecard(
            &[
                ScorecardRow::new("CARDIO", 25.0),
                ScorecardRow::new("NEURO", 0.0),
                ScorecardRow::new("DERMA", -5.0),
            ],
            &observer,
        );

        assert_eq!(registry.product_weight(&"CARDIO".into()), Some(25.0));
        assert_eq!(registry.product_weight(&"NEURO".into()), None);
        assert_eq!(registry.product_weight(&"DERMA".into()), None);
        assert_eq!(registry.product_groups().count(), 1);
        assert_eq!(observer.warnings().len(), 2);
    }

    #[test]
    fn clean_scorecard_reports_nothing() {
        let observer = RecordingObserver::default();
        let registry = WeightRegistry::default().with_scorecard(
            &[
                ScorecardRow::new("CARDIO", 25.0),
                ScorecardRow::new("NEURO", 15.0),
            ],
            &observer,
        );

        assert_eq!(registry.product_groups().count(), 2);
        assert!(observer.warnings().is_empty());
        assert!(observer.scored().is_empty());
    }

    #[test]
    fn resolve_falls_back_to_default_weight() {
        let observer = RecordingObserver::default();
        let registry = WeightRegistry::default()
            .with_scorecard(&[ScorecardRow::new("CARDIO", 25.0)], &NullObserver);

        assert_eq!(registry.resolve(&"CARDIO".into(), &observer), 25.0);
        assert!(observer.warnings().is_empty());

        assert_eq!(registry.resolve(&"ONCO".into(), &observer), 10.0);
        assert_eq!(
            observer.warnings(),
            vec![ScoringWarning::UnknownProductGroup {
                group: "ONCO".into(),
                fallback: 10.0,
            }]
        );
    }

    #[test]
    fn category_keys_round_trip_through_from_str() {
        for category in KpiCategory::ordered() {
            assert_eq!(category.key().parse::<KpiCategory>(), Ok(category));
        }
        assert_eq!(
            " Route_Compliance ".parse::<KpiCategory>(),
            Ok(KpiCategory::RouteCompliance)
        );
    }
}
