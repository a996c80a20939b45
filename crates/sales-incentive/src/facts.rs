//! Fact tables handed over by the data loader.
//!
//! Rows arrive already validated and normalized; nothing in this module
//! re-checks types or parses source files. The tables are shared read-only
//! across a scoring run.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Sentinel used when a representative has no manager or region mapping.
pub const UNKNOWN: &str = "Unknown";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Sales representative (ST) being scored.
    RepresentativeId
);
string_id!(
    /// Manager (BM) a representative reports to.
    ManagerId
);
string_id!(Region);
string_id!(ProductGroup);
string_id!(
    /// Territory unit used to attribute sell-out to a representative.
    Brick
);

impl ManagerId {
    pub fn unknown() -> Self {
        Self::new(UNKNOWN)
    }
}

impl Region {
    pub fn unknown() -> Self {
        Self::new(UNKNOWN)
    }
}

/// Calendar quarter restricting every fact lookup to three months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const fn ordered() -> [Self; 4] {
        [Self::Q1, Self::Q2, Self::Q3, Self::Q4]
    }

    pub fn new(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Q1),
            2 => Some(Self::Q2),
            3 => Some(Self::Q3),
            4 => Some(Self::Q4),
            _ => None,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Q4 => 4,
        }
    }

    pub const fn months(self) -> [u32; 3] {
        match self {
            Self::Q1 => [1, 2, 3],
            Self::Q2 => [4, 5, 6],
            Self::Q3 => [7, 8, 9],
            Self::Q4 => [10, 11, 12],
        }
    }

    pub fn contains_month(self, month: u32) -> bool {
        self.months().contains(&month)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        self.contains_month(date.month())
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Monthly target for one representative, brick and product group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetFact {
    pub month: u32,
    pub manager: ManagerId,
    pub representative: RepresentativeId,
    pub brick: Brick,
    pub product_group: ProductGroup,
    pub quantity: f64,
}

/// Sell-out reported per brick; attributed to representatives via their target bricks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualFact {
    pub date: NaiveDate,
    pub brick: Brick,
    pub product_group: ProductGroup,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitFact {
    pub date: NaiveDate,
    pub representative: RepresentativeId,
    pub completed: bool,
}

/// `orders` is 1 for feeds that carry one row per order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFact {
    pub date: NaiveDate,
    pub representative: RepresentativeId,
    pub orders: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactTables {
    pub targets: Vec<TargetFact>,
    pub actuals: Vec<ActualFact>,
    pub visits: Vec<VisitFact>,
    pub orders: Vec<OrderFact>,
}

impl FactTables {
    /// Every representative that carries at least one target row, sorted by id.
    pub fn representatives(&self) -> Vec<RepresentativeId> {
        self.targets
            .iter()
            .map(|fact| fact.representative.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn managers(&self) -> Vec<ManagerId> {
        self.targets
            .iter()
            .map(|fact| fact.manager.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn product_groups(&self) -> Vec<ProductGroup> {
        self.targets
            .iter()
            .map(|fact| fact.product_group.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn summary(&self) -> DatasetSummary {
        let months = self
            .targets
            .iter()
            .map(|fact| fact.month)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        DatasetSummary {
            target_rows: self.targets.len(),
            actual_rows: self.actuals.len(),
            visit_rows: self.visits.len(),
            order_rows: self.orders.len(),
            representative_count: self.representatives().len(),
            manager_count: self.managers().len(),
            product_group_count: self.product_groups().len(),
            target_months: months,
        }
    }
}

/// Shape of a loaded dataset, reported before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub target_rows: usize,
    pub actual_rows: usize,
    pub visit_rows: usize,
    pub order_rows: usize,
    pub representative_count: usize,
    pub manager_count: usize,
    pub product_group_count: usize,
    pub target_months: Vec<u32>,
}

/// Which representative field fell back to the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentField {
    Manager,
    Region,
}

impl AssignmentField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Region => "region",
        }
    }
}

/// Representative to manager and region lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignments {
    pub managers: BTreeMap<RepresentativeId, ManagerId>,
    pub regions: BTreeMap<RepresentativeId, Region>,
}

impl Assignments {
    pub fn new(
        managers: BTreeMap<RepresentativeId, ManagerId>,
        regions: BTreeMap<RepresentativeId, Region>,
    ) -> Self {
        Self { managers, regions }
    }

    /// Builds the manager map from target rows, keeping the first manager seen per representative.
    pub fn from_targets(targets: &[TargetFact]) -> Self {
        let mut managers = BTreeMap::new();
        for fact in targets {
            managers
                .entry(fact.representative.clone())
                .or_insert_with(|| fact.manager.clone());
        }

        Self {
            managers,
            regions: BTreeMap::new(),
        }
    }

    pub fn with_regions(mut self, regions: BTreeMap<RepresentativeId, Region>) -> Self {
        self.regions = regions;
        self
    }

    pub fn manager_of(&self, representative: &RepresentativeId) -> Option<&ManagerId> {
        self.managers.get(representative)
    }

    pub fn region_of(&self, representative: &RepresentativeId) -> Option<&Region> {
        self.regions.get(representative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(month: u32, manager: &str, rep: &str, product: &str) -> TargetFact {
        TargetFact {
            month,
            manager: manager.into(),
            representative: rep.into(),
            brick: "B-1".into(),
            product_group: product.into(),
            quantity: 100.0,
        }
    }

    #[test]
    fn quarter_maps_to_fixed_months() {
        assert_eq!(Quarter::Q1.months(), [1, 2, 3]);
        assert_eq!(Quarter::Q4.months(), [10, 11, 12]);
        assert!(Quarter::Q1.contains_month(3));
        assert!(!Quarter::Q1.contains_month(4));
        assert!(!Quarter::Q4.contains_month(9));
        assert_eq!(Quarter::new(0), None);
        assert_eq!(Quarter::new(5), None);
        assert_eq!(Quarter::new(3), Some(Quarter::Q3));
    }

    #[test]
    fn quarter_contains_dates_by_month() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 17).expect("valid date");
        assert!(Quarter::Q2.contains(date));
        assert!(!Quarter::Q3.contains(date));
    }

    #[test]
    fn representatives_are_unique_and_sorted() {
        let tables = FactTables {
            targets: vec![
                target(1, "BM-2", "ST-3", "CARDIO"),
                target(2, "BM-1", "ST-1", "CARDIO"),
                target(2, "BM-2", "ST-3", "NEURO"),
            ],
            ..FactTables::default()
        };

        let reps: Vec<_> = tables
            .representatives()
            .into_iter()
            .map(|rep| rep.to_string())
            .collect();
        assert_eq!(reps, vec!["ST-1", "ST-3"]);
    }

    #[test]
    fn summary_counts_dimensions() {
        let tables = FactTables {
            targets: vec![
                target(1, "BM-1", "ST-1", "CARDIO"),
                target(3, "BM-1", "ST-2", "NEURO"),
                target(1, "BM-2", "ST-3", "NEURO"),
            ],
            ..FactTables::default()
        };

        let summary = tables.summary();
        assert_eq!(summary.target_rows, 3);
        assert_eq!(summary.representative_count, 3);
        assert_eq!(summary.manager_count, 2);
        assert_eq!(summary.product_group_count, 2);
        assert_eq!(summary.target_months, vec![1, 3]);
    }

    #[test]
    fn assignments_from_targets_keep_first_manager() {
        let targets = vec![
            target(1, "BM-1", "ST-1", "CARDIO"),
            target(2, "BM-9", "ST-1", "CARDIO"),
        ];
        let assignments = Assignments::from_targets(&targets);
        assert_eq!(
            assignments.manager_of(&"ST-1".into()),
            Some(&ManagerId::new("BM-1"))
        );
        assert!(assignments.region_of(&"ST-1".into()).is_none());
    }
}
