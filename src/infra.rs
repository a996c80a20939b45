use chrono::NaiveDate;
use sales_incentive::facts::{
    ActualFact, Assignments, FactTables, OrderFact, Quarter, Region, RepresentativeId,
    TargetFact, VisitFact,
};
use sales_incentive::scoring::ScorecardRow;
use std::collections::BTreeMap;

const SAMPLE_YEAR: i32 = 2025;
const PLANNED_VISITS_PER_MONTH: u32 = 20;
const ORDERS_PER_MONTH: f64 = 100.0 / 3.0;

struct SampleRepresentative {
    id: &'static str,
    manager: &'static str,
    region: Option<&'static str>,
    /// Multiplier applied to every target to derive sell-out.
    performance: f64,
}

const SAMPLE_COHORT: [SampleRepresentative; 8] = [
    SampleRepresentative {
        id: "ST-101",
        manager: "BM-NORTH",
        region: Some("Marmara"),
        performance: 1.25,
    },
    SampleRepresentative {
        id: "ST-102",
        manager: "BM-NORTH",
        region: Some("Marmara"),
        performance: 1.05,
    },
    SampleRepresentative {
        id: "ST-103",
        manager: "BM-NORTH",
        region: Some("Black Sea"),
        performance: 0.95,
    },
    SampleRepresentative {
        id: "ST-104",
        manager: "BM-NORTH",
        region: Some("Black Sea"),
        performance: 0.8,
    },
    SampleRepresentative {
        id: "ST-105",
        manager: "BM-SOUTH",
        region: Some("Aegean"),
        performance: 1.4,
    },
    SampleRepresentative {
        id: "ST-106",
        manager: "BM-SOUTH",
        region: Some("Aegean"),
        performance: 1.1,
    },
    SampleRepresentative {
        id: "ST-107",
        manager: "BM-SOUTH",
        region: Some("Mediterranean"),
        performance: 0.9,
    },
    SampleRepresentative {
        id: "ST-108",
        manager: "BM-SOUTH",
        region: None,
        performance: 1.7,
    },
];

/// Product group, monthly target per brick, and how sell-out skews against it.
const SAMPLE_PRODUCTS: [(&str, f64, f64); 4] = [
    ("CARDIO", 400.0, 1.0),
    ("NEURO", 250.0, 0.95),
    ("RESP", 150.0, 1.05),
    ("DERMA", 80.0, 0.9),
];

/// Scorecard for the sample cohort. DERMA is deliberately missing and LEGACY
/// carries a zero weight.
pub(crate) fn sample_scorecard() -> Vec<ScorecardRow> {
    vec![
        ScorecardRow::new("CARDIO", 35.0),
        ScorecardRow::new("NEURO", 15.0),
        ScorecardRow::new("RESP", 10.0),
        ScorecardRow::new("LEGACY", 0.0),
    ]
}

/// A full year of targets, sell-out, visits and orders for the sample cohort.
pub(crate) fn sample_tables() -> FactTables {
    let mut tables = FactTables::default();

    for (index, rep) in SAMPLE_COHORT.iter().enumerate() {
        let brick = format!("BR-{}", index + 1);

        for month in 1..=12u32 {
            let wobble = (f64::from(month % 3) - 1.0) * 0.02;
            let Some(month_start) = NaiveDate::from_ymd_opt(SAMPLE_YEAR, month, 1) else {
                continue;
            };

            for (product, target, skew) in SAMPLE_PRODUCTS {
                tables.targets.push(TargetFact {
                    month,
                    manager: rep.manager.into(),
                    representative: rep.id.into(),
                    brick: brick.as_str().into(),
                    product_group: product.into(),
                    quantity: target,
                });
                tables.actuals.push(ActualFact {
                    date: month_start,
                    brick: brick.as_str().into(),
                    product_group: product.into(),
                    quantity: (target * rep.performance * skew * (1.0 + wobble)).round(),
                });
            }

            let compliance = (rep.performance * 0.75).min(1.0);
            let completed = (f64::from(PLANNED_VISITS_PER_MONTH) * compliance).round() as u32;
            tables.visits.extend(
                (1..=PLANNED_VISITS_PER_MONTH)
                    .filter_map(|day| NaiveDate::from_ymd_opt(SAMPLE_YEAR, month, day))
                    .enumerate()
                    .map(|(visit, date)| VisitFact {
                        date,
                        representative: rep.id.into(),
                        completed: (visit as u32) < completed,
                    }),
            );

            tables.orders.push(OrderFact {
                date: month_start,
                representative: rep.id.into(),
                orders: (ORDERS_PER_MONTH * rep.performance).round() as u32,
            });
        }
    }

    tables
}

/// Managers come from the target rows; one representative has no region on file.
pub(crate) fn sample_assignments(tables: &FactTables) -> Assignments {
    let regions: BTreeMap<RepresentativeId, Region> = SAMPLE_COHORT
        .iter()
        .filter_map(|rep| rep.region.map(|region| (rep.id.into(), region.into())))
        .collect();

    Assignments::from_targets(&tables.targets).with_regions(regions)
}

pub(crate) fn parse_quarter(raw: &str) -> Result<Quarter, String> {
    raw.trim()
        .trim_start_matches(|c: char| c == 'Q' || c == 'q')
        .parse::<u8>()
        .ok()
        .and_then(Quarter::new)
        .ok_or_else(|| format!("'{raw}' is not a quarter (expected 1-4 or Q1-Q4)"))
}
