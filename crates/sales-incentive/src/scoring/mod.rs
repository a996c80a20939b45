//! Threshold-clipped KPI scoring for individual representatives.

mod composite;
pub mod observer;
mod orders;
mod route;
mod sales;
mod score;
mod weights;

pub use composite::{RepresentativeScore, ScoringEngine};
pub use observer::{
    NullObserver, RecordingObserver, ScoringObserver, ScoringWarning, TracingObserver,
};
pub use orders::{OrderOutcome, OrderSuccessScorer, DEFAULT_ORDER_BASELINE};
pub use route::{RouteComplianceScorer, RouteOutcome};
pub use sales::{ProductScore, SalesOutcome, SalesScorer};
pub use score::{
    achievement_rate, score, ScoreBand, DEFAULT_MAX_THRESHOLD, DEFAULT_MIN_THRESHOLD,
};
pub use weights::{
    KpiCategory, KpiWeight, KpiWeights, ProductGroupWeight, ScorecardRow, WeightError,
    WeightRegistry, DEFAULT_PRODUCT_WEIGHT,
};
