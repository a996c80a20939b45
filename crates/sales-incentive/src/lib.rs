//! Weighted KPI scoring, bonus eligibility and cohort rollups for field sales
//! representatives.
//!
//! Fact tables come in already normalized ([`facts`]); [`scoring`] turns one
//! representative's slice into a [`scoring::RepresentativeScore`];
//! [`pipeline`] fans that out across a cohort; [`report`] rolls the results up
//! per manager and across the cohort.

pub mod config;
pub mod error;
pub mod facts;
mod grouping;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod telemetry;

pub use config::{AppConfig, EngineConfig};
pub use error::AppError;
pub use facts::{Assignments, FactTables, Quarter};
pub use pipeline::ScoringRun;
pub use report::CohortReport;
pub use scoring::{RepresentativeScore, ScoringEngine};
