//! Observability hooks injected into the scoring components.

use super::composite::RepresentativeScore;
use crate::facts::{AssignmentField, ProductGroup, RepresentativeId};
use serde::Serialize;
use std::fmt;
use std::sync::Mutex;

/// Non-fatal conditions surfaced while scoring. Computation always proceeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringWarning {
    NonPositiveProductWeight {
        group: ProductGroup,
        weight: f64,
    },
    UnknownProductGroup {
        group: ProductGroup,
        fallback: f64,
    },
    UnmappedRepresentative {
        representative: RepresentativeId,
        field: AssignmentField,
    },
    EmptyCohort,
}

impl fmt::Display for ScoringWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringWarning::NonPositiveProductWeight { group, weight } => {
                write!(f, "product group {group} excluded: weight {weight} is not positive")
            }
            ScoringWarning::UnknownProductGroup { group, fallback } => {
                write!(f, "product group {group} not in scorecard, using weight {fallback}")
            }
            ScoringWarning::UnmappedRepresentative {
                representative,
                field,
            } => write!(
                f,
                "representative {representative} has no {} mapping",
                field.label()
            ),
            ScoringWarning::EmptyCohort => write!(f, "no representative scores to aggregate"),
        }
    }
}

pub trait ScoringObserver: Send + Sync {
    fn warning(&self, warning: &ScoringWarning);

    fn representative_scored(&self, _score: &RepresentativeScore) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScoringObserver for TracingObserver {
    fn warning(&self, warning: &ScoringWarning) {
        tracing::warn!(%warning, "scoring warning");
    }

    fn representative_scored(&self, score: &RepresentativeScore) {
        tracing::debug!(
            representative = %score.representative,
            manager = %score.manager,
            total_score = score.total_score,
            eligible = score.eligible_for_bonus,
            "representative scored"
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ScoringObserver for NullObserver {
    fn warning(&self, _warning: &ScoringWarning) {}
}

/// Keeps every warning in arrival order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    warnings: Mutex<Vec<ScoringWarning>>,
    scored: Mutex<Vec<RepresentativeId>>,
}

impl RecordingObserver {
    pub fn warnings(&self) -> Vec<ScoringWarning> {
        self.warnings
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn scored(&self) -> Vec<RepresentativeId> {
        self.scored
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl ScoringObserver for RecordingObserver {
    fn warning(&self, warning: &ScoringWarning) {
        if let Ok(mut guard) = self.warnings.lock() {
            guard.push(warning.clone());
        }
    }

    fn representative_scored(&self, score: &RepresentativeScore) {
        if let Ok(mut guard) = self.scored.lock() {
            guard.push(score.representative.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_render_readable_messages() {
        let warning = ScoringWarning::UnknownProductGroup {
            group: "ONCO".into(),
            fallback: 10.0,
        };
        assert_eq!(
            warning.to_string(),
            "product group ONCO not in scorecard, using weight 10"
        );

        let warning = ScoringWarning::UnmappedRepresentative {
            representative: "ST-7".into(),
            field: AssignmentField::Region,
        };
        assert_eq!(warning.to_string(), "representative ST-7 has no region mapping");
    }

    #[test]
    fn recording_observer_keeps_order() {
        let observer = RecordingObserver::default();
        observer.warning(&ScoringWarning::EmptyCohort);
        observer.warning(&ScoringWarning::NonPositiveProductWeight {
            group: "NEURO".into(),
            weight: 0.0,
        });

        let warnings = observer.warnings();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0], ScoringWarning::EmptyCohort);
    }

    #[test]
    fn warnings_serialize_with_kind_tag() {
        let json = serde_json::to_value(ScoringWarning::EmptyCohort).expect("serializes");
        assert_eq!(json["kind"], "empty_cohort");
    }
}
