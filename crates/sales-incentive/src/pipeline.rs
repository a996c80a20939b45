//! Parallel scoring run: one blocking task per representative, fanned back in
//! and ordered by representative id.

use crate::facts::{Assignments, FactTables, Quarter};
use crate::scoring::{RepresentativeScore, ScoringEngine, ScoringObserver};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Shared, read-only inputs for a scoring run.
///
/// The engine (and its weight registry) is fully built before any task starts
/// and is never mutated while tasks hold it.
#[derive(Debug, Clone)]
pub struct ScoringRun {
    tables: Arc<FactTables>,
    assignments: Arc<Assignments>,
    engine: Arc<ScoringEngine>,
}

impl ScoringRun {
    pub fn new(
        tables: Arc<FactTables>,
        assignments: Arc<Assignments>,
        engine: Arc<ScoringEngine>,
    ) -> Self {
        Self {
            tables,
            assignments,
            engine,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Scores every representative concurrently.
    ///
    /// Output order does not depend on task completion order. Dropping the
    /// returned future discards any in-flight results; tasks never mutate
    /// shared state. A task that panics is logged and left out of the result.
    pub async fn execute(
        &self,
        quarter: Quarter,
        observer: Arc<dyn ScoringObserver>,
    ) -> Vec<RepresentativeScore> {
        let representatives = self.tables.representatives();
        tracing::info!(
            representatives = representatives.len(),
            %quarter,
            "starting scoring run"
        );

        let mut tasks = JoinSet::new();
        for representative in representatives {
            let tables = Arc::clone(&self.tables);
            let assignments = Arc::clone(&self.assignments);
            let engine = Arc::clone(&self.engine);
            let observer = Arc::clone(&observer);

            tasks.spawn_blocking(move || {
                engine.score_representative(
                    &tables,
                    &assignments,
                    &representative,
                    quarter,
                    observer.as_ref(),
                )
            });
        }

        let mut scores = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(score) => scores.push(score),
                Err(err) => tracing::error!(%err, "representative scoring task failed"),
            }
        }

        scores.sort_by(|left, right| left.representative.cmp(&right.representative));
        tracing::info!(
            scored = scores.len(),
            eligible = scores.iter().filter(|score| score.eligible_for_bonus).count(),
            "scoring run finished"
        );
        scores
    }
}
