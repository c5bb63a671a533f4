//! Iterates a dataset, evaluating the candidate per instance under the
//! guard and reducing the per-instance scores into one summary metric. Any
//! failure at any stage yields the penalty for that instance; nothing short
//! of a bad configuration aborts a run.

use crate::dataset::BenchmarkInstance;
use crate::guard::{guarded_call, GuardOutcome};
use crate::normalize::{normalize, ReferenceTable, Sense};
use crate::outcome::{EvaluationOutcome, InstanceReport, Summary};
use crate::simulator::{construct, ConstructionFailure};
use cobench_problems::{Candidate, ConstructiveProblem};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Wall-clock bound for one full instance, not one step.
    pub time_limit: Duration,
    /// Cost charged for an instance whose evaluation fails in any way.
    pub penalty: f64,
    /// Evaluate instances on worker threads. Instances are independent, so
    /// this changes wall-clock time only, never the aggregate.
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            time_limit: Duration::from_secs(30),
            penalty: 1e9,
            parallel: false,
        }
    }
}

/// Evaluate `make_candidate()` on every dataset instance and aggregate. The
/// summary's `score` is the negated mean of per-instance costs: every domain
/// objective here is minimize-is-better, while the caller of the harness
/// maximizes, so the mean is negated exactly once at this boundary.
pub fn run<P, C, F>(
    dataset: &[BenchmarkInstance<P>],
    make_candidate: F,
    references: &ReferenceTable,
    config: &RunConfig,
) -> Summary
where
    P: ConstructiveProblem,
    C: Candidate<P> + Send + 'static,
    F: Fn() -> C + Sync,
{
    let evaluate = |entry: &BenchmarkInstance<P>| -> InstanceReport {
        let outcome = match &entry.case {
            Err(parse_error) => {
                EvaluationOutcome::Infeasible(format!("instance failed to load: {}", parse_error))
            }
            Ok(instance) => {
                evaluate_instance::<P, C>(Arc::clone(instance), make_candidate(), config.time_limit)
            }
        };
        match &outcome {
            EvaluationOutcome::Scored(value) => {
                debug!(instance = %entry.label, score = *value, "instance scored")
            }
            other => warn!(instance = %entry.label, "instance failed: {:?}", other),
        }
        let normalized = outcome
            .score()
            .and_then(|raw| references.get(&entry.label).map(|r| normalize(raw, r, Sense::Minimize)));
        InstanceReport {
            label: entry.label.clone(),
            outcome,
            normalized,
        }
    };

    let reports: Vec<InstanceReport> = if config.parallel {
        dataset.par_iter().map(evaluate).collect()
    } else {
        dataset.iter().map(evaluate).collect()
    };

    let score = if reports.is_empty() {
        0.0
    } else {
        let mean = reports
            .iter()
            .map(|r| r.outcome.score().unwrap_or(config.penalty))
            .sum::<f64>()
            / reports.len() as f64;
        -mean
    };
    let ratios: Vec<f64> = reports.iter().filter_map(|r| r.normalized).collect();
    let normalized_mean =
        (!ratios.is_empty()).then(|| ratios.iter().sum::<f64>() / ratios.len() as f64);

    Summary {
        score,
        normalized_mean,
        reports,
    }
}

fn evaluate_instance<P, C>(
    instance: Arc<P::Instance>,
    mut candidate: C,
    time_limit: Duration,
) -> EvaluationOutcome
where
    P: ConstructiveProblem,
    C: Candidate<P> + Send + 'static,
{
    let shared = Arc::clone(&instance);
    let guarded = guarded_call(time_limit, move || {
        construct::<P, C>(shared.as_ref(), &mut candidate)
    });
    match guarded {
        GuardOutcome::TimedOut => EvaluationOutcome::TimedOut,
        GuardOutcome::Panicked(message) => EvaluationOutcome::CandidateError(message),
        GuardOutcome::Completed(Err(ConstructionFailure::NoDecision { step })) => {
            EvaluationOutcome::CandidateError(format!("no move returned at step {}", step))
        }
        GuardOutcome::Completed(Err(failure)) => EvaluationOutcome::Infeasible(failure.to_string()),
        GuardOutcome::Completed(Ok(solution)) => match P::verify(&instance, &solution) {
            Err(violation) => EvaluationOutcome::Infeasible(violation.to_string()),
            Ok(()) => EvaluationOutcome::Scored(P::score(&instance, &solution)),
        },
    }
}
