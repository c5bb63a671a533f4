use serde::Serialize;

/// The only thing that crosses the guard boundary back to the runner. It
/// carries no references to candidate code or partial state.
#[derive(Debug, Clone, Serialize)]
pub enum EvaluationOutcome {
    Scored(f64),
    Infeasible(String),
    TimedOut,
    CandidateError(String),
}

impl EvaluationOutcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            EvaluationOutcome::Scored(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InstanceReport {
    pub label: String,
    pub outcome: EvaluationOutcome,
    /// Reference-relative ratio, when the reference table has this label.
    pub normalized: Option<f64>,
}

/// Aggregate of one benchmark run. `score` is the negated mean of the
/// per-instance domain costs (failures contribute the configured penalty),
/// so callers can always maximize.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub score: f64,
    pub normalized_mean: Option<f64>,
    pub reports: Vec<InstanceReport>,
}
