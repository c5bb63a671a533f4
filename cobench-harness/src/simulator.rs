//! Drives one step-by-step construction: compute the feasible frontier, ask
//! the candidate, apply the chosen move, repeat until the instance is fully
//! resolved or no feasible continuation exists.

use cobench_problems::{Candidate, ConstructiveProblem, StepView};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConstructionFailure {
    #[error("stalled at step {step}: {reason}")]
    Stalled { step: usize, reason: String },
    #[error("candidate returned no move at step {step}")]
    NoDecision { step: usize },
}

pub fn construct<P, C>(
    instance: &P::Instance,
    candidate: &mut C,
) -> Result<P::Solution, ConstructionFailure>
where
    P: ConstructiveProblem,
    C: Candidate<P> + ?Sized,
{
    let mut state = P::initial_state(instance);
    let mut step = 0;
    loop {
        if P::is_complete(instance, &state) {
            debug!(problem = P::NAME, steps = step, "construction complete");
            return Ok(P::into_solution(instance, state));
        }
        let frontier = P::frontier(instance, &state);
        if frontier.is_empty() {
            return Err(ConstructionFailure::Stalled {
                step,
                reason: "feasible frontier is empty with unresolved units left".to_string(),
            });
        }
        let view = StepView {
            instance,
            state: &state,
            frontier: &frontier,
        };
        let mv = match candidate.decide(&view) {
            Some(mv) => mv,
            None => return Err(ConstructionFailure::NoDecision { step }),
        };
        if !frontier.contains(&mv) {
            // forcing the move would corrupt the bookkeeping the verifier
            // later re-derives, so an out-of-frontier choice is a stall
            return Err(ConstructionFailure::Stalled {
                step,
                reason: format!("candidate chose {:?}, which is outside the feasible frontier", mv),
            });
        }
        P::apply(instance, &mut state, &mv);
        step += 1;
    }
}
