//! Family-agnostic candidates, mostly useful for exercising the harness.

use crate::{Candidate, ConstructiveProblem, StepView};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Always takes the first move the frontier offers. If a feasible complete
/// solution is reachable at all, this candidate reaches one.
pub struct FirstFeasible;

impl<P: ConstructiveProblem> Candidate<P> for FirstFeasible {
    fn decide(&mut self, view: &StepView<'_, P>) -> Option<P::Move> {
        view.frontier.first().cloned()
    }
}

/// Picks a uniformly random frontier move from a seeded generator, so runs
/// stay reproducible.
pub struct RandomPick {
    rng: SmallRng,
}

impl RandomPick {
    pub fn seeded(seed: u64) -> Self {
        RandomPick {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<P: ConstructiveProblem> Candidate<P> for RandomPick {
    fn decide(&mut self, view: &StepView<'_, P>) -> Option<P::Move> {
        if view.frontier.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..view.frontier.len());
        Some(view.frontier[idx].clone())
    }
}
