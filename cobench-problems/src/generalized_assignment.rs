//! Generalized assignment: every job goes to exactly one agent, agents have
//! a resource capacity, and each (agent, job) pair has its own cost and
//! consumption.

use crate::parse::{ParseError, TokenReader};
use crate::{ConstructiveProblem, Violation};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Instance {
    pub num_agents: usize,
    pub num_jobs: usize,
    /// agents x jobs
    pub costs: Array2<f64>,
    /// agents x jobs
    pub consumption: Array2<i64>,
    pub capacities: Vec<i64>,
}

/// `agent_of[j]` is the agent serving job `j`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Solution {
    pub agent_of: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub job: usize,
    pub agent: usize,
}

#[derive(Debug)]
pub struct State {
    pub next_job: usize,
    pub remaining: Vec<i64>,
    pub agent_of: Vec<usize>,
}

pub struct GeneralizedAssignment;

impl ConstructiveProblem for GeneralizedAssignment {
    type Instance = Instance;
    type State = State;
    type Move = Move;
    type Solution = Solution;

    const NAME: &'static str = "generalized_assignment";

    fn parse_instances(text: &str) -> Result<Vec<Instance>, ParseError> {
        let mut reader = TokenReader::new(text);
        let num_cases = reader.usize_field("case count")?;
        let mut instances = Vec::with_capacity(num_cases);
        for _ in 0..num_cases {
            let num_agents = reader.usize_field("agent count")?;
            let num_jobs = reader.usize_field("job count")?;
            if num_agents == 0 || num_jobs == 0 {
                return Err(ParseError::malformed(
                    reader.line(),
                    "agent and job counts must be positive",
                ));
            }
            let costs = reader.f64_block(num_agents * num_jobs, "assignment cost")?;
            let consumption = reader.i64_block(num_agents * num_jobs, "resource consumption")?;
            if consumption.iter().any(|&c| c < 0) {
                return Err(ParseError::malformed(
                    reader.line(),
                    "resource consumption must be non-negative",
                ));
            }
            let capacities = reader.i64_block(num_agents, "agent capacity")?;
            instances.push(Instance {
                num_agents,
                num_jobs,
                costs: Array2::from_shape_vec((num_agents, num_jobs), costs)
                    .map_err(|_| ParseError::malformed(reader.line(), "cost matrix shape mismatch"))?,
                consumption: Array2::from_shape_vec((num_agents, num_jobs), consumption).map_err(
                    |_| ParseError::malformed(reader.line(), "consumption matrix shape mismatch"),
                )?,
                capacities,
            });
        }
        reader.finish()?;
        Ok(instances)
    }

    fn initial_state(instance: &Instance) -> State {
        State {
            next_job: 0,
            remaining: instance.capacities.clone(),
            agent_of: Vec::with_capacity(instance.num_jobs),
        }
    }

    fn is_complete(instance: &Instance, state: &State) -> bool {
        state.next_job == instance.num_jobs
    }

    fn frontier(instance: &Instance, state: &State) -> Vec<Move> {
        let job = state.next_job;
        (0..instance.num_agents)
            .filter(|&agent| instance.consumption[(agent, job)] <= state.remaining[agent])
            .map(|agent| Move { job, agent })
            .collect()
    }

    fn apply(instance: &Instance, state: &mut State, mv: &Move) {
        state.remaining[mv.agent] -= instance.consumption[(mv.agent, mv.job)];
        state.agent_of.push(mv.agent);
        state.next_job += 1;
    }

    fn into_solution(_instance: &Instance, state: State) -> Solution {
        Solution {
            agent_of: state.agent_of,
        }
    }

    fn verify(instance: &Instance, solution: &Solution) -> Result<(), Violation> {
        if solution.agent_of.len() != instance.num_jobs {
            return Err(Violation::Structural(format!(
                "solution assigns {} jobs, instance has {}",
                solution.agent_of.len(),
                instance.num_jobs
            )));
        }
        let mut loads = vec![0i64; instance.num_agents];
        for (job, &agent) in solution.agent_of.iter().enumerate() {
            if agent >= instance.num_agents {
                return Err(Violation::OutOfBounds {
                    unit: agent,
                    len: instance.num_agents,
                });
            }
            loads[agent] += instance.consumption[(agent, job)];
            if loads[agent] > instance.capacities[agent] {
                return Err(Violation::CapacityExceeded {
                    scope: "agent",
                    index: agent,
                    load: loads[agent],
                    capacity: instance.capacities[agent],
                });
            }
        }
        Ok(())
    }

    fn score(instance: &Instance, solution: &Solution) -> f64 {
        solution
            .agent_of
            .iter()
            .enumerate()
            .map(|(job, &agent)| instance.costs[(agent, job)])
            .sum()
    }
}

pub mod baselines {
    use super::{GeneralizedAssignment, Move};
    use crate::{Candidate, StepView};

    /// Sends each job to the feasible agent with the lowest cost for it.
    pub struct CheapestAgent;

    impl Candidate<GeneralizedAssignment> for CheapestAgent {
        fn decide(&mut self, view: &StepView<'_, GeneralizedAssignment>) -> Option<Move> {
            view.frontier
                .iter()
                .min_by(|a, b| {
                    view.instance.costs[(a.agent, a.job)]
                        .total_cmp(&view.instance.costs[(b.agent, b.job)])
                })
                .copied()
        }
    }
}
