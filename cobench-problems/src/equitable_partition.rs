//! Equitable partitioning: split weighted items into a fixed number of
//! groups so group loads stay close to the common target. The objective is
//! the summed absolute deviation from that target.

use crate::parse::{ParseError, TokenReader};
use crate::{ConstructiveProblem, Violation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Instance {
    pub num_items: usize,
    pub num_groups: usize,
    pub weights: Vec<i64>,
}

/// `group_of[i]` is the group of item `i`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Solution {
    pub group_of: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub item: usize,
    pub group: usize,
}

#[derive(Debug)]
pub struct State {
    pub next_item: usize,
    pub loads: Vec<i64>,
    pub group_of: Vec<usize>,
}

impl Instance {
    pub fn target_load(&self) -> f64 {
        self.weights.iter().sum::<i64>() as f64 / self.num_groups as f64
    }
}

pub struct EquitablePartition;

impl ConstructiveProblem for EquitablePartition {
    type Instance = Instance;
    type State = State;
    type Move = Move;
    type Solution = Solution;

    const NAME: &'static str = "equitable_partition";

    fn parse_instances(text: &str) -> Result<Vec<Instance>, ParseError> {
        let mut reader = TokenReader::new(text);
        let num_cases = reader.usize_field("case count")?;
        let mut instances = Vec::with_capacity(num_cases);
        for _ in 0..num_cases {
            let num_items = reader.usize_field("item count")?;
            let num_groups = reader.usize_field("group count")?;
            if num_groups == 0 {
                return Err(ParseError::malformed(
                    reader.line(),
                    "group count must be positive",
                ));
            }
            let weights = reader.i64_block(num_items, "item weight")?;
            if weights.iter().any(|&w| w < 0) {
                return Err(ParseError::malformed(
                    reader.line(),
                    "item weights must be non-negative",
                ));
            }
            instances.push(Instance {
                num_items,
                num_groups,
                weights,
            });
        }
        reader.finish()?;
        Ok(instances)
    }

    fn initial_state(instance: &Instance) -> State {
        State {
            next_item: 0,
            loads: vec![0; instance.num_groups],
            group_of: Vec::with_capacity(instance.num_items),
        }
    }

    fn is_complete(instance: &Instance, state: &State) -> bool {
        state.next_item == instance.num_items
    }

    fn frontier(instance: &Instance, state: &State) -> Vec<Move> {
        (0..instance.num_groups)
            .map(|group| Move {
                item: state.next_item,
                group,
            })
            .collect()
    }

    fn apply(instance: &Instance, state: &mut State, mv: &Move) {
        state.loads[mv.group] += instance.weights[mv.item];
        state.group_of.push(mv.group);
        state.next_item += 1;
    }

    fn into_solution(_instance: &Instance, state: State) -> Solution {
        Solution {
            group_of: state.group_of,
        }
    }

    fn verify(instance: &Instance, solution: &Solution) -> Result<(), Violation> {
        if solution.group_of.len() != instance.num_items {
            return Err(Violation::Structural(format!(
                "solution places {} items, instance has {}",
                solution.group_of.len(),
                instance.num_items
            )));
        }
        for &group in &solution.group_of {
            if group >= instance.num_groups {
                return Err(Violation::OutOfBounds {
                    unit: group,
                    len: instance.num_groups,
                });
            }
        }
        Ok(())
    }

    fn score(instance: &Instance, solution: &Solution) -> f64 {
        let mut loads = vec![0i64; instance.num_groups];
        for (item, &group) in solution.group_of.iter().enumerate() {
            loads[group] += instance.weights[item];
        }
        let target = instance.target_load();
        loads.iter().map(|&l| (l as f64 - target).abs()).sum()
    }
}

pub mod baselines {
    use super::{EquitablePartition, Move};
    use crate::{Candidate, StepView};

    /// Drops each item into the group with the lightest load so far.
    pub struct LeastLoaded;

    impl Candidate<EquitablePartition> for LeastLoaded {
        fn decide(&mut self, view: &StepView<'_, EquitablePartition>) -> Option<Move> {
            view.frontier
                .iter()
                .min_by_key(|mv| view.state.loads[mv.group])
                .copied()
        }
    }
}
