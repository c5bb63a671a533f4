//! One-dimensional bin packing. Items are packed into the currently open
//! bin until the candidate opens a new one; the objective is the number of
//! bins used.

use crate::parse::{ParseError, TokenReader};
use crate::{ConstructiveProblem, Violation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Instance {
    pub id: String,
    pub capacity: i64,
    pub sizes: Vec<i64>,
    pub best_known_bins: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Solution {
    pub bins: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Put an item into the currently open bin.
    Place(usize),
    /// Close the current bin and start an empty one.
    OpenBin,
}

#[derive(Debug)]
pub struct State {
    pub unplaced: Vec<bool>,
    pub num_unplaced: usize,
    pub closed_bins: Vec<Vec<usize>>,
    pub current_bin: Vec<usize>,
    pub remaining: i64,
}

pub struct BinPacking;

impl ConstructiveProblem for BinPacking {
    type Instance = Instance;
    type State = State;
    type Move = Move;
    type Solution = Solution;

    const NAME: &'static str = "bin_packing";

    fn parse_instances(text: &str) -> Result<Vec<Instance>, ParseError> {
        let mut reader = TokenReader::new(text);
        let num_cases = reader.usize_field("case count")?;
        let mut instances = Vec::with_capacity(num_cases);
        for _ in 0..num_cases {
            let id = reader.ident("instance identifier")?.to_string();
            let capacity = reader.i64_field("bin capacity")?;
            let num_items = reader.usize_field("item count")?;
            let best_known_bins = reader.i64_field("best known bins")?;
            if capacity <= 0 {
                return Err(ParseError::malformed(
                    reader.line(),
                    "bin capacity must be positive",
                ));
            }
            let sizes = reader.i64_block(num_items, "item size")?;
            if sizes.iter().any(|&s| s <= 0) {
                return Err(ParseError::malformed(
                    reader.line(),
                    "item sizes must be positive",
                ));
            }
            instances.push(Instance {
                id,
                capacity,
                sizes,
                best_known_bins,
            });
        }
        reader.finish()?;
        Ok(instances)
    }

    fn instance_label(instance: &Instance) -> Option<String> {
        Some(instance.id.clone())
    }

    fn initial_state(instance: &Instance) -> State {
        State {
            unplaced: vec![true; instance.sizes.len()],
            num_unplaced: instance.sizes.len(),
            closed_bins: Vec::new(),
            current_bin: Vec::new(),
            remaining: instance.capacity,
        }
    }

    fn is_complete(_instance: &Instance, state: &State) -> bool {
        state.num_unplaced == 0
    }

    fn frontier(instance: &Instance, state: &State) -> Vec<Move> {
        let mut moves: Vec<Move> = (0..instance.sizes.len())
            .filter(|&item| state.unplaced[item] && instance.sizes[item] <= state.remaining)
            .map(Move::Place)
            .collect();
        if !state.current_bin.is_empty() {
            moves.push(Move::OpenBin);
        }
        moves
    }

    fn apply(instance: &Instance, state: &mut State, mv: &Move) {
        match *mv {
            Move::Place(item) => {
                state.current_bin.push(item);
                state.remaining -= instance.sizes[item];
                state.unplaced[item] = false;
                state.num_unplaced -= 1;
            }
            Move::OpenBin => {
                state.closed_bins.push(std::mem::take(&mut state.current_bin));
                state.remaining = instance.capacity;
            }
        }
    }

    fn into_solution(_instance: &Instance, mut state: State) -> Solution {
        if !state.current_bin.is_empty() {
            state.closed_bins.push(state.current_bin);
        }
        Solution {
            bins: state.closed_bins,
        }
    }

    fn verify(instance: &Instance, solution: &Solution) -> Result<(), Violation> {
        let num_items = instance.sizes.len();
        let mut placed = vec![false; num_items];
        for (bin_idx, bin) in solution.bins.iter().enumerate() {
            if bin.is_empty() {
                return Err(Violation::Structural(format!("bin {} is empty", bin_idx)));
            }
            let mut load = 0;
            for &item in bin {
                if item >= num_items {
                    return Err(Violation::OutOfBounds {
                        unit: item,
                        len: num_items,
                    });
                }
                if placed[item] {
                    return Err(Violation::Duplicate { unit: item });
                }
                placed[item] = true;
                load += instance.sizes[item];
            }
            if load > instance.capacity {
                return Err(Violation::CapacityExceeded {
                    scope: "bin",
                    index: bin_idx,
                    load,
                    capacity: instance.capacity,
                });
            }
        }
        if let Some(item) = placed.iter().position(|&p| !p) {
            return Err(Violation::Missing { unit: item });
        }
        Ok(())
    }

    fn score(_instance: &Instance, solution: &Solution) -> f64 {
        solution.bins.len() as f64
    }
}

pub mod baselines {
    use super::{BinPacking, Move};
    use crate::{Candidate, StepView};

    /// Keeps placing the largest item that still fits the open bin, opening
    /// a new bin only when nothing fits.
    pub struct FirstFitDecreasing;

    impl Candidate<BinPacking> for FirstFitDecreasing {
        fn decide(&mut self, view: &StepView<'_, BinPacking>) -> Option<Move> {
            view.frontier
                .iter()
                .filter_map(|mv| match *mv {
                    Move::Place(item) => Some((view.instance.sizes[item], Move::Place(item))),
                    Move::OpenBin => None,
                })
                .max_by_key(|&(size, _)| size)
                .map(|(_, mv)| mv)
                .or_else(|| view.frontier.contains(&Move::OpenBin).then_some(Move::OpenBin))
        }
    }
}
