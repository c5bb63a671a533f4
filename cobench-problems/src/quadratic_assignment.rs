//! Quadratic assignment: place n facilities on n locations; the cost of a
//! placement couples every pair through flow times distance.

use crate::parse::{ParseError, TokenReader};
use crate::{ConstructiveProblem, Violation};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Instance {
    pub num_facilities: usize,
    pub flow: Array2<f64>,
    pub distance: Array2<f64>,
}

/// `location_of[f]` is the location of facility `f`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Solution {
    pub location_of: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub facility: usize,
    pub location: usize,
}

#[derive(Debug)]
pub struct State {
    pub next_facility: usize,
    pub location_used: Vec<bool>,
    pub location_of: Vec<usize>,
}

pub struct QuadraticAssignment;

impl ConstructiveProblem for QuadraticAssignment {
    type Instance = Instance;
    type State = State;
    type Move = Move;
    type Solution = Solution;

    const NAME: &'static str = "quadratic_assignment";

    fn parse_instances(text: &str) -> Result<Vec<Instance>, ParseError> {
        let mut reader = TokenReader::new(text);
        let n = reader.usize_field("problem size")?;
        if n == 0 {
            return Err(ParseError::malformed(reader.line(), "problem size must be positive"));
        }
        let flow = reader.f64_block(n * n, "flow entry")?;
        let distance = reader.f64_block(n * n, "distance entry")?;
        reader.finish()?;
        Ok(vec![Instance {
            num_facilities: n,
            flow: Array2::from_shape_vec((n, n), flow)
                .map_err(|_| ParseError::malformed(reader.line(), "flow matrix shape mismatch"))?,
            distance: Array2::from_shape_vec((n, n), distance).map_err(|_| {
                ParseError::malformed(reader.line(), "distance matrix shape mismatch")
            })?,
        }])
    }

    fn initial_state(instance: &Instance) -> State {
        State {
            next_facility: 0,
            location_used: vec![false; instance.num_facilities],
            location_of: Vec::with_capacity(instance.num_facilities),
        }
    }

    fn is_complete(instance: &Instance, state: &State) -> bool {
        state.next_facility == instance.num_facilities
    }

    fn frontier(instance: &Instance, state: &State) -> Vec<Move> {
        (0..instance.num_facilities)
            .filter(|&location| !state.location_used[location])
            .map(|location| Move {
                facility: state.next_facility,
                location,
            })
            .collect()
    }

    fn apply(_instance: &Instance, state: &mut State, mv: &Move) {
        state.location_used[mv.location] = true;
        state.location_of.push(mv.location);
        state.next_facility += 1;
    }

    fn into_solution(_instance: &Instance, state: State) -> Solution {
        Solution {
            location_of: state.location_of,
        }
    }

    fn verify(instance: &Instance, solution: &Solution) -> Result<(), Violation> {
        let n = instance.num_facilities;
        if solution.location_of.len() != n {
            return Err(Violation::Structural(format!(
                "solution places {} facilities, instance has {}",
                solution.location_of.len(),
                n
            )));
        }
        let mut used = vec![false; n];
        for &location in &solution.location_of {
            if location >= n {
                return Err(Violation::OutOfBounds {
                    unit: location,
                    len: n,
                });
            }
            if used[location] {
                return Err(Violation::Duplicate { unit: location });
            }
            used[location] = true;
        }
        Ok(())
    }

    fn score(instance: &Instance, solution: &Solution) -> f64 {
        let loc = &solution.location_of;
        let n = instance.num_facilities;
        let mut total = 0.0;
        for i in 0..n {
            for j in 0..n {
                total += instance.flow[(i, j)] * instance.distance[(loc[i], loc[j])];
            }
        }
        total
    }
}

pub mod baselines {
    use super::{Move, QuadraticAssignment};
    use crate::{Candidate, StepView};

    /// Places each facility on the free location with the least interaction
    /// cost against everything already placed.
    pub struct GreedyInteraction;

    impl Candidate<QuadraticAssignment> for GreedyInteraction {
        fn decide(&mut self, view: &StepView<'_, QuadraticAssignment>) -> Option<Move> {
            let instance = view.instance;
            let placed = &view.state.location_of;
            view.frontier
                .iter()
                .min_by(|a, b| {
                    let cost = |mv: &Move| {
                        placed
                            .iter()
                            .enumerate()
                            .map(|(other, &other_loc)| {
                                instance.flow[(mv.facility, other)]
                                    * instance.distance[(mv.location, other_loc)]
                                    + instance.flow[(other, mv.facility)]
                                        * instance.distance[(other_loc, mv.location)]
                            })
                            .sum::<f64>()
                    };
                    cost(a).total_cmp(&cost(b))
                })
                .copied()
        }
    }
}
