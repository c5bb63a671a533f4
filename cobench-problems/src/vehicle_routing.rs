//! Capacitated vehicle routing. Node 0 is the depot; every other node is a
//! customer with a demand. Routes are built one at a time from the depot and
//! the objective is total travel distance.

use crate::parse::{ParseError, TokenReader};
use crate::{ConstructiveProblem, Violation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Instance {
    pub num_nodes: usize,
    pub capacity: i64,
    pub demands: Vec<i64>,
    pub distance_matrix: Vec<Vec<f64>>,
}

/// Routes hold customer indices only; the depot legs are implied.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Solution {
    pub routes: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Visit(usize),
    /// Return to the depot and start the next vehicle.
    CloseRoute,
}

#[derive(Debug)]
pub struct State {
    pub unvisited: Vec<bool>,
    pub num_unvisited: usize,
    pub closed_routes: Vec<Vec<usize>>,
    pub current_route: Vec<usize>,
    pub remaining: i64,
    pub current_node: usize,
}

pub fn euclidean_matrix(positions: &[(f64, f64)]) -> Vec<Vec<f64>> {
    positions
        .iter()
        .map(|&(x1, y1)| {
            positions
                .iter()
                .map(|&(x2, y2)| (x1 - x2).hypot(y1 - y2))
                .collect()
        })
        .collect()
}

pub struct VehicleRouting;

impl ConstructiveProblem for VehicleRouting {
    type Instance = Instance;
    type State = State;
    type Move = Move;
    type Solution = Solution;

    const NAME: &'static str = "vehicle_routing";

    fn parse_instances(text: &str) -> Result<Vec<Instance>, ParseError> {
        let mut reader = TokenReader::new(text);
        let num_cases = reader.usize_field("case count")?;
        let mut instances = Vec::with_capacity(num_cases);
        for _ in 0..num_cases {
            let num_nodes = reader.usize_field("node count")?;
            let capacity = reader.i64_field("vehicle capacity")?;
            if num_nodes == 0 {
                return Err(ParseError::malformed(
                    reader.line(),
                    "instance must contain at least the depot",
                ));
            }
            let mut positions = Vec::with_capacity(num_nodes);
            let mut demands = Vec::with_capacity(num_nodes);
            for _ in 0..num_nodes {
                let x = reader.f64_field("x coordinate")?;
                let y = reader.f64_field("y coordinate")?;
                let demand = reader.i64_field("demand")?;
                positions.push((x, y));
                demands.push(demand);
            }
            if demands[0] != 0 {
                return Err(ParseError::malformed(
                    reader.line(),
                    "depot demand must be zero",
                ));
            }
            if demands[1..].iter().any(|&d| d <= 0) {
                return Err(ParseError::malformed(
                    reader.line(),
                    "customer demands must be positive",
                ));
            }
            instances.push(Instance {
                num_nodes,
                capacity,
                demands,
                distance_matrix: euclidean_matrix(&positions),
            });
        }
        reader.finish()?;
        Ok(instances)
    }

    fn initial_state(instance: &Instance) -> State {
        let mut unvisited = vec![true; instance.num_nodes];
        unvisited[0] = false;
        State {
            num_unvisited: instance.num_nodes - 1,
            unvisited,
            closed_routes: Vec::new(),
            current_route: Vec::new(),
            remaining: instance.capacity,
            current_node: 0,
        }
    }

    fn is_complete(_instance: &Instance, state: &State) -> bool {
        state.num_unvisited == 0
    }

    fn frontier(instance: &Instance, state: &State) -> Vec<Move> {
        let mut moves: Vec<Move> = (1..instance.num_nodes)
            .filter(|&node| state.unvisited[node] && instance.demands[node] <= state.remaining)
            .map(Move::Visit)
            .collect();
        if !state.current_route.is_empty() {
            moves.push(Move::CloseRoute);
        }
        moves
    }

    fn apply(instance: &Instance, state: &mut State, mv: &Move) {
        match *mv {
            Move::Visit(node) => {
                state.current_route.push(node);
                state.remaining -= instance.demands[node];
                state.unvisited[node] = false;
                state.num_unvisited -= 1;
                state.current_node = node;
            }
            Move::CloseRoute => {
                state
                    .closed_routes
                    .push(std::mem::take(&mut state.current_route));
                state.remaining = instance.capacity;
                state.current_node = 0;
            }
        }
    }

    fn into_solution(_instance: &Instance, mut state: State) -> Solution {
        if !state.current_route.is_empty() {
            state.closed_routes.push(state.current_route);
        }
        Solution {
            routes: state.closed_routes,
        }
    }

    fn verify(instance: &Instance, solution: &Solution) -> Result<(), Violation> {
        let mut visited = vec![false; instance.num_nodes];
        visited[0] = true;
        for (route_idx, route) in solution.routes.iter().enumerate() {
            if route.is_empty() {
                return Err(Violation::Structural(format!(
                    "route {} visits no customer",
                    route_idx
                )));
            }
            let mut load = 0;
            for &node in route {
                if node == 0 || node >= instance.num_nodes {
                    return Err(Violation::OutOfBounds {
                        unit: node,
                        len: instance.num_nodes,
                    });
                }
                if visited[node] {
                    return Err(Violation::Duplicate { unit: node });
                }
                visited[node] = true;
                load += instance.demands[node];
            }
            if load > instance.capacity {
                return Err(Violation::CapacityExceeded {
                    scope: "route",
                    index: route_idx,
                    load,
                    capacity: instance.capacity,
                });
            }
        }
        if let Some(node) = visited.iter().position(|&v| !v) {
            return Err(Violation::Missing { unit: node });
        }
        Ok(())
    }

    fn score(instance: &Instance, solution: &Solution) -> f64 {
        let mut total = 0.0;
        for route in &solution.routes {
            let mut current = 0;
            for &node in route {
                total += instance.distance_matrix[current][node];
                current = node;
            }
            total += instance.distance_matrix[current][0];
        }
        total
    }
}

pub mod baselines {
    use super::{Move, VehicleRouting};
    use crate::{Candidate, StepView};

    /// Visits the closest customer the current vehicle can still serve.
    pub struct NearestNeighbor;

    impl Candidate<VehicleRouting> for NearestNeighbor {
        fn decide(&mut self, view: &StepView<'_, VehicleRouting>) -> Option<Move> {
            let from = view.state.current_node;
            view.frontier
                .iter()
                .filter_map(|mv| match *mv {
                    Move::Visit(node) => {
                        Some((view.instance.distance_matrix[from][node], Move::Visit(node)))
                    }
                    Move::CloseRoute => None,
                })
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(_, mv)| mv)
                .or_else(|| {
                    view.frontier
                        .contains(&Move::CloseRoute)
                        .then_some(Move::CloseRoute)
                })
        }
    }
}
