//! Vehicle routing with time windows, read from Solomon-format files. This
//! is the deepest family: capacity, a fleet bound, and per-node time windows
//! all constrain the frontier, and arriving early means waiting until the
//! window opens.

pub mod baselines;

use crate::parse::ParseError;
use crate::{ConstructiveProblem, Violation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Instance {
    pub name: String,
    pub num_nodes: usize,
    pub fleet_size: usize,
    pub capacity: i64,
    pub demands: Vec<i64>,
    pub ready_times: Vec<f64>,
    pub due_times: Vec<f64>,
    pub service_times: Vec<f64>,
    pub distance_matrix: Vec<Vec<f64>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Solution {
    pub routes: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Visit(usize),
    CloseRoute,
}

#[derive(Debug)]
pub struct State {
    pub unvisited: Vec<bool>,
    pub num_unvisited: usize,
    pub closed_routes: Vec<Vec<usize>>,
    pub current_route: Vec<usize>,
    pub remaining: i64,
    pub time: f64,
    pub current_node: usize,
}

impl Instance {
    /// Arrival time at `node` when leaving `state` now, waiting out the
    /// ready time if the vehicle gets there early.
    fn arrival(&self, state: &State, node: usize) -> f64 {
        (state.time + self.distance_matrix[state.current_node][node]).max(self.ready_times[node])
    }

    fn feasible_visit(&self, state: &State, node: usize) -> bool {
        if self.demands[node] > state.remaining {
            return false;
        }
        let arrival = self.arrival(state, node);
        if arrival > self.due_times[node] {
            return false;
        }
        // the vehicle must still make it back before the depot closes
        arrival + self.service_times[node] + self.distance_matrix[node][0] <= self.due_times[0]
    }
}

fn numeric_row(line: &str) -> Option<Vec<&str>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if !tokens.is_empty() && tokens.iter().all(|t| t.parse::<f64>().is_ok()) {
        Some(tokens)
    } else {
        None
    }
}

pub struct Vrptw;

impl ConstructiveProblem for Vrptw {
    type Instance = Instance;
    type State = State;
    type Move = Move;
    type Solution = Solution;

    const NAME: &'static str = "vrptw";

    fn parse_instances(text: &str) -> Result<Vec<Instance>, ParseError> {
        let lines: Vec<(usize, &str)> = text.lines().enumerate().map(|(i, l)| (i + 1, l)).collect();
        let last_line = lines.len().max(1);
        let mut idx = 0;

        while idx < lines.len() && lines[idx].1.trim().is_empty() {
            idx += 1;
        }
        let name = match lines.get(idx).and_then(|(_, l)| l.split_whitespace().next()) {
            Some(token) => token.to_string(),
            None => {
                return Err(ParseError::UnexpectedEnd {
                    line: last_line,
                    expected: "instance name".to_string(),
                })
            }
        };
        idx += 1;

        while idx < lines.len() && !lines[idx].1.trim().eq_ignore_ascii_case("VEHICLE") {
            idx += 1;
        }
        if idx == lines.len() {
            return Err(ParseError::UnexpectedEnd {
                line: last_line,
                expected: "VEHICLE section".to_string(),
            });
        }
        let (fleet_size, capacity) = loop {
            idx += 1;
            match lines.get(idx) {
                Some(&(line_no, line)) => {
                    if let Some(tokens) = numeric_row(line) {
                        if tokens.len() != 2 {
                            return Err(ParseError::malformed(
                                line_no,
                                "VEHICLE section expects exactly NUMBER and CAPACITY",
                            ));
                        }
                        let fleet: usize =
                            tokens[0].parse().map_err(|_| ParseError::InvalidToken {
                                line: line_no,
                                expected: "fleet size (non-negative integer)".to_string(),
                                token: tokens[0].to_string(),
                            })?;
                        let capacity: i64 =
                            tokens[1].parse().map_err(|_| ParseError::InvalidToken {
                                line: line_no,
                                expected: "vehicle capacity (integer)".to_string(),
                                token: tokens[1].to_string(),
                            })?;
                        break (fleet, capacity);
                    }
                }
                None => {
                    return Err(ParseError::UnexpectedEnd {
                        line: last_line,
                        expected: "fleet size and capacity".to_string(),
                    })
                }
            }
        };

        while idx < lines.len() && !lines[idx].1.trim().to_ascii_uppercase().starts_with("CUSTOMER")
        {
            idx += 1;
        }
        if idx == lines.len() {
            return Err(ParseError::UnexpectedEnd {
                line: last_line,
                expected: "CUSTOMER section".to_string(),
            });
        }
        idx += 1;

        let mut positions: Vec<(f64, f64)> = Vec::new();
        let mut demands = Vec::new();
        let mut ready_times = Vec::new();
        let mut due_times = Vec::new();
        let mut service_times = Vec::new();
        let mut seen_rows = false;
        while idx < lines.len() {
            let (line_no, line) = lines[idx];
            idx += 1;
            if line.trim().is_empty() {
                continue;
            }
            let tokens = match numeric_row(line) {
                Some(tokens) => tokens,
                None if !seen_rows => continue, // column header line
                None => {
                    return Err(ParseError::InvalidToken {
                        line: line_no,
                        expected: "customer row".to_string(),
                        token: line.trim().to_string(),
                    })
                }
            };
            seen_rows = true;
            if tokens.len() != 7 {
                return Err(ParseError::malformed(
                    line_no,
                    format!("customer row has {} fields, expected 7", tokens.len()),
                ));
            }
            let id: usize = tokens[0].parse().map_err(|_| ParseError::InvalidToken {
                line: line_no,
                expected: "customer id (non-negative integer)".to_string(),
                token: tokens[0].to_string(),
            })?;
            if id != positions.len() {
                return Err(ParseError::malformed(
                    line_no,
                    format!("customer ids must be consecutive from 0, got {}", id),
                ));
            }
            let demand: i64 = tokens[3].parse().map_err(|_| ParseError::InvalidToken {
                line: line_no,
                expected: "demand (integer)".to_string(),
                token: tokens[3].to_string(),
            })?;
            // numeric_row already vetted these as numbers
            let x: f64 = tokens[1].parse().unwrap();
            let y: f64 = tokens[2].parse().unwrap();
            let ready: f64 = tokens[4].parse().unwrap();
            let due: f64 = tokens[5].parse().unwrap();
            let service: f64 = tokens[6].parse().unwrap();
            if ready > due {
                return Err(ParseError::malformed(
                    line_no,
                    "ready time is after due time",
                ));
            }
            positions.push((x, y));
            demands.push(demand);
            ready_times.push(ready);
            due_times.push(due);
            service_times.push(service);
        }
        if positions.len() < 2 {
            return Err(ParseError::UnexpectedEnd {
                line: last_line,
                expected: "depot and at least one customer row".to_string(),
            });
        }
        if demands[0] != 0 {
            return Err(ParseError::malformed(
                last_line,
                "depot demand must be zero",
            ));
        }

        Ok(vec![Instance {
            name,
            num_nodes: positions.len(),
            fleet_size,
            capacity,
            demands,
            ready_times,
            due_times,
            service_times,
            distance_matrix: crate::vehicle_routing::euclidean_matrix(&positions),
        }])
    }

    fn instance_label(instance: &Instance) -> Option<String> {
        Some(instance.name.clone())
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
            time: 0.0,
            current_node: 0,
        }
    }

    fn is_complete(_instance: &Instance, state: &State) -> bool {
        state.num_unvisited == 0
    }

    fn frontier(instance: &Instance, state: &State) -> Vec<Move> {
        let mut moves: Vec<Move> = (1..instance.num_nodes)
            .filter(|&node| state.unvisited[node] && instance.feasible_visit(state, node))
            .map(Move::Visit)
            .collect();
        if !state.current_route.is_empty()
            && state.closed_routes.len() + 2 <= instance.fleet_size
        {
            moves.push(Move::CloseRoute);
        }
        moves
    }

    fn apply(instance: &Instance, state: &mut State, mv: &Move) {
        match *mv {
            Move::Visit(node) => {
                let arrival = instance.arrival(state, node);
                state.time = arrival + instance.service_times[node];
                state.remaining -= instance.demands[node];
                state.current_route.push(node);
                state.unvisited[node] = false;
                state.num_unvisited -= 1;
                state.current_node = node;
            }
            Move::CloseRoute => {
                state
                    .closed_routes
                    .push(std::mem::take(&mut state.current_route));
                state.remaining = instance.capacity;
                state.time = 0.0;
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
        if solution.routes.len() > instance.fleet_size {
            return Err(Violation::Structural(format!(
                "number of routes ({}) exceeds fleet size ({})",
                solution.routes.len(),
                instance.fleet_size
            )));
        }
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
            let mut time = 0.0;
            let mut current = 0;
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
                if load > instance.capacity {
                    return Err(Violation::CapacityExceeded {
                        scope: "route",
                        index: route_idx,
                        load,
                        capacity: instance.capacity,
                    });
                }
                time += instance.distance_matrix[current][node];
                if time > instance.due_times[node] {
                    return Err(Violation::TimeWindow {
                        unit: node,
                        arrival: time,
                        latest: instance.due_times[node],
                    });
                }
                // arriving early is waiting, not a violation
                time = time.max(instance.ready_times[node]) + instance.service_times[node];
                current = node;
            }
            time += instance.distance_matrix[current][0];
            if time > instance.due_times[0] {
                return Err(Violation::TimeWindow {
                    unit: 0,
                    arrival: time,
                    latest: instance.due_times[0],
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
