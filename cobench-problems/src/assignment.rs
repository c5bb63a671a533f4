//! Linear assignment: n agents, n tasks, one task per agent. Files are
//! either a dense n-by-n cost matrix or a sparse `(row, col, value)` listing
//! where unlisted pairs get a dominated sentinel cost.

use crate::parse::{ParseError, TokenReader};
use crate::{ConstructiveProblem, Violation};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Instance {
    pub num_agents: usize,
    pub costs: Array2<f64>,
}

/// `(agent, task)` pairs, 0-based.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Solution {
    pub pairs: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub agent: usize,
    pub task: usize,
}

#[derive(Debug)]
pub struct State {
    pub next_agent: usize,
    pub task_used: Vec<bool>,
    pub pairs: Vec<(usize, usize)>,
}

/// Sentinel multiplier for pairs a sparse file leaves out. The default must
/// never beat a listed cost.
const SPARSE_DEFAULT_FACTOR: f64 = 1000.0;

fn split_header(text: &str) -> Result<(usize, Vec<&str>, &str, usize), ParseError> {
    let mut offset = 0;
    let mut line_no = 0;
    for line in text.split_inclusive('\n') {
        line_no += 1;
        offset += line.len();
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if !tokens.is_empty() {
            return Ok((line_no, tokens, &text[offset..], line_no + 1));
        }
    }
    Err(ParseError::UnexpectedEnd {
        line: line_no.max(1),
        expected: "matrix dimension header".to_string(),
    })
}

fn parse_dense(
    n: usize,
    reader: &mut TokenReader<'_>,
) -> Result<Array2<f64>, ParseError> {
    let values = reader.f64_block(n * n, "assignment cost")?;
    Array2::from_shape_vec((n, n), values)
        .map_err(|_| ParseError::malformed(reader.line(), "cost matrix shape mismatch"))
}

fn parse_sparse(
    n: usize,
    num_entries: usize,
    reader: &mut TokenReader<'_>,
) -> Result<Array2<f64>, ParseError> {
    let mut listed = Array2::from_elem((n, n), false);
    let mut costs = Array2::zeros((n, n));
    for _ in 0..num_entries {
        let row = reader.usize_field("entry row")?;
        let col = reader.usize_field("entry column")?;
        let value = reader.f64_field("entry value")?;
        if row >= n || col >= n {
            return Err(ParseError::malformed(
                reader.line(),
                format!("entry ({}, {}) is outside the {}x{} matrix", row, col, n, n),
            ));
        }
        if listed[(row, col)] {
            return Err(ParseError::malformed(
                reader.line(),
                format!("entry ({}, {}) is listed twice", row, col),
            ));
        }
        listed[(row, col)] = true;
        costs[(row, col)] = value;
    }
    let global_max = costs
        .iter()
        .zip(listed.iter())
        .filter(|&(_, &l)| l)
        .map(|(&v, _)| v)
        .fold(f64::NEG_INFINITY, f64::max);
    for row in 0..n {
        let row_max = (0..n)
            .filter(|&col| listed[(row, col)])
            .map(|col| costs[(row, col)])
            .fold(f64::NEG_INFINITY, f64::max);
        let base = if row_max.is_finite() { row_max } else { global_max };
        let default = SPARSE_DEFAULT_FACTOR * base;
        for col in 0..n {
            if !listed[(row, col)] {
                costs[(row, col)] = default;
            }
        }
    }
    Ok(costs)
}

pub struct Assignment;

impl ConstructiveProblem for Assignment {
    type Instance = Instance;
    type State = State;
    type Move = Move;
    type Solution = Solution;

    const NAME: &'static str = "assignment";

    fn parse_instances(text: &str) -> Result<Vec<Instance>, ParseError> {
        let (header_line, header, rest, rest_start) = split_header(text)?;
        let parse_dim = |token: &str| -> Result<usize, ParseError> {
            token.parse().map_err(|_| ParseError::InvalidToken {
                line: header_line,
                expected: "matrix dimension (non-negative integer)".to_string(),
                token: token.to_string(),
            })
        };
        let mut reader = TokenReader::with_start_line(rest, rest_start);
        let costs = match header.len() {
            1 => {
                let n = parse_dim(header[0])?;
                parse_dense(n, &mut reader)?
            }
            2 => {
                let n = parse_dim(header[0])?;
                let num_entries = parse_dim(header[1])?;
                if num_entries == 0 {
                    return Err(ParseError::malformed(
                        header_line,
                        "sparse instance lists no entries",
                    ));
                }
                parse_sparse(n, num_entries, &mut reader)?
            }
            _ => {
                return Err(ParseError::malformed(
                    header_line,
                    "header must be `n` (dense) or `n num_entries` (sparse)",
                ))
            }
        };
        reader.finish()?;
        Ok(vec![Instance {
            num_agents: costs.nrows(),
            costs,
        }])
    }

    fn initial_state(instance: &Instance) -> State {
        State {
            next_agent: 0,
            task_used: vec![false; instance.num_agents],
            pairs: Vec::with_capacity(instance.num_agents),
        }
    }

    fn is_complete(instance: &Instance, state: &State) -> bool {
        state.next_agent == instance.num_agents
    }

    fn frontier(instance: &Instance, state: &State) -> Vec<Move> {
        (0..instance.num_agents)
            .filter(|&task| !state.task_used[task])
            .map(|task| Move {
                agent: state.next_agent,
                task,
            })
            .collect()
    }

    fn apply(_instance: &Instance, state: &mut State, mv: &Move) {
        state.pairs.push((mv.agent, mv.task));
        state.task_used[mv.task] = true;
        state.next_agent += 1;
    }

    fn into_solution(_instance: &Instance, state: State) -> Solution {
        Solution { pairs: state.pairs }
    }

    fn verify(instance: &Instance, solution: &Solution) -> Result<(), Violation> {
        let n = instance.num_agents;
        let mut agent_seen = vec![false; n];
        let mut task_seen = vec![false; n];
        for &(agent, task) in &solution.pairs {
            if agent >= n {
                return Err(Violation::OutOfBounds { unit: agent, len: n });
            }
            if task >= n {
                return Err(Violation::OutOfBounds { unit: task, len: n });
            }
            if agent_seen[agent] {
                return Err(Violation::Duplicate { unit: agent });
            }
            if task_seen[task] {
                return Err(Violation::Duplicate { unit: task });
            }
            agent_seen[agent] = true;
            task_seen[task] = true;
        }
        if let Some(agent) = agent_seen.iter().position(|&s| !s) {
            return Err(Violation::Missing { unit: agent });
        }
        Ok(())
    }

    fn score(instance: &Instance, solution: &Solution) -> f64 {
        solution
            .pairs
            .iter()
            .map(|&(agent, task)| instance.costs[(agent, task)])
            .sum()
    }
}

pub mod baselines {
    use super::{Assignment, Move};
    use crate::{Candidate, StepView};

    /// Greedily hands the current agent its cheapest remaining task.
    pub struct CheapestTask;

    impl Candidate<Assignment> for CheapestTask {
        fn decide(&mut self, view: &StepView<'_, Assignment>) -> Option<Move> {
            view.frontier
                .iter()
                .min_by(|a, b| {
                    view.instance.costs[(a.agent, a.task)]
                        .total_cmp(&view.instance.costs[(b.agent, b.task)])
                })
                .copied()
        }
    }
}
