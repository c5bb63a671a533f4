//! Set covering: choose columns until every row is covered, minimizing the
//! summed column cost. Files list covering columns per row with 1-based
//! indices; everything is 0-based after loading.

use crate::parse::{ParseError, TokenReader};
use crate::{ConstructiveProblem, Violation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Instance {
    pub num_rows: usize,
    pub num_cols: usize,
    pub costs: Vec<f64>,
    /// Per column, the rows it covers.
    pub rows_of: Vec<Vec<usize>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Solution {
    pub columns: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub column: usize,
}

#[derive(Debug)]
pub struct State {
    pub covered: Vec<bool>,
    pub num_covered: usize,
    pub picked: Vec<bool>,
    pub columns: Vec<usize>,
}

pub struct SetCovering;

impl ConstructiveProblem for SetCovering {
    type Instance = Instance;
    type State = State;
    type Move = Move;
    type Solution = Solution;

    const NAME: &'static str = "set_covering";

    fn parse_instances(text: &str) -> Result<Vec<Instance>, ParseError> {
        let mut reader = TokenReader::new(text);
        let num_rows = reader.usize_field("row count")?;
        let num_cols = reader.usize_field("column count")?;
        if num_rows == 0 || num_cols == 0 {
            return Err(ParseError::malformed(
                reader.line(),
                "row and column counts must be positive",
            ));
        }
        let costs = reader.f64_block(num_cols, "column cost")?;
        let mut rows_of = vec![Vec::new(); num_cols];
        for row in 0..num_rows {
            let count = reader.usize_field("covering column count")?;
            for _ in 0..count {
                let column = reader.usize_field("covering column index")?;
                if column == 0 || column > num_cols {
                    return Err(ParseError::malformed(
                        reader.line(),
                        format!(
                            "covering column {} out of range 1..={}",
                            column, num_cols
                        ),
                    ));
                }
                rows_of[column - 1].push(row);
            }
        }
        reader.finish()?;
        Ok(vec![Instance {
            num_rows,
            num_cols,
            costs,
            rows_of,
        }])
    }

    fn initial_state(instance: &Instance) -> State {
        State {
            covered: vec![false; instance.num_rows],
            num_covered: 0,
            picked: vec![false; instance.num_cols],
            columns: Vec::new(),
        }
    }

    fn is_complete(instance: &Instance, state: &State) -> bool {
        state.num_covered == instance.num_rows
    }

    fn frontier(instance: &Instance, state: &State) -> Vec<Move> {
        (0..instance.num_cols)
            .filter(|&column| {
                !state.picked[column]
                    && instance.rows_of[column]
                        .iter()
                        .any(|&row| !state.covered[row])
            })
            .map(|column| Move { column })
            .collect()
    }

    fn apply(instance: &Instance, state: &mut State, mv: &Move) {
        state.picked[mv.column] = true;
        state.columns.push(mv.column);
        for &row in &instance.rows_of[mv.column] {
            if !state.covered[row] {
                state.covered[row] = true;
                state.num_covered += 1;
            }
        }
    }

    fn into_solution(_instance: &Instance, state: State) -> Solution {
        Solution {
            columns: state.columns,
        }
    }

    fn verify(instance: &Instance, solution: &Solution) -> Result<(), Violation> {
        let mut picked = vec![false; instance.num_cols];
        let mut covered = vec![false; instance.num_rows];
        for &column in &solution.columns {
            if column >= instance.num_cols {
                return Err(Violation::OutOfBounds {
                    unit: column,
                    len: instance.num_cols,
                });
            }
            if picked[column] {
                return Err(Violation::Duplicate { unit: column });
            }
            picked[column] = true;
            for &row in &instance.rows_of[column] {
                covered[row] = true;
            }
        }
        if let Some(row) = covered.iter().position(|&c| !c) {
            return Err(Violation::Missing { unit: row });
        }
        Ok(())
    }

    fn score(instance: &Instance, solution: &Solution) -> f64 {
        solution
            .columns
            .iter()
            .map(|&column| instance.costs[column])
            .sum()
    }
}

pub mod baselines {
    use super::{Move, SetCovering};
    use crate::{Candidate, StepView};

    /// Classic greedy cover: minimize cost per newly covered row.
    pub struct BestRatio;

    impl Candidate<SetCovering> for BestRatio {
        fn decide(&mut self, view: &StepView<'_, SetCovering>) -> Option<Move> {
            view.frontier
                .iter()
                .min_by(|a, b| {
                    let ratio = |mv: &Move| {
                        let fresh = view.instance.rows_of[mv.column]
                            .iter()
                            .filter(|&&row| !view.state.covered[row])
                            .count();
                        view.instance.costs[mv.column] / fresh as f64
                    };
                    ratio(a).total_cmp(&ratio(b))
                })
                .copied()
        }
    }
}
