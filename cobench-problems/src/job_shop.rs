//! Job-shop scheduling. Each job is a fixed sequence of operations, one per
//! machine; construction dispatches the next operation of some job at the
//! earliest time both the job and the machine are free. The objective is the
//! makespan.

use crate::parse::{ParseError, TokenReader};
use crate::{ConstructiveProblem, Violation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Instance {
    pub num_jobs: usize,
    pub num_machines: usize,
    /// Per job, the ordered `(machine, duration)` operations.
    pub operations: Vec<Vec<(usize, i64)>>,
}

/// Start time of every operation, in job order.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Solution {
    pub start_times: Vec<Vec<i64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Dispatch the next pending operation of this job.
    pub job: usize,
}

#[derive(Debug)]
pub struct State {
    pub next_op: Vec<usize>,
    pub job_free: Vec<i64>,
    pub machine_free: Vec<i64>,
    pub start_times: Vec<Vec<i64>>,
}

pub struct JobShop;

impl ConstructiveProblem for JobShop {
    type Instance = Instance;
    type State = State;
    type Move = Move;
    type Solution = Solution;

    const NAME: &'static str = "job_shop";

    fn parse_instances(text: &str) -> Result<Vec<Instance>, ParseError> {
        let mut reader = TokenReader::new(text);
        let num_cases = reader.usize_field("case count")?;
        let mut instances = Vec::with_capacity(num_cases);
        for _ in 0..num_cases {
            let num_jobs = reader.usize_field("job count")?;
            let num_machines = reader.usize_field("machine count")?;
            if num_jobs == 0 || num_machines == 0 {
                return Err(ParseError::malformed(
                    reader.line(),
                    "job and machine counts must be positive",
                ));
            }
            let mut operations = Vec::with_capacity(num_jobs);
            for _ in 0..num_jobs {
                let mut ops = Vec::with_capacity(num_machines);
                for _ in 0..num_machines {
                    let machine = reader.usize_field("machine index")?;
                    let duration = reader.i64_field("processing time")?;
                    if machine >= num_machines {
                        return Err(ParseError::malformed(
                            reader.line(),
                            format!(
                                "machine index {} out of range (instance has {})",
                                machine, num_machines
                            ),
                        ));
                    }
                    if duration < 0 {
                        return Err(ParseError::malformed(
                            reader.line(),
                            "processing times must be non-negative",
                        ));
                    }
                    ops.push((machine, duration));
                }
                operations.push(ops);
            }
            instances.push(Instance {
                num_jobs,
                num_machines,
                operations,
            });
        }
        reader.finish()?;
        Ok(instances)
    }

    fn initial_state(instance: &Instance) -> State {
        State {
            next_op: vec![0; instance.num_jobs],
            job_free: vec![0; instance.num_jobs],
            machine_free: vec![0; instance.num_machines],
            start_times: vec![Vec::with_capacity(instance.num_machines); instance.num_jobs],
        }
    }

    fn is_complete(instance: &Instance, state: &State) -> bool {
        state
            .next_op
            .iter()
            .enumerate()
            .all(|(job, &op)| op == instance.operations[job].len())
    }

    fn frontier(instance: &Instance, state: &State) -> Vec<Move> {
        (0..instance.num_jobs)
            .filter(|&job| state.next_op[job] < instance.operations[job].len())
            .map(|job| Move { job })
            .collect()
    }

    fn apply(instance: &Instance, state: &mut State, mv: &Move) {
        let job = mv.job;
        let (machine, duration) = instance.operations[job][state.next_op[job]];
        let start = state.job_free[job].max(state.machine_free[machine]);
        state.start_times[job].push(start);
        state.job_free[job] = start + duration;
        state.machine_free[machine] = start + duration;
        state.next_op[job] += 1;
    }

    fn into_solution(_instance: &Instance, state: State) -> Solution {
        Solution {
            start_times: state.start_times,
        }
    }

    fn verify(instance: &Instance, solution: &Solution) -> Result<(), Violation> {
        if solution.start_times.len() != instance.num_jobs {
            return Err(Violation::Structural(format!(
                "solution schedules {} jobs, instance has {}",
                solution.start_times.len(),
                instance.num_jobs
            )));
        }
        let mut machine_usage: Vec<Vec<(i64, i64)>> = vec![Vec::new(); instance.num_machines];
        for (job, starts) in solution.start_times.iter().enumerate() {
            let ops = &instance.operations[job];
            if starts.len() != ops.len() {
                return Err(Violation::Structural(format!(
                    "job {} schedules {} operations, expected {}",
                    job,
                    starts.len(),
                    ops.len()
                )));
            }
            let mut min_start = 0;
            for (op_idx, (&start, &(machine, duration))) in
                starts.iter().zip(ops.iter()).enumerate()
            {
                if start < min_start {
                    return Err(Violation::Ordering(format!(
                        "job {} operation {} starts at {} before the previous one finishes at {}",
                        job, op_idx, start, min_start
                    )));
                }
                machine_usage[machine].push((start, start + duration));
                min_start = start + duration;
            }
        }
        for (machine, usage) in machine_usage.iter_mut().enumerate() {
            usage.sort_by_key(|&(start, _)| start);
            for window in usage.windows(2) {
                if window[1].0 < window[0].1 {
                    return Err(Violation::Ordering(format!(
                        "machine {} runs overlapping operations",
                        machine
                    )));
                }
            }
        }
        Ok(())
    }

    fn score(instance: &Instance, solution: &Solution) -> f64 {
        let mut makespan = 0;
        for (job, starts) in solution.start_times.iter().enumerate() {
            for (&start, &(_, duration)) in starts.iter().zip(&instance.operations[job]) {
                makespan = makespan.max(start + duration);
            }
        }
        makespan as f64
    }
}

pub mod baselines {
    use super::{JobShop, Move};
    use crate::{Candidate, StepView};

    /// Shortest-processing-time dispatching: pick the job whose next
    /// operation is quickest.
    pub struct ShortestProcessingTime;

    impl Candidate<JobShop> for ShortestProcessingTime {
        fn decide(&mut self, view: &StepView<'_, JobShop>) -> Option<Move> {
            view.frontier
                .iter()
                .min_by_key(|mv| {
                    let op = view.state.next_op[mv.job];
                    view.instance.operations[mv.job][op].1
                })
                .copied()
        }
    }
}
