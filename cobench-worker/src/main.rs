use anyhow::{anyhow, Context, Result};
use clap::{arg, ArgAction, Command};
use cobench_harness::{load_dataset, run, ReferenceTable, RunConfig, Summary};
use cobench_problems::assignment::Assignment;
use cobench_problems::bin_packing::BinPacking;
use cobench_problems::candidates::{FirstFeasible, RandomPick};
use cobench_problems::equitable_partition::EquitablePartition;
use cobench_problems::facility_location::FacilityLocation;
use cobench_problems::generalized_assignment::GeneralizedAssignment;
use cobench_problems::job_shop::JobShop;
use cobench_problems::quadratic_assignment::QuadraticAssignment;
use cobench_problems::set_covering::SetCovering;
use cobench_problems::vehicle_routing::VehicleRouting;
use cobench_problems::vrptw::Vrptw;
use cobench_problems::{assignment, bin_packing, equitable_partition, facility_location};
use cobench_problems::{generalized_assignment, job_shop, quadratic_assignment, set_covering};
use cobench_problems::{vehicle_routing, vrptw};
use cobench_problems::{Candidate, ConstructiveProblem};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

fn cli() -> Command {
    Command::new("cobench-worker")
        .about("Runs or verifies constructive-heuristic benchmarks")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run_benchmark")
                .about("Evaluates a candidate across a dataset")
                .arg(
                    arg!(<PROBLEM> "Problem family name")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<DATASET> "Path to an instance file or a directory of them")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--candidate [CANDIDATE] "Built-in candidate: greedy, first or random")
                        .default_value("greedy")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--"time-limit" [SECONDS] "Wall-clock limit per instance")
                        .default_value("30")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--penalty [PENALTY] "Cost charged for a failed instance")
                        .default_value("1000000000")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--refs [PATH] "JSON file mapping instance labels to reference scores")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--seed [SEED] "Seed for the random candidate")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--parallel "Evaluate instances on worker threads")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("verify_solution")
                .about("Verifies a solution against an instance file")
                .arg(
                    arg!(<PROBLEM> "Problem family name")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<INSTANCE> "Path to an instance file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<SOLUTION> "Solution json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--case [INDEX] "Case index within the instance file")
                        .default_value("0")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("run_benchmark", sub_m)) => run_benchmark(
            sub_m.get_one::<String>("PROBLEM").unwrap().clone(),
            sub_m.get_one::<PathBuf>("DATASET").unwrap().clone(),
            sub_m.get_one::<String>("candidate").unwrap().clone(),
            *sub_m.get_one::<u64>("time-limit").unwrap(),
            *sub_m.get_one::<f64>("penalty").unwrap(),
            sub_m.get_one::<PathBuf>("refs").cloned(),
            *sub_m.get_one::<u64>("seed").unwrap(),
            sub_m.get_flag("parallel"),
        ),
        Some(("verify_solution", sub_m)) => verify_solution(
            sub_m.get_one::<String>("PROBLEM").unwrap().clone(),
            sub_m.get_one::<PathBuf>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<String>("SOLUTION").unwrap().clone(),
            *sub_m.get_one::<usize>("case").unwrap(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct BenchArgs {
    dataset: PathBuf,
    references: ReferenceTable,
    config: RunConfig,
}

fn run_benchmark(
    problem: String,
    dataset: PathBuf,
    candidate: String,
    time_limit_secs: u64,
    penalty: f64,
    refs: Option<PathBuf>,
    seed: u64,
    parallel: bool,
) -> Result<()> {
    let references = match refs {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read reference table {}", path.display()))?;
            let values: HashMap<String, f64> = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse reference table {}", path.display()))?;
            ReferenceTable::from_map(values)
        }
        None => ReferenceTable::new(),
    };
    let args = BenchArgs {
        dataset,
        references,
        config: RunConfig {
            time_limit: Duration::from_secs(time_limit_secs),
            penalty,
            parallel,
        },
    };

    macro_rules! benchmark_match {
        ([$(($name:literal, $problem:ty, $greedy:expr)),* $(,)?]) => {
            match problem.as_str() {
                $($name => match candidate.as_str() {
                    "greedy" => run_benchmark_for::<$problem, _, _>(&args, || $greedy),
                    "first" => run_benchmark_for::<$problem, _, _>(&args, || FirstFeasible),
                    "random" => run_benchmark_for::<$problem, _, _>(&args, || RandomPick::seeded(seed)),
                    other => Err(anyhow!("Unknown candidate: {}", other)),
                },)*
                other => Err(anyhow!("Unknown problem family: {}", other)),
            }
        };
    }

    let summary = benchmark_match!([
        ("bin_packing", BinPacking, bin_packing::baselines::FirstFitDecreasing),
        ("vehicle_routing", VehicleRouting, vehicle_routing::baselines::NearestNeighbor),
        ("vrptw", Vrptw, vrptw::baselines::NearestFeasible),
        ("assignment", Assignment, assignment::baselines::CheapestTask),
        (
            "generalized_assignment",
            GeneralizedAssignment,
            generalized_assignment::baselines::CheapestAgent
        ),
        (
            "quadratic_assignment",
            QuadraticAssignment,
            quadratic_assignment::baselines::GreedyInteraction
        ),
        ("job_shop", JobShop, job_shop::baselines::ShortestProcessingTime),
        ("set_covering", SetCovering, set_covering::baselines::BestRatio),
        ("facility_location", FacilityLocation, facility_location::baselines::CheapestService),
        ("equitable_partition", EquitablePartition, equitable_partition::baselines::LeastLoaded),
    ])?;

    tracing::info!(
        instances = summary.reports.len(),
        score = summary.score,
        "benchmark run complete"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_benchmark_for<P, C, F>(args: &BenchArgs, make_candidate: F) -> Result<Summary>
where
    P: ConstructiveProblem,
    C: Candidate<P> + Send + 'static,
    F: Fn() -> C + Sync,
{
    let dataset = load_dataset::<P>(&args.dataset)?;
    if dataset.is_empty() {
        return Err(anyhow!(
            "dataset {} contains no instance files",
            args.dataset.display()
        ));
    }
    Ok(run(&dataset, make_candidate, &args.references, &args.config))
}

fn verify_solution(
    problem: String,
    instance_path: PathBuf,
    solution: String,
    case_index: usize,
) -> Result<()> {
    macro_rules! verify_match {
        ([$(($name:literal, $problem:ty)),* $(,)?]) => {
            match problem.as_str() {
                $($name => verify_solution_for::<$problem>(&instance_path, &solution, case_index),)*
                other => Err(anyhow!("Unknown problem family: {}", other)),
            }
        };
    }

    verify_match!([
        ("bin_packing", BinPacking),
        ("vehicle_routing", VehicleRouting),
        ("vrptw", Vrptw),
        ("assignment", Assignment),
        ("generalized_assignment", GeneralizedAssignment),
        ("quadratic_assignment", QuadraticAssignment),
        ("job_shop", JobShop),
        ("set_covering", SetCovering),
        ("facility_location", FacilityLocation),
        ("equitable_partition", EquitablePartition),
    ])
}

fn verify_solution_for<P>(instance_path: &PathBuf, solution: &str, case_index: usize) -> Result<()>
where
    P: ConstructiveProblem,
    P::Solution: DeserializeOwned,
{
    let text = fs::read_to_string(instance_path)
        .with_context(|| format!("failed to read instance file {}", instance_path.display()))?;
    let instances = P::parse_instances(&text)
        .map_err(|e| anyhow!("{}: {}", instance_path.display(), e))?;
    let instance = instances.get(case_index).ok_or_else(|| {
        anyhow!(
            "{} holds {} cases, requested case {}",
            instance_path.display(),
            instances.len(),
            case_index
        )
    })?;

    let solution_json = if solution.ends_with(".json") {
        fs::read_to_string(solution)
            .with_context(|| format!("failed to read solution file {}", solution))?
    } else {
        solution.to_string()
    };
    let solution: P::Solution =
        serde_json::from_str(&solution_json).context("failed to parse solution")?;

    match P::verify(instance, &solution) {
        Ok(()) => {
            println!("Solution is valid (score: {})", P::score(instance, &solution));
            Ok(())
        }
        Err(violation) => Err(anyhow!("Invalid solution: {}", violation)),
    }
}
