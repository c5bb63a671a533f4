//! End-to-end checks across load, construct, verify and score.

use cobench_harness::{construct, run, BenchmarkInstance, EvaluationOutcome, ReferenceTable, RunConfig};
use cobench_problems::assignment::{self, Assignment};
use cobench_problems::bin_packing::{self, BinPacking};
use cobench_problems::vehicle_routing::{self, VehicleRouting};
use cobench_problems::{ConstructiveProblem, Violation};
use std::sync::Arc;

#[test]
fn test_bin_packing_end_to_end() {
    let text = "1\nsmall\n10 4 2\n6 5 4 3\n";
    let instance = BinPacking::parse_instances(text).unwrap().remove(0);
    let solution = construct::<BinPacking, _>(
        &instance,
        &mut bin_packing::baselines::FirstFitDecreasing,
    )
    .unwrap();
    assert!(BinPacking::verify(&instance, &solution).is_ok());
    assert_eq!(solution.bins.len(), 2);
    let loads: Vec<i64> = solution
        .bins
        .iter()
        .map(|bin| bin.iter().map(|&item| instance.sizes[item]).sum())
        .collect();
    assert_eq!(loads.iter().sum::<i64>(), 18);
    assert!(loads.iter().all(|&load| load <= instance.capacity));
}

#[test]
fn test_capacitated_routing_end_to_end() {
    // depot-centered instance, three customers of demand 4, capacity 10
    let text = "\
1
4 10
0 0 0
1 0 4
0 1 4
-1 0 4
";
    let instance = VehicleRouting::parse_instances(text).unwrap().remove(0);
    let solution = construct::<VehicleRouting, _>(
        &instance,
        &mut vehicle_routing::baselines::NearestNeighbor,
    )
    .unwrap();
    assert!(VehicleRouting::verify(&instance, &solution).is_ok());
    // 12 units of demand cannot fit a single vehicle of capacity 10
    assert!(solution.routes.len() >= 2);

    let omitting = vehicle_routing::Solution {
        routes: vec![vec![1, 2]],
    };
    assert!(matches!(
        VehicleRouting::verify(&instance, &omitting),
        Err(Violation::Missing { unit: 3 })
    ));
}

#[test]
fn test_assignment_end_to_end() {
    let text = "3\n1 9 9\n9 2 9\n9 9 3\n";
    let instance = Assignment::parse_instances(text).unwrap().remove(0);
    let solution = construct::<Assignment, _>(
        &instance,
        &mut assignment::baselines::CheapestTask,
    )
    .unwrap();
    assert!(Assignment::verify(&instance, &solution).is_ok());
    // the greedy picks the diagonal here, so the score is its sum
    assert_eq!(solution.pairs, vec![(0, 0), (1, 1), (2, 2)]);
    assert_eq!(Assignment::score(&instance, &solution), 6.0);

    let reused_task = assignment::Solution {
        pairs: vec![(0, 0), (1, 0), (2, 2)],
    };
    assert!(matches!(
        Assignment::verify(&instance, &reused_task),
        Err(Violation::Duplicate { unit: 0 })
    ));
}

#[test]
fn test_full_run_reports_scored_outcomes() {
    let text = "1\nsmall\n10 4 2\n6 5 4 3\n";
    let instance = BinPacking::parse_instances(text).unwrap().remove(0);
    let dataset = vec![BenchmarkInstance::<BinPacking> {
        label: "small".to_string(),
        case: Ok(Arc::new(instance)),
    }];
    let summary = run(
        &dataset,
        || bin_packing::baselines::FirstFitDecreasing,
        &ReferenceTable::new(),
        &RunConfig::default(),
    );
    assert!(matches!(
        summary.reports[0].outcome,
        EvaluationOutcome::Scored(score) if score == 2.0
    ));
    assert_eq!(summary.score, -2.0);
}
