use cobench_problems::generalized_assignment::{GeneralizedAssignment, Move, Solution};
use cobench_problems::parse::ParseError;
use cobench_problems::{ConstructiveProblem, Violation};

const SAMPLE: &str = "\
1
2 3
4 1 2
2 3 4
1 2 2
2 3 2
5 4
";

fn sample_instance() -> cobench_problems::generalized_assignment::Instance {
    GeneralizedAssignment::parse_instances(SAMPLE)
        .unwrap()
        .remove(0)
}

#[test]
fn test_parse_sample() {
    let instance = sample_instance();
    assert_eq!(instance.num_agents, 2);
    assert_eq!(instance.num_jobs, 3);
    assert_eq!(instance.costs[(0, 1)], 1.0);
    assert_eq!(instance.costs[(1, 0)], 2.0);
    assert_eq!(instance.consumption[(1, 2)], 2);
    assert_eq!(instance.capacities, vec![5, 4]);
}

#[test]
fn test_parse_rejects_non_numeric_cost() {
    let text = "1\n2 2\n1 2\n3 x\n";
    match GeneralizedAssignment::parse_instances(text) {
        Err(ParseError::InvalidToken { line, token, .. }) => {
            assert_eq!(line, 4);
            assert_eq!(token, "x");
        }
        other => panic!("expected InvalidToken, got {:?}", other),
    }
}

#[test]
fn test_frontier_excludes_saturated_agents() {
    let instance = sample_instance();
    let mut state = GeneralizedAssignment::initial_state(&instance);
    GeneralizedAssignment::apply(&instance, &mut state, &Move { job: 0, agent: 0 });
    GeneralizedAssignment::apply(&instance, &mut state, &Move { job: 1, agent: 1 });
    // agent 1 has no room left for job 2's consumption of 2
    let frontier = GeneralizedAssignment::frontier(&instance, &state);
    assert_eq!(frontier, vec![Move { job: 2, agent: 0 }]);
}

#[test]
fn test_verify_and_score() {
    let instance = sample_instance();
    let solution = Solution {
        agent_of: vec![1, 0, 0],
    };
    assert!(GeneralizedAssignment::verify(&instance, &solution).is_ok());
    assert_eq!(GeneralizedAssignment::score(&instance, &solution), 5.0);
}

#[test]
fn test_verify_rejects_capacity_overrun() {
    let instance = sample_instance();
    let solution = Solution {
        agent_of: vec![1, 1, 1],
    };
    assert!(matches!(
        GeneralizedAssignment::verify(&instance, &solution),
        Err(Violation::CapacityExceeded { index: 1, .. })
    ));
}

#[test]
fn test_verify_rejects_wrong_job_count() {
    let instance = sample_instance();
    let solution = Solution {
        agent_of: vec![0, 1],
    };
    assert!(matches!(
        GeneralizedAssignment::verify(&instance, &solution),
        Err(Violation::Structural(_))
    ));
}
