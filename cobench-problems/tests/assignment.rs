use cobench_problems::assignment::{Assignment, Solution};
use cobench_problems::parse::ParseError;
use cobench_problems::{ConstructiveProblem, Violation};

const DENSE: &str = "\
3
1 9 9
9 2 9
9 9 3
";

const SPARSE: &str = "\
3 4
0 0 1
1 1 2
2 2 3
0 1 5
";

#[test]
fn test_parse_dense_matrix() {
    let instance = Assignment::parse_instances(DENSE).unwrap().remove(0);
    assert_eq!(instance.num_agents, 3);
    assert_eq!(instance.costs[(0, 0)], 1.0);
    assert_eq!(instance.costs[(2, 1)], 9.0);
}

#[test]
fn test_parse_dense_rejects_truncated_matrix() {
    let text = "3\n1 2 3\n4 5\n";
    assert!(matches!(
        Assignment::parse_instances(text),
        Err(ParseError::UnexpectedEnd { .. })
    ));
}

#[test]
fn test_parse_sparse_defaults_dominate_each_row() {
    let instance = Assignment::parse_instances(SPARSE).unwrap().remove(0);
    assert_eq!(instance.costs[(0, 0)], 1.0);
    assert_eq!(instance.costs[(0, 1)], 5.0);
    // unlisted pairs get 1000x the row maximum
    assert_eq!(instance.costs[(0, 2)], 5000.0);
    assert_eq!(instance.costs[(1, 0)], 2000.0);
    assert_eq!(instance.costs[(2, 1)], 3000.0);
}

#[test]
fn test_parse_sparse_rejects_duplicate_entry() {
    let text = "2 2\n0 0 1\n0 0 2\n";
    assert!(matches!(
        Assignment::parse_instances(text),
        Err(ParseError::Malformed { line: 3, .. })
    ));
}

#[test]
fn test_parse_sparse_rejects_out_of_range_entry() {
    let text = "2 1\n2 0 1\n";
    assert!(matches!(
        Assignment::parse_instances(text),
        Err(ParseError::Malformed { line: 2, .. })
    ));
}

#[test]
fn test_verify_and_score_diagonal_assignment() {
    let instance = Assignment::parse_instances(DENSE).unwrap().remove(0);
    let solution = Solution {
        pairs: vec![(0, 0), (1, 1), (2, 2)],
    };
    assert!(Assignment::verify(&instance, &solution).is_ok());
    assert_eq!(Assignment::score(&instance, &solution), 6.0);
}

#[test]
fn test_verify_rejects_reused_task() {
    let instance = Assignment::parse_instances(DENSE).unwrap().remove(0);
    let solution = Solution {
        pairs: vec![(0, 0), (1, 0), (2, 2)],
    };
    assert!(matches!(
        Assignment::verify(&instance, &solution),
        Err(Violation::Duplicate { unit: 0 })
    ));
}

#[test]
fn test_verify_rejects_incomplete_assignment() {
    let instance = Assignment::parse_instances(DENSE).unwrap().remove(0);
    let solution = Solution {
        pairs: vec![(0, 0), (2, 2)],
    };
    assert!(matches!(
        Assignment::verify(&instance, &solution),
        Err(Violation::Missing { unit: 1 })
    ));
}
