use cobench_problems::parse::ParseError;
use cobench_problems::set_covering::{Move, SetCovering, Solution};
use cobench_problems::{ConstructiveProblem, Violation};

const SAMPLE: &str = "\
3 4
2 3 4 1
2 1 2
2 2 3
1 4
";

fn sample_instance() -> cobench_problems::set_covering::Instance {
    SetCovering::parse_instances(SAMPLE).unwrap().remove(0)
}

#[test]
fn test_parse_converts_columns_to_zero_based() {
    let instance = sample_instance();
    assert_eq!(instance.num_rows, 3);
    assert_eq!(instance.num_cols, 4);
    assert_eq!(instance.costs, vec![2.0, 3.0, 4.0, 1.0]);
    assert_eq!(instance.rows_of[0], vec![0]);
    assert_eq!(instance.rows_of[1], vec![0, 1]);
    assert_eq!(instance.rows_of[2], vec![1]);
    assert_eq!(instance.rows_of[3], vec![2]);
}

#[test]
fn test_parse_rejects_column_index_out_of_range() {
    let text = "1 2\n1 1\n1 5\n";
    assert!(matches!(
        SetCovering::parse_instances(text),
        Err(ParseError::Malformed { line: 3, .. })
    ));
}

#[test]
fn test_frontier_skips_columns_covering_nothing_new() {
    let instance = sample_instance();
    let mut state = SetCovering::initial_state(&instance);
    SetCovering::apply(&instance, &mut state, &Move { column: 1 });
    // rows 0 and 1 are covered; column 0 and column 2 add nothing
    let frontier = SetCovering::frontier(&instance, &state);
    assert_eq!(frontier, vec![Move { column: 3 }]);
}

#[test]
fn test_verify_and_score() {
    let instance = sample_instance();
    let solution = Solution {
        columns: vec![1, 3],
    };
    assert!(SetCovering::verify(&instance, &solution).is_ok());
    assert_eq!(SetCovering::score(&instance, &solution), 4.0);
}

#[test]
fn test_verify_rejects_uncovered_row() {
    let instance = sample_instance();
    let solution = Solution {
        columns: vec![0, 3],
    };
    assert!(matches!(
        SetCovering::verify(&instance, &solution),
        Err(Violation::Missing { unit: 1 })
    ));
}
