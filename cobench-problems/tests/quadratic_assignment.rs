use cobench_problems::parse::ParseError;
use cobench_problems::quadratic_assignment::{QuadraticAssignment, Solution};
use cobench_problems::{ConstructiveProblem, Violation};

const SAMPLE: &str = "\
2
0 3
3 0
0 5
5 0
";

fn sample_instance() -> cobench_problems::quadratic_assignment::Instance {
    QuadraticAssignment::parse_instances(SAMPLE)
        .unwrap()
        .remove(0)
}

#[test]
fn test_parse_sample() {
    let instance = sample_instance();
    assert_eq!(instance.num_facilities, 2);
    assert_eq!(instance.flow[(0, 1)], 3.0);
    assert_eq!(instance.distance[(1, 0)], 5.0);
}

#[test]
fn test_parse_rejects_short_matrix() {
    let text = "2\n0 3\n3 0\n0 5\n";
    assert!(matches!(
        QuadraticAssignment::parse_instances(text),
        Err(ParseError::UnexpectedEnd { .. })
    ));
}

#[test]
fn test_score_couples_flow_and_distance() {
    let instance = sample_instance();
    let solution = Solution {
        location_of: vec![0, 1],
    };
    assert!(QuadraticAssignment::verify(&instance, &solution).is_ok());
    assert_eq!(QuadraticAssignment::score(&instance, &solution), 30.0);
}

#[test]
fn test_verify_rejects_non_permutation() {
    let instance = sample_instance();
    let reused = Solution {
        location_of: vec![0, 0],
    };
    assert!(matches!(
        QuadraticAssignment::verify(&instance, &reused),
        Err(Violation::Duplicate { unit: 0 })
    ));

    let out_of_range = Solution {
        location_of: vec![0, 2],
    };
    assert!(matches!(
        QuadraticAssignment::verify(&instance, &out_of_range),
        Err(Violation::OutOfBounds { unit: 2, .. })
    ));

    let short = Solution {
        location_of: vec![0],
    };
    assert!(matches!(
        QuadraticAssignment::verify(&instance, &short),
        Err(Violation::Structural(_))
    ));
}
