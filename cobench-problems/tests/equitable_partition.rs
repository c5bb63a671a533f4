use cobench_problems::equitable_partition::{EquitablePartition, Solution};
use cobench_problems::parse::ParseError;
use cobench_problems::{ConstructiveProblem, Violation};

const SAMPLE: &str = "\
1
4 2
3 1 2 2
";

fn sample_instance() -> cobench_problems::equitable_partition::Instance {
    EquitablePartition::parse_instances(SAMPLE).unwrap().remove(0)
}

#[test]
fn test_parse_sample() {
    let instance = sample_instance();
    assert_eq!(instance.num_items, 4);
    assert_eq!(instance.num_groups, 2);
    assert_eq!(instance.weights, vec![3, 1, 2, 2]);
    assert_eq!(instance.target_load(), 4.0);
}

#[test]
fn test_parse_rejects_weight_count_mismatch() {
    // four weights declared, three supplied
    let text = "1\n4 2\n3 1 2\n";
    assert!(matches!(
        EquitablePartition::parse_instances(text),
        Err(ParseError::UnexpectedEnd { .. })
    ));
}

#[test]
fn test_score_measures_total_imbalance() {
    let instance = sample_instance();
    let balanced = Solution {
        group_of: vec![0, 0, 1, 1],
    };
    assert!(EquitablePartition::verify(&instance, &balanced).is_ok());
    assert_eq!(EquitablePartition::score(&instance, &balanced), 0.0);

    let lopsided = Solution {
        group_of: vec![0, 0, 0, 0],
    };
    assert!(EquitablePartition::verify(&instance, &lopsided).is_ok());
    assert_eq!(EquitablePartition::score(&instance, &lopsided), 8.0);
}

#[test]
fn test_verify_rejects_unknown_group() {
    let instance = sample_instance();
    let solution = Solution {
        group_of: vec![0, 1, 2, 0],
    };
    assert!(matches!(
        EquitablePartition::verify(&instance, &solution),
        Err(Violation::OutOfBounds { unit: 2, .. })
    ));
}

#[test]
fn test_verify_rejects_wrong_item_count() {
    let instance = sample_instance();
    let solution = Solution {
        group_of: vec![0, 1],
    };
    assert!(matches!(
        EquitablePartition::verify(&instance, &solution),
        Err(Violation::Structural(_))
    ));
}
