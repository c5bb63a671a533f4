use cobench_problems::bin_packing::{BinPacking, Solution};
use cobench_problems::parse::ParseError;
use cobench_problems::{ConstructiveProblem, Violation};

const SAMPLE: &str = "\
2
u10_a
10 4 2
6 5 4 3
u10_b
100 3 1
30 30 40
";

fn sample_instance() -> cobench_problems::bin_packing::Instance {
    BinPacking::parse_instances(SAMPLE).unwrap().remove(0)
}

#[test]
fn test_parse_sample() {
    let instances = BinPacking::parse_instances(SAMPLE).unwrap();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].id, "u10_a");
    assert_eq!(instances[0].capacity, 10);
    assert_eq!(instances[0].sizes, vec![6, 5, 4, 3]);
    assert_eq!(instances[0].best_known_bins, 2);
    assert_eq!(instances[1].id, "u10_b");
    assert_eq!(instances[1].sizes, vec![30, 30, 40]);
}

#[test]
fn test_parse_rejects_non_numeric_size() {
    let text = "1\ncase\n10 2 1\n6 x\n";
    match BinPacking::parse_instances(text) {
        Err(ParseError::InvalidToken { line, token, .. }) => {
            assert_eq!(line, 4);
            assert_eq!(token, "x");
        }
        other => panic!("expected InvalidToken, got {:?}", other),
    }
}

#[test]
fn test_parse_rejects_case_count_mismatch() {
    // two cases declared, one supplied
    let text = "2\ncase\n10 1 1\n6\n";
    assert!(matches!(
        BinPacking::parse_instances(text),
        Err(ParseError::UnexpectedEnd { .. })
    ));

    // one case declared, trailing data after it
    let text = "1\ncase\n10 1 1\n6\n7\n";
    assert!(matches!(
        BinPacking::parse_instances(text),
        Err(ParseError::InvalidToken { line: 5, .. })
    ));
}

#[test]
fn test_verify_accepts_balanced_packing() {
    let instance = sample_instance();
    let solution = Solution {
        bins: vec![vec![0, 3], vec![1, 2]],
    };
    assert!(BinPacking::verify(&instance, &solution).is_ok());
    assert_eq!(BinPacking::score(&instance, &solution), 2.0);
}

#[test]
fn test_verify_rejects_overfull_bin() {
    let instance = sample_instance();
    let solution = Solution {
        bins: vec![vec![0, 1], vec![2, 3]],
    };
    assert!(matches!(
        BinPacking::verify(&instance, &solution),
        Err(Violation::CapacityExceeded { load: 11, .. })
    ));
}

#[test]
fn test_verify_rejects_missing_and_duplicate_items() {
    let instance = sample_instance();
    let missing = Solution {
        bins: vec![vec![0, 3], vec![1]],
    };
    assert!(matches!(
        BinPacking::verify(&instance, &missing),
        Err(Violation::Missing { unit: 2 })
    ));

    let duplicated = Solution {
        bins: vec![vec![0, 3], vec![1, 2], vec![3]],
    };
    assert!(matches!(
        BinPacking::verify(&instance, &duplicated),
        Err(Violation::Duplicate { unit: 3 })
    ));
}
