use cobench_problems::parse::ParseError;
use cobench_problems::vehicle_routing::{Instance, Solution, VehicleRouting};
use cobench_problems::{ConstructiveProblem, Violation};

const SAMPLE: &str = "\
1
4 10
0 0 0
0 3 4
4 0 4
0 -3 4
";

fn sample_instance() -> Instance {
    VehicleRouting::parse_instances(SAMPLE).unwrap().remove(0)
}

#[test]
fn test_parse_sample() {
    let instance = sample_instance();
    assert_eq!(instance.num_nodes, 4);
    assert_eq!(instance.capacity, 10);
    assert_eq!(instance.demands, vec![0, 4, 4, 4]);
    // 3-4-5 triangle between customers 1 and 2
    assert_eq!(instance.distance_matrix[0][1], 3.0);
    assert_eq!(instance.distance_matrix[1][2], 5.0);
}

#[test]
fn test_parse_rejects_nonzero_depot_demand() {
    let text = "1\n2 10\n0 0 5\n1 1 3\n";
    assert!(matches!(
        VehicleRouting::parse_instances(text),
        Err(ParseError::Malformed { .. })
    ));
}

#[test]
fn test_verify_accepts_capacity_respecting_routes() {
    let instance = sample_instance();
    let solution = Solution {
        routes: vec![vec![1, 2], vec![3]],
    };
    assert!(VehicleRouting::verify(&instance, &solution).is_ok());
    assert_eq!(VehicleRouting::score(&instance, &solution), 18.0);
}

#[test]
fn test_verify_rejects_overloaded_route() {
    let instance = sample_instance();
    let solution = Solution {
        routes: vec![vec![1, 2, 3]],
    };
    assert!(matches!(
        VehicleRouting::verify(&instance, &solution),
        Err(Violation::CapacityExceeded { load: 12, .. })
    ));
}

#[test]
fn test_verify_rejects_omitted_customer() {
    let instance = sample_instance();
    let solution = Solution {
        routes: vec![vec![1, 2]],
    };
    assert!(matches!(
        VehicleRouting::verify(&instance, &solution),
        Err(Violation::Missing { unit: 3 })
    ));
}

#[test]
fn test_score_singleton_routes() {
    let instance = sample_instance();
    let solution = Solution {
        routes: vec![vec![1], vec![2], vec![3]],
    };
    assert!(VehicleRouting::verify(&instance, &solution).is_ok());
    assert_eq!(VehicleRouting::score(&instance, &solution), 20.0);
}
