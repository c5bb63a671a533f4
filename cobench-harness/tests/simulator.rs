use cobench_harness::{construct, ConstructionFailure};
use cobench_problems::bin_packing::{self, BinPacking};
use cobench_problems::candidates::FirstFeasible;
use cobench_problems::vehicle_routing::{self, VehicleRouting};
use cobench_problems::{ConstructiveProblem, StepView};

fn packing_instance() -> bin_packing::Instance {
    bin_packing::Instance {
        id: "t1".to_string(),
        capacity: 10,
        sizes: vec![6, 5, 4, 3],
        best_known_bins: 2,
    }
}

#[test]
fn test_first_feasible_candidate_always_completes() {
    let instance = packing_instance();
    let solution = construct::<BinPacking, _>(&instance, &mut FirstFeasible).unwrap();
    assert!(BinPacking::verify(&instance, &solution).is_ok());
    assert_eq!(solution.bins, vec![vec![0, 2], vec![1, 3]]);
}

#[test]
fn test_capacity_is_respected_at_every_step() {
    let instance = packing_instance();
    let mut candidate = |view: &StepView<'_, BinPacking>| {
        assert!(view.state.remaining >= 0);
        view.frontier.first().cloned()
    };
    let solution = construct::<BinPacking, _>(&instance, &mut candidate).unwrap();
    assert!(BinPacking::verify(&instance, &solution).is_ok());
}

#[test]
fn test_unservable_unit_stalls_construction() {
    // customer 1 demands more than any vehicle can carry
    let instance = vehicle_routing::Instance {
        num_nodes: 2,
        capacity: 10,
        demands: vec![0, 20],
        distance_matrix: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
    };
    let result = construct::<VehicleRouting, _>(&instance, &mut FirstFeasible);
    assert!(matches!(
        result,
        Err(ConstructionFailure::Stalled { step: 0, .. })
    ));
}

#[test]
fn test_out_of_frontier_move_is_a_stall_not_a_crash() {
    let instance = packing_instance();
    let mut stubborn =
        |_view: &StepView<'_, BinPacking>| Some(bin_packing::Move::Place(0));
    let result = construct::<BinPacking, _>(&instance, &mut stubborn);
    match result {
        Err(ConstructionFailure::Stalled { step, reason }) => {
            assert_eq!(step, 1);
            assert!(reason.contains("outside the feasible frontier"));
        }
        other => panic!("expected Stalled, got {:?}", other),
    }
}

#[test]
fn test_giving_up_is_reported_as_no_decision() {
    let instance = packing_instance();
    let mut quitter = |_view: &StepView<'_, BinPacking>| None;
    let result = construct::<BinPacking, _>(&instance, &mut quitter);
    assert!(matches!(
        result,
        Err(ConstructionFailure::NoDecision { step: 0 })
    ));
}
