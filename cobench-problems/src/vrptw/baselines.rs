use super::{Move, Vrptw};
use crate::{Candidate, StepView};

/// Time-oriented nearest neighbour: visit the feasible customer that can be
/// served earliest from the current position, and fall back to starting a
/// fresh vehicle when the frontier offers no visit.
pub struct NearestFeasible;

impl Candidate<Vrptw> for NearestFeasible {
    fn decide(&mut self, view: &StepView<'_, Vrptw>) -> Option<Move> {
        let instance = view.instance;
        let state = view.state;
        view.frontier
            .iter()
            .filter_map(|mv| match *mv {
                Move::Visit(node) => {
                    let arrival = (state.time
                        + instance.distance_matrix[state.current_node][node])
                        .max(instance.ready_times[node]);
                    Some((arrival, Move::Visit(node)))
                }
                Move::CloseRoute => None,
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, mv)| mv)
            .or_else(|| {
                view.frontier
                    .contains(&Move::CloseRoute)
                    .then_some(Move::CloseRoute)
            })
    }
}
