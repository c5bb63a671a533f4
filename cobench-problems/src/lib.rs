pub mod parse;

pub mod assignment;
pub mod bin_packing;
pub mod candidates;
pub mod equitable_partition;
pub mod facility_location;
pub mod generalized_assignment;
pub mod job_shop;
pub mod quadratic_assignment;
pub mod set_covering;
pub mod vehicle_routing;
pub mod vrptw;

pub use parse::ParseError;

use thiserror::Error;

/// A hard-constraint violation found by a post-hoc verifier. Verifiers
/// re-derive every constraint from the instance and the finished solution,
/// trusting none of the simulator's bookkeeping.
#[derive(Debug, Error)]
pub enum Violation {
    #[error("unit {unit} is missing from the solution")]
    Missing { unit: usize },
    #[error("unit {unit} appears more than once")]
    Duplicate { unit: usize },
    #[error("unit {unit} is out of bounds (instance has {len})")]
    OutOfBounds { unit: usize, len: usize },
    #[error("{scope} {index}: load {load} exceeds capacity {capacity}")]
    CapacityExceeded {
        scope: &'static str,
        index: usize,
        load: i64,
        capacity: i64,
    },
    #[error("unit {unit}: service at {arrival:.1} is after latest allowed {latest:.1}")]
    TimeWindow {
        unit: usize,
        arrival: f64,
        latest: f64,
    },
    #[error("{0}")]
    Ordering(String),
    #[error("{0}")]
    Structural(String),
}

/// One constructive problem family: instance parsing, the step-by-step
/// construction contract, independent verification, and scoring.
///
/// The construction side is a frontier/apply loop: `frontier` returns every
/// move that keeps the partial state feasible, the candidate picks one, and
/// `apply` advances the state. The simulator driving the loop lives in
/// `cobench-harness`; it never applies a move the frontier did not offer.
pub trait ConstructiveProblem {
    type Instance: Send + Sync + 'static;
    type State: Send;
    type Move: Clone + PartialEq + std::fmt::Debug + Send;
    type Solution: Send + 'static;

    const NAME: &'static str;

    /// Parse every instance in one benchmark file.
    fn parse_instances(text: &str) -> Result<Vec<Self::Instance>, ParseError>;

    /// Name embedded in the instance data, if the format carries one.
    fn instance_label(_instance: &Self::Instance) -> Option<String> {
        None
    }

    fn initial_state(instance: &Self::Instance) -> Self::State;

    fn is_complete(instance: &Self::Instance, state: &Self::State) -> bool;

    /// Every move that is feasible from `state`. Empty while incomplete
    /// means construction is stalled.
    fn frontier(instance: &Self::Instance, state: &Self::State) -> Vec<Self::Move>;

    /// Apply a move previously returned by `frontier` on this exact state.
    fn apply(instance: &Self::Instance, state: &mut Self::State, mv: &Self::Move);

    fn into_solution(instance: &Self::Instance, state: Self::State) -> Self::Solution;

    /// Re-check every hard constraint of the family, returning the first
    /// violation found.
    fn verify(instance: &Self::Instance, solution: &Self::Solution) -> Result<(), Violation>;

    /// Domain objective of a verified solution. Lower is better for every
    /// family in this crate.
    fn score(instance: &Self::Instance, solution: &Self::Solution) -> f64;
}

/// Everything a candidate is shown at one decision point.
pub struct StepView<'a, P: ConstructiveProblem + ?Sized> {
    pub instance: &'a P::Instance,
    pub state: &'a P::State,
    pub frontier: &'a [P::Move],
}

/// The externally supplied decision function under evaluation. The harness
/// treats implementations as opaque: only the returned move is inspected,
/// and a move outside the offered frontier stalls the construction rather
/// than being forced.
pub trait Candidate<P: ConstructiveProblem> {
    /// Pick the next move, or `None` if the candidate has no answer.
    fn decide(&mut self, view: &StepView<'_, P>) -> Option<P::Move>;
}

impl<P, F> Candidate<P> for F
where
    P: ConstructiveProblem,
    F: FnMut(&StepView<'_, P>) -> Option<P::Move>,
{
    fn decide(&mut self, view: &StepView<'_, P>) -> Option<P::Move> {
        self(view)
    }
}
