//! Capacitated facility location: assign every customer to a facility with
//! enough spare capacity. A facility's fixed cost is paid once it serves
//! anyone; the objective adds fixed and service costs.

use crate::parse::{ParseError, TokenReader};
use crate::{ConstructiveProblem, Violation};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Instance {
    pub num_facilities: usize,
    pub num_customers: usize,
    pub capacities: Vec<i64>,
    pub open_costs: Vec<f64>,
    pub demands: Vec<i64>,
    /// facilities x customers
    pub service_costs: Array2<f64>,
}

/// `facility_of[c]` serves customer `c`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Solution {
    pub facility_of: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub customer: usize,
    pub facility: usize,
}

#[derive(Debug)]
pub struct State {
    pub next_customer: usize,
    pub remaining: Vec<i64>,
    pub facility_of: Vec<usize>,
}

pub struct FacilityLocation;

impl ConstructiveProblem for FacilityLocation {
    type Instance = Instance;
    type State = State;
    type Move = Move;
    type Solution = Solution;

    const NAME: &'static str = "facility_location";

    fn parse_instances(text: &str) -> Result<Vec<Instance>, ParseError> {
        let mut reader = TokenReader::new(text);
        let num_facilities = reader.usize_field("facility count")?;
        let num_customers = reader.usize_field("customer count")?;
        if num_facilities == 0 {
            return Err(ParseError::malformed(
                reader.line(),
                "facility count must be positive",
            ));
        }
        let mut capacities = Vec::with_capacity(num_facilities);
        let mut open_costs = Vec::with_capacity(num_facilities);
        for _ in 0..num_facilities {
            capacities.push(reader.i64_field("facility capacity")?);
            open_costs.push(reader.f64_field("facility opening cost")?);
        }
        let mut demands = Vec::with_capacity(num_customers);
        let mut service_costs = vec![0.0; num_facilities * num_customers];
        for customer in 0..num_customers {
            let demand = reader.i64_field("customer demand")?;
            if demand < 0 {
                return Err(ParseError::malformed(
                    reader.line(),
                    "customer demands must be non-negative",
                ));
            }
            demands.push(demand);
            for facility in 0..num_facilities {
                service_costs[facility * num_customers + customer] =
                    reader.f64_field("service cost")?;
            }
        }
        reader.finish()?;
        Ok(vec![Instance {
            num_facilities,
            num_customers,
            capacities,
            open_costs,
            demands,
            service_costs: Array2::from_shape_vec(
                (num_facilities, num_customers),
                service_costs,
            )
            .map_err(|_| {
                ParseError::malformed(reader.line(), "service cost matrix shape mismatch")
            })?,
        }])
    }

    fn initial_state(instance: &Instance) -> State {
        State {
            next_customer: 0,
            remaining: instance.capacities.clone(),
            facility_of: Vec::with_capacity(instance.num_customers),
        }
    }

    fn is_complete(instance: &Instance, state: &State) -> bool {
        state.next_customer == instance.num_customers
    }

    fn frontier(instance: &Instance, state: &State) -> Vec<Move> {
        let customer = state.next_customer;
        (0..instance.num_facilities)
            .filter(|&facility| instance.demands[customer] <= state.remaining[facility])
            .map(|facility| Move { customer, facility })
            .collect()
    }

    fn apply(instance: &Instance, state: &mut State, mv: &Move) {
        state.remaining[mv.facility] -= instance.demands[mv.customer];
        state.facility_of.push(mv.facility);
        state.next_customer += 1;
    }

    fn into_solution(_instance: &Instance, state: State) -> Solution {
        Solution {
            facility_of: state.facility_of,
        }
    }

    fn verify(instance: &Instance, solution: &Solution) -> Result<(), Violation> {
        if solution.facility_of.len() != instance.num_customers {
            return Err(Violation::Structural(format!(
                "solution serves {} customers, instance has {}",
                solution.facility_of.len(),
                instance.num_customers
            )));
        }
        let mut loads = vec![0i64; instance.num_facilities];
        for (customer, &facility) in solution.facility_of.iter().enumerate() {
            if facility >= instance.num_facilities {
                return Err(Violation::OutOfBounds {
                    unit: facility,
                    len: instance.num_facilities,
                });
            }
            loads[facility] += instance.demands[customer];
            if loads[facility] > instance.capacities[facility] {
                return Err(Violation::CapacityExceeded {
                    scope: "facility",
                    index: facility,
                    load: loads[facility],
                    capacity: instance.capacities[facility],
                });
            }
        }
        Ok(())
    }

    fn score(instance: &Instance, solution: &Solution) -> f64 {
        let mut used = vec![false; instance.num_facilities];
        let mut total = 0.0;
        for (customer, &facility) in solution.facility_of.iter().enumerate() {
            total += instance.service_costs[(facility, customer)];
            used[facility] = true;
        }
        for (facility, &u) in used.iter().enumerate() {
            if u {
                total += instance.open_costs[facility];
            }
        }
        total
    }
}

pub mod baselines {
    use super::{FacilityLocation, Move};
    use crate::{Candidate, StepView};

    /// Picks the facility with the lowest marginal cost for the customer,
    /// counting the opening cost for facilities not yet serving anyone.
    pub struct CheapestService;

    impl Candidate<FacilityLocation> for CheapestService {
        fn decide(&mut self, view: &StepView<'_, FacilityLocation>) -> Option<Move> {
            let instance = view.instance;
            let used: Vec<bool> = {
                let mut used = vec![false; instance.num_facilities];
                for &facility in &view.state.facility_of {
                    used[facility] = true;
                }
                used
            };
            view.frontier
                .iter()
                .min_by(|a, b| {
                    let marginal = |mv: &Move| {
                        instance.service_costs[(mv.facility, mv.customer)]
                            + if used[mv.facility] {
                                0.0
                            } else {
                                instance.open_costs[mv.facility]
                            }
                    };
                    marginal(a).total_cmp(&marginal(b))
                })
                .copied()
        }
    }
}
