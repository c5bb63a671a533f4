pub mod dataset;
pub mod guard;
pub mod normalize;
pub mod outcome;
pub mod runner;
pub mod simulator;

pub use dataset::{load_dataset, BenchmarkInstance};
pub use guard::{guarded_call, GuardOutcome};
pub use normalize::{normalize, ReferenceTable, Sense};
pub use outcome::{EvaluationOutcome, InstanceReport, Summary};
pub use runner::{run, RunConfig};
pub use simulator::{construct, ConstructionFailure};
