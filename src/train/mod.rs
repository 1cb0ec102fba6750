//! Training orchestration
//!
//! This module contains option parsing, the solver interface, cross
//! validation and the per-invocation session that ties them together.

mod cross_validation;
mod options;
mod session;
mod solver;

// Re-export public types
pub use self::cross_validation::accuracy as cross_validation_accuracy;
pub use self::options::{
    ClassWeight, InstanceFormat, Parameter, SolverType, TrainOptions, USAGE,
};
pub use self::session::{Outcome, Session, Stage, DEFAULT_SEED};
pub use self::solver::Solver;
