pub mod events;
pub mod integration_errors;
pub mod rk4;
pub mod rosenbrock;
pub mod trajectory;

pub use events::{EventDirection, EventFunction, EventRecord, EventSpec, GroundContact};
pub use integration_errors::IntegrationError;
pub use rosenbrock::{DenseStep, Rosenbrock23, Solution};
pub use trajectory::TrajectoryIntegrator;

/// Work counters of one integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegrationStats {
    pub accepted: usize,
    pub rejected: usize,
    pub rhs_evaluations: usize,
    pub jacobians: usize,
}

/// Where samples are recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputGrid {
    /// Every `t0 + k·dt` reached, interpolated from the step that spans it.
    Uniform(f64),
    /// The end of every accepted step.
    Native,
}

impl From<Option<f64>> for OutputGrid {
    fn from(step: Option<f64>) -> Self {
        match step {
            Some(dt) => OutputGrid::Uniform(dt),
            None => OutputGrid::Native,
        }
    }
}
