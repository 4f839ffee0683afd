pub mod config;
pub mod constants;
pub mod errors;
pub mod integrators;
pub mod models;
pub mod numerics;
pub mod physics;
pub mod report;
pub mod sweep;

pub use config::{PhysicalConfig, SolverSettings};
pub use errors::SimulationError;
pub use integrators::TrajectoryIntegrator;
pub use models::{SimulationResult, State, Termination};

/// Validates both inputs and runs one descent from apogee.
pub fn run(
    config: &PhysicalConfig,
    settings: &SolverSettings,
) -> Result<SimulationResult, SimulationError> {
    Ok(TrajectoryIntegrator::new(config, settings)?.run()?)
}
