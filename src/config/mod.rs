pub mod config_errors;
pub mod physical;
pub mod solver;

pub use config_errors::ConfigError;
pub use physical::{AtmosphereConstants, DragStage, PhysicalConfig};
pub use solver::SolverSettings;
