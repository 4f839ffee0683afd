pub mod parachute;
pub mod state;
pub mod trajectory;

pub use parachute::RecoveryStage;
pub use state::{State, StateVector};
pub use trajectory::{Sample, SimulationResult, Termination};
