use crate::config::PhysicalConfig;
use crate::models::State;

/// Kinetic plus potential energy relative to the ground reference [J].
pub fn mechanical_energy(config: &PhysicalConfig, state: &State) -> f64 {
    let kinetic = 0.5 * config.mass * state.speed().powi(2);
    let potential = config.mass * config.gravity * state.y;

    kinetic + potential
}
