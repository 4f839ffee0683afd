use super::drag::DragModel;
use crate::config::PhysicalConfig;
use crate::models::State;

pub trait EquationsOfMotion {
    type State;

    fn compute_derivative(&self, state: &Self::State) -> Self::State;
}

/// Planar point-mass descent under uniform gravity and staged drag.
pub struct DescentDynamics<'a> {
    mass: f64,
    gravity: f64,
    drag: DragModel<'a>,
}

impl<'a> DescentDynamics<'a> {
    pub fn new(config: &'a PhysicalConfig) -> Self {
        Self {
            mass: config.mass,
            gravity: config.gravity,
            drag: DragModel::new(config),
        }
    }

    pub fn drag(&self) -> &DragModel<'a> {
        &self.drag
    }
}

impl EquationsOfMotion for DescentDynamics<'_> {
    type State = State;

    fn compute_derivative(&self, state: &State) -> State {
        let force = self.drag.drag_force(state);

        State {
            y: state.y_dot,
            y_dot: -self.gravity + force.y / self.mass,
            x: state.x_dot,
            x_dot: force.x / self.mass,
        }
    }
}
