pub mod atmosphere;
pub mod drag;
pub mod dynamics;
pub mod energy;

pub use atmosphere::{AirConditions, AtmosphereModel, AtmosphericLayer};
pub use drag::DragModel;
pub use dynamics::{DescentDynamics, EquationsOfMotion};
