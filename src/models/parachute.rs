use crate::config::{DragStage, PhysicalConfig};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryStage {
    Body,
    Drogue,
    Reefing,
    Main,
}

impl fmt::Display for RecoveryStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecoveryStage::Body => write!(f, "Rocket Body"),
            RecoveryStage::Drogue => write!(f, "Drogue"),
            RecoveryStage::Reefing => write!(f, "Reefing"),
            RecoveryStage::Main => write!(f, "Main"),
        }
    }
}

impl RecoveryStage {
    pub const PARACHUTES: [RecoveryStage; 3] = [
        RecoveryStage::Drogue,
        RecoveryStage::Reefing,
        RecoveryStage::Main,
    ];

    pub fn drag(&self, config: &PhysicalConfig) -> DragStage {
        match self {
            RecoveryStage::Body => config.body,
            RecoveryStage::Drogue => config.drogue,
            RecoveryStage::Reefing => config.reefing,
            RecoveryStage::Main => config.main,
        }
    }

    /// Altitude at which a parachute opens; the body has none.
    pub fn deployment_altitude(&self, config: &PhysicalConfig) -> Option<f64> {
        match self {
            RecoveryStage::Body => None,
            RecoveryStage::Drogue => Some(config.drogue_altitude),
            RecoveryStage::Reefing => Some(config.reefing_altitude),
            RecoveryStage::Main => Some(config.main_altitude),
        }
    }
}
