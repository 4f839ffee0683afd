use super::atmosphere::AtmosphereModel;
use crate::config::PhysicalConfig;
use crate::models::{RecoveryStage, State};
use nalgebra as na;

/// Altitude condition under which a stage contributes drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    Always,
    Never,
    Above(f64),
    AtOrBelow(f64),
}

impl Gate {
    pub fn admits(&self, y: f64) -> bool {
        match *self {
            Gate::Always => true,
            Gate::Never => false,
            Gate::Above(threshold) => y > threshold,
            Gate::AtOrBelow(threshold) => y <= threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageRule {
    pub stage: RecoveryStage,
    pub cda: f64, // m²
    pub gate: Gate,
}

/// Quadratic drag of the body plus whichever parachutes are open.
///
/// Stages accumulate: the body flies alone until the drogue opens, after
/// which drogue, reefing and main each add their cd·A on top of the ones
/// already open. Selection is evaluated from `y` on every call, so there is
/// no deployment state to carry between evaluations.
///
/// A parachute is armed only when its deployment altitude lies below the
/// apogee. A disarmed drogue leaves the body drag in place for the whole
/// descent.
#[derive(Debug, Clone, Copy)]
pub struct DragModel<'a> {
    atmosphere: AtmosphereModel<'a>,
    rules: [StageRule; 4],
    wind: na::Vector2<f64>,
}

impl<'a> DragModel<'a> {
    pub fn new(config: &'a PhysicalConfig) -> Self {
        let armed = |altitude: f64| altitude < config.apogee;
        let opens_at = |altitude: f64| {
            if armed(altitude) {
                Gate::AtOrBelow(altitude)
            } else {
                Gate::Never
            }
        };
        let body_gate = if armed(config.drogue_altitude) {
            Gate::Above(config.drogue_altitude)
        } else {
            Gate::Always
        };
        let rule = |stage: RecoveryStage, gate: Gate| StageRule {
            stage,
            cda: stage.drag(config).cda(),
            gate,
        };

        Self {
            atmosphere: AtmosphereModel::new(config),
            rules: [
                rule(RecoveryStage::Body, body_gate),
                rule(RecoveryStage::Drogue, opens_at(config.drogue_altitude)),
                rule(RecoveryStage::Reefing, opens_at(config.reefing_altitude)),
                rule(RecoveryStage::Main, opens_at(config.main_altitude)),
            ],
            wind: na::Vector2::new(config.wind_horizontal, config.wind_vertical),
        }
    }

    pub fn atmosphere(&self) -> &AtmosphereModel<'a> {
        &self.atmosphere
    }

    pub fn active_stages(&self, y: f64) -> impl Iterator<Item = RecoveryStage> + '_ {
        self.rules
            .iter()
            .filter(move |rule| rule.gate.admits(y))
            .map(|rule| rule.stage)
    }

    /// Combined cd·A of every stage admitted at `y`.
    pub fn effective_cda(&self, y: f64) -> f64 {
        self.rules
            .iter()
            .filter(|rule| rule.gate.admits(y))
            .fold(0.0, |k, rule| k + rule.cda)
    }

    /// Velocity of the body relative to the air mass, as (ẋ, ẏ).
    pub fn relative_velocity(&self, state: &State) -> na::Vector2<f64> {
        state.velocity() - self.wind
    }

    /// Drag force (Fx, Fy) opposing the air-relative velocity.
    pub fn drag_force(&self, state: &State) -> na::Vector2<f64> {
        let k = self.effective_cda(state.y);
        let rho = self.atmosphere.density(state.y);
        let v_rel = self.relative_velocity(state);

        v_rel * (-0.5 * rho * k * v_rel.magnitude())
    }
}
