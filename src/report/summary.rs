use super::ReportError;
use crate::models::{RecoveryStage, SimulationResult};
use std::fmt;

/// First sample at or below a parachute's deployment altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeploymentEvent {
    pub stage: RecoveryStage,
    pub altitude: f64,          // m
    pub t: f64,                 // s
    pub vertical_velocity: f64, // m/s
}

/// Derived figures of one descent.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSummary {
    /// False when the horizon ran out before ground contact.
    pub landed: bool,
    pub flight_time: f64,             // s
    pub max_altitude: f64,            // m
    pub max_speed: f64,               // m/s
    pub horizontal_displacement: f64, // m
    pub impact_vertical_velocity: f64,
    pub impact_horizontal_velocity: f64,
    pub impact_speed: f64,
    /// atan2(vy, vx) of the final sample, in degrees from the horizontal.
    pub impact_angle: f64,
    pub deployments: Vec<DeploymentEvent>,
}

impl FlightSummary {
    pub fn from_result(result: &SimulationResult) -> Result<Self, ReportError> {
        let last = result.final_sample().ok_or(ReportError::EmptyTrajectory)?;
        let samples = result.samples();

        let max_altitude = result.altitudes().fold(f64::NEG_INFINITY, f64::max);
        let max_speed = samples
            .iter()
            .map(|s| s.state.speed())
            .fold(0.0, f64::max);

        // A stage whose altitude is not below the configured apogee never opens.
        let deployments = RecoveryStage::PARACHUTES
            .into_iter()
            .zip(result.deployment_altitudes())
            .filter(|&(_, altitude)| altitude < result.apogee())
            .filter_map(|(stage, altitude)| {
                samples
                    .iter()
                    .find(|s| s.state.y <= altitude)
                    .map(|s| DeploymentEvent {
                        stage,
                        altitude,
                        t: s.t,
                        vertical_velocity: s.state.y_dot,
                    })
            })
            .collect();

        let vy = last.state.y_dot;
        let vx = last.state.x_dot;

        Ok(Self {
            landed: result.landed(),
            flight_time: last.t,
            max_altitude,
            max_speed,
            horizontal_displacement: last.state.x,
            impact_vertical_velocity: vy,
            impact_horizontal_velocity: vx,
            impact_speed: vy.hypot(vx),
            impact_angle: vy.atan2(vx).to_degrees(),
            deployments,
        })
    }
}

impl fmt::Display for FlightSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.landed {
            writeln!(
                f,
                "WARNING: descent unfinished, horizon reached at {:.2} s without ground contact",
                self.flight_time
            )?;
        }
        writeln!(f, "Flight time:             {:.2} s", self.flight_time)?;
        writeln!(f, "Maximum altitude:        {:.2} m", self.max_altitude)?;
        writeln!(f, "Maximum speed:           {:.2} m/s", self.max_speed)?;
        writeln!(f, "Horizontal displacement: {:.2} m", self.horizontal_displacement)?;

        let label = if self.landed { "Impact" } else { "Final" };
        writeln!(f, "{label} speed:            {:.2} m/s", self.impact_speed)?;
        writeln!(f, "  vertical:              {:.2} m/s", self.impact_vertical_velocity)?;
        writeln!(f, "  horizontal:            {:.2} m/s", self.impact_horizontal_velocity)?;
        writeln!(f, "  angle:                 {:.1} deg from horizontal", self.impact_angle)?;

        if self.deployments.is_empty() {
            write!(f, "No parachute deployments recorded")
        } else {
            write!(f, "Deployments:")?;
            for event in &self.deployments {
                write!(
                    f,
                    "\n  {:<8} {:.2} s (vy = {:.2} m/s)",
                    event.stage.to_string(),
                    event.t,
                    event.vertical_velocity
                )?;
            }
            Ok(())
        }
    }
}
