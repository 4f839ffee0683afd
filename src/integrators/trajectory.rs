use super::events::GroundContact;
use super::rosenbrock::Rosenbrock23;
use super::IntegrationError;
use crate::config::{ConfigError, PhysicalConfig, SolverSettings};
use crate::models::{Sample, SimulationResult, State, Termination};
use crate::physics::DescentDynamics;
use tracing::{info, warn};

/// Drives the descent from a starting state to ground contact or the horizon.
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryIntegrator<'a> {
    config: &'a PhysicalConfig,
    settings: &'a SolverSettings,
}

impl<'a> TrajectoryIntegrator<'a> {
    pub fn new(
        config: &'a PhysicalConfig,
        settings: &'a SolverSettings,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        settings.validate()?;
        Ok(Self { config, settings })
    }

    pub fn config(&self) -> &PhysicalConfig {
        self.config
    }

    pub fn settings(&self) -> &SolverSettings {
        self.settings
    }

    /// Descent from rest at apogee, starting at t = 0.
    pub fn run(&self) -> Result<SimulationResult, IntegrationError> {
        self.run_from(State::at_apogee(self.config.apogee))
    }

    pub fn run_from(&self, initial: State) -> Result<SimulationResult, IntegrationError> {
        info!(
            y0 = initial.y,
            max_time = self.settings.max_time,
            rtol = self.settings.rtol,
            atol = self.settings.atol,
            "starting descent"
        );

        let mut solver = Rosenbrock23::new(DescentDynamics::new(self.config), self.settings);
        let solution = solver.solve(
            0.0,
            initial,
            self.settings.max_time,
            &GroundContact,
            GroundContact::SPEC,
            self.settings.output_step.into(),
        )?;

        let t_final = solution.final_time();
        let termination = if solution.terminated_by_event {
            Termination::GroundContact { t: t_final }
        } else {
            let altitude = solution.samples.last().map_or(f64::NAN, |(_, s)| s.y);
            warn!(
                t = t_final,
                altitude, "horizon reached before ground contact"
            );
            Termination::HorizonReached { t: t_final }
        };

        let stats = solution.stats;
        info!(
            ?termination,
            samples = solution.samples.len(),
            accepted = stats.accepted,
            rejected = stats.rejected,
            rhs_evaluations = stats.rhs_evaluations,
            "descent finished"
        );

        let samples = solution
            .samples
            .into_iter()
            .map(|(t, state)| Sample { t, state })
            .collect();

        Ok(SimulationResult::new(
            samples,
            termination,
            self.config.apogee,
            self.config.deployment_altitudes(),
            stats,
        ))
    }
}
