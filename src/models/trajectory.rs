use super::state::State;
use crate::integrators::IntegrationStats;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub t: f64,
    pub state: State,
}

/// Why the integration stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Termination {
    /// The ground-contact event fired at `t`.
    GroundContact { t: f64 },
    /// The horizon ran out with the body still in the air.
    HorizonReached { t: f64 },
}

impl Termination {
    pub fn time(&self) -> f64 {
        match *self {
            Termination::GroundContact { t } | Termination::HorizonReached { t } => t,
        }
    }
}

/// Time history of one descent. Read-only once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    samples: Vec<Sample>,
    termination: Termination,
    apogee: f64,
    deployment_altitudes: [f64; 3],
    stats: IntegrationStats,
}

impl SimulationResult {
    pub(crate) fn new(
        samples: Vec<Sample>,
        termination: Termination,
        apogee: f64,
        deployment_altitudes: [f64; 3],
        stats: IntegrationStats,
    ) -> Self {
        Self {
            samples,
            termination,
            apogee,
            deployment_altitudes,
            stats,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// True when the descent ended on the ground rather than at the horizon.
    pub fn landed(&self) -> bool {
        matches!(self.termination, Termination::GroundContact { .. })
    }

    pub fn final_time(&self) -> f64 {
        self.termination.time()
    }

    pub fn final_sample(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn apogee(&self) -> f64 {
        self.apogee
    }

    /// (drogue, reefing, main) deployment altitudes for annotation.
    pub fn deployment_altitudes(&self) -> [f64; 3] {
        self.deployment_altitudes
    }

    pub fn stats(&self) -> &IntegrationStats {
        &self.stats
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.t)
    }

    pub fn altitudes(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.state.y)
    }

    pub fn vertical_velocities(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.state.y_dot)
    }

    pub fn horizontal_positions(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.state.x)
    }

    pub fn horizontal_velocities(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.state.x_dot)
    }
}
