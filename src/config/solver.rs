use super::config_errors::{positive, ConfigError};
use crate::constants::{ABSOLUTE_TOLERANCE, MAX_SIMULATION_TIME, OUTPUT_STEP, RELATIVE_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tolerances, horizon and output sampling of a trajectory run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub rtol: f64,
    pub atol: f64,
    /// Uniform output spacing [s]. `None` keeps the solver's accepted steps.
    pub output_step: Option<f64>,
    pub max_time: f64, // s
    pub max_step: f64, // s
    pub initial_step: Option<f64>,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            rtol: RELATIVE_TOLERANCE,
            atol: ABSOLUTE_TOLERANCE,
            output_step: Some(OUTPUT_STEP),
            max_time: MAX_SIMULATION_TIME,
            max_step: f64::INFINITY,
            initial_step: None,
        }
    }
}

impl SolverSettings {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    pub fn with_max_time(mut self, max_time: f64) -> Self {
        self.max_time = max_time;
        self
    }

    pub fn with_output_step(mut self, output_step: Option<f64>) -> Self {
        self.output_step = output_step;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("rtol", self.rtol)?;
        positive("atol", self.atol)?;
        positive("max_time", self.max_time)?;
        if let Some(dt) = self.output_step {
            positive("output_step", dt)?;
        }
        if let Some(h0) = self.initial_step {
            positive("initial_step", h0)?;
        }
        // max_step may be infinite, only its sign matters
        if self.max_step.is_nan() || self.max_step <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "max_step",
                value: self.max_step,
            });
        }
        Ok(())
    }
}
