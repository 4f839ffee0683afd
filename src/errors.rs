use crate::config::ConfigError;
use crate::integrators::IntegrationError;
use crate::report::ReportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("integration error: {0}")]
    Integration(#[from] IntegrationError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),
}
