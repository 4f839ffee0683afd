use crate::numerics::RootError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("invalid solver settings: {0}")]
    InvalidSettings(String),

    #[error("state became non-finite at t = {t} s")]
    NonFiniteState { t: f64 },

    #[error("step size underflow at t = {t} s (h = {h:e} s)")]
    StepSizeUnderflow { t: f64, h: f64 },

    #[error("iteration matrix is singular at t = {t} s")]
    SingularIterationMatrix { t: f64 },

    #[error("event location failed: {0}")]
    Root(#[from] RootError),
}
