use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no solution loaded, call load_solution() first")]
    NoSolutionLoaded,

    #[error("trajectory has no samples")]
    EmptyTrajectory,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
