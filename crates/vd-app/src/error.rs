//! Error types for the vd-app service layer.

/// Application error type wrapping the backend crates' errors.
///
/// A simulation that fails part-way is not an `AppError`; it is reported in
/// the run response together with the records accepted before the failure.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Simulation setup error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for vd-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<vd_project::ProjectError> for AppError {
    fn from(err: vd_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<vd_sim::SimError> for AppError {
    fn from(err: vd_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<vd_results::ResultsError> for AppError {
    fn from(err: vd_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
