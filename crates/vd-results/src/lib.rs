//! vd-results: timeseries export and run cache.

pub mod export;
pub mod hash;
pub mod store;
pub mod types;

pub use export::{ExportConfig, ExportFormat, export, export_csv, export_jsonl, export_parquet};
pub use hash::{compute_run_id, history_digest};
pub use store::RunStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Output file already exists: {path} (enable overwrite to replace it)")]
    OutputExists { path: String },

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("{format} export is not enabled in this build")]
    FormatDisabled { format: &'static str },

    #[error("Parquet error: {0}")]
    Parquet(String),
}
