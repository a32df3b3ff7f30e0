//! vd-project: parameter and scenario files, validation and initial-condition
//! preparation.

pub mod initial;
pub mod schema;
pub mod validate;

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use vd_model::ModelParams;

pub use initial::prepare_initial_conditions;
pub use schema::*;
pub use validate::{ValidationError, validate_params, validate_scenario, validate_settings};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported file format: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialization format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> ProjectResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(ProjectError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

fn read_file<T: DeserializeOwned>(path: &Path) -> ProjectResult<T> {
    let format = FileFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), ?format, "reading input file");
    Ok(match format {
        FileFormat::Yaml => serde_yaml::from_str(&content)?,
        FileFormat::Json => serde_json::from_str(&content)?,
    })
}

fn write_file<T: Serialize>(path: &Path, value: &T) -> ProjectResult<()> {
    let content = match FileFormat::from_path(path)? {
        FileFormat::Yaml => serde_yaml::to_string(value)?,
        FileFormat::Json => serde_json::to_string_pretty(value)?,
    };
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_params(path: &Path) -> ProjectResult<ModelParams> {
    let params: ModelParams = read_file(path)?;
    validate_params(&params)?;
    Ok(params)
}

pub fn save_params(path: &Path, params: &ModelParams) -> ProjectResult<()> {
    validate_params(params)?;
    write_file(path, params)
}

pub fn load_scenario(path: &Path) -> ProjectResult<ScenarioFile> {
    let scenario: ScenarioFile = read_file(path)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn save_scenario(path: &Path, scenario: &ScenarioFile) -> ProjectResult<()> {
    validate_scenario(scenario)?;
    write_file(path, scenario)
}
