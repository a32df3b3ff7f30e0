use thiserror::Error;

pub type VdResult<T> = Result<T, VdError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VdError {
    #[error("Missing variable: {name}")]
    MissingVariable { name: String },

    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("Length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}
