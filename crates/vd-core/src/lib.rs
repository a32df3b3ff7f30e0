//! vd-core: stable foundation for vscdyn.
//!
//! Contains:
//! - schema (ordered state and algebraic variable slots)
//! - numeric (Real + residual norms)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod schema;

// Re-exports: nice ergonomics for downstream crates
pub use error::{VdError, VdResult};
pub use numeric::*;
pub use schema::*;
