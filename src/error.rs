//! Crate-level error type.
//!
//! Wraps the world module's error enums so callers that touch both
//! configuration and queries can use a single `?` chain.

use crate::world::error::{ConfigError, WorldError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("World error: {0}")]
    World(#[from] WorldError),
}

/// Type alias for Results in the voxel engine
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Configuration errors halt world initialization
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Config(_))
    }
}
