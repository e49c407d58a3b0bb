//! Error types for the wave simulation.

use thiserror::Error;

/// Result type for wave simulation operations.
pub type Result<T> = std::result::Result<T, WaveError>;

/// Errors that can occur while constructing or driving a simulation.
///
/// There are no recoverable errors during steady-state ticking: the stencil
/// kernel is a pure numeric transform. Everything here surfaces either at
/// construction time or on a contract violation.
#[derive(Error, Debug)]
pub enum WaveError {
    /// Bad construction parameters (grid too small, etc.).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Grid buffer allocation failed. Fatal: the simulation cannot start.
    #[error("Failed to allocate grid buffers: {0}")]
    AllocationFailure(String),

    /// Operation invoked on a destroyed simulation.
    #[error("Simulation used after destroy")]
    UseAfterFree,
}

impl WaveError {
    /// Create an invalid-configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
