use crate::BackendError;
use fragforge_core::ForgeError;
use thiserror::Error;

/// Errors produced by pipeline operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Registering, linking or generating a program failed.
    #[error(transparent)]
    Forge(#[from] ForgeError),

    /// The backend failed to compile, allocate, execute or decode.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A buffer was loaded under a name that was never saved.
    #[error("no buffer saved under \"{0}\"")]
    UnknownBuffer(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
