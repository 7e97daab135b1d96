use thiserror::Error;
use vecstat_core::{CoreError, SourceError, SourceErrorKind};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] vecstat_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Fetch(#[from] SourceError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Command(_) => 2,
            Self::Fetch(error) if error.kind() == SourceErrorKind::InvalidRequest => 2,
            Self::Fetch(_) => 3,
            Self::Core(CoreError::Validation(_)) => 2,
            Self::Core(CoreError::Serialization(_)) | Self::Serialization(_) => 4,
            Self::Core(CoreError::Io(_)) | Self::Io(_) => 10,
        }
    }
}
