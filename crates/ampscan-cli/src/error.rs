use ampscan_core::{CoreError, ScreenError, ScreenErrorKind};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ampscan_core::ValidationError),

    #[error(transparent)]
    Screen(#[from] ScreenError),

    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Screen(error) => match error.kind() {
                ScreenErrorKind::InvalidCriteria => 2,
                ScreenErrorKind::Network => 3,
                ScreenErrorKind::InsufficientData => 4,
                ScreenErrorKind::Parse => 5,
                ScreenErrorKind::Internal => 10,
            },
            Self::Config(_) => 6,
            Self::Serialization(_) => 7,
            Self::Io(_) => 10,
        }
    }
}
