use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Validation and contract errors exposed by `ampscan-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("instrument code cannot be empty")]
    EmptyInstrumentCode,
    #[error("instrument code length {len} exceeds max {max}")]
    InstrumentCodeTooLong { len: usize, max: usize },
    #[error("instrument code contains invalid character '{ch}' at index {index}")]
    InstrumentCodeInvalidChar { ch: char, index: usize },

    #[error("trade date must be YYYY-MM-DD or YYYYMMDD: '{value}'")]
    InvalidTradeDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("min volume {min} exceeds max volume {max} (thousands of shares)")]
    InvertedVolumeRange { min: u64, max: u64 },
    #[error("max results must be greater than zero")]
    ZeroMaxResults,

    #[error("invalid value '{value}' for configuration key '{key}'")]
    InvalidConfigValue { key: String, value: String },
}

/// Top-level error type for core operations that are not part of the screening pipeline.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read config file '{path}': {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Pipeline failure classification.
///
/// Callers use the kind to tell "try again later" (market closed) from
/// "something is structurally broken" (parse mismatch) from "transient" (network).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenErrorKind {
    /// Connection failure, timeout or non-success HTTP status.
    Network,
    /// The report body was too short to hold a trading session (holiday, market not open yet).
    InsufficientData,
    /// The document did not contain a table with the expected schema.
    Parse,
    /// The supplied filter criteria are inconsistent.
    InvalidCriteria,
    Internal,
}

/// Structured pipeline error. The first failing stage halts the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenError {
    kind: ScreenErrorKind,
    message: String,
    retryable: bool,
}

impl ScreenError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ScreenErrorKind::Network,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self {
            kind: ScreenErrorKind::InsufficientData,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ScreenErrorKind::Parse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_criteria(error: ValidationError) -> Self {
        Self {
            kind: ScreenErrorKind::InvalidCriteria,
            message: error.to_string(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ScreenErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> ScreenErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ScreenErrorKind::Network => "screen.network",
            ScreenErrorKind::InsufficientData => "screen.insufficient_data",
            ScreenErrorKind::Parse => "screen.parse",
            ScreenErrorKind::InvalidCriteria => "screen.invalid_criteria",
            ScreenErrorKind::Internal => "screen.internal",
        }
    }
}

impl Display for ScreenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ScreenError {}
