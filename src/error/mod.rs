use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Event sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while configuring or starting a scaffolding round.
///
/// These are the only fatal errors in the engine. Malformed learner input and
/// malformed maps are recovered locally and never surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unknown scaffolding type: {value}")]
    UnknownScaffoldingType { value: String },

    #[error("Invalid scaffolding intensity: {value}")]
    InvalidIntensity { value: String },

    #[error("Invalid round {round}: {reason}")]
    InvalidRound { round: u8, reason: String },

    #[error("Invalid round sequence: {message}")]
    InvalidSequence { message: String },

    #[error("Pattern handler already registered for {category}")]
    DuplicateHandler { category: String },
}

/// Event sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Sink unavailable: {message}")]
    Unavailable { message: String },
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type alias for event sink operations
pub type SinkResult<T> = Result<T, SinkError>;
