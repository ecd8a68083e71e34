/// Result alias that carries the custom [`GeneratorError`] type.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The base timeline has no notes, so there is nothing to anchor bars to.
    #[error("timeline contains no notes")]
    NoNotes,
    /// Tempo must be a positive, finite number of beats per minute.
    #[error("tempo must be positive, got {0} bpm")]
    InvalidTempo(f32),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The requested base characteristic is not present in the beatmap.
    #[error("unknown characteristic `{0}`")]
    UnknownCharacteristic(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Creates a configuration error from the provided message.
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
