use thiserror::Error;

/// Configuration errors raised while building levels or the engine.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("negative victim count: top={top}, bottom={bottom}")]
    NegativeVictimCount { top: i64, bottom: i64 },

    #[error("level sequence is empty")]
    EmptyLevelSequence,

    #[error("vehicle speed must be positive, got {0}")]
    NonPositiveSpeed(f64),

    #[error("invalid track layout: {0}")]
    InvalidTrack(String),
}

/// Errors surfaced at the JSON API boundary.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("unsupported schema version: found {found}, expected {expected}")]
    UnsupportedSchema { found: u8, expected: u8 },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SimError>;
