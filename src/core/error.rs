use thiserror::Error;

#[derive(Error, Debug)]
pub enum TempestryError {
    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    #[error("Scene write failed for {scene}: {reason}")]
    SceneWriteFailed { scene: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TempestryError>;
