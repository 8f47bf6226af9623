use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkySignError>;

#[derive(Debug, Error)]
pub enum SkySignError {
    /// Camera / detector could not be brought up.  Terminal for the session.
    #[error("tracking acquisition failed: {0}")]
    Acquisition(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Gesture(#[from] hand_gesture::ConfigError),

    #[error(transparent)]
    Landmark(#[from] hand_gesture::LandmarkError),

    #[error(transparent)]
    Ink(#[from] ink_engine::InkError),

    #[error("recording {path}:{line}: {reason}")]
    Recording { path: PathBuf, line: usize, reason: String },

    #[error("window error: {0}")]
    Window(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
