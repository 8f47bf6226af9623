use thiserror::Error;

pub type Result<T> = std::result::Result<T, InkError>;

#[derive(Debug, Error)]
pub enum InkError {
    #[error("invalid colour {0:?}")]
    InvalidColor(String),

    #[error("invalid ink style: {field} {reason}")]
    InvalidStyle { field: &'static str, reason: String },

    #[error("surface has zero area")]
    EmptySurface,

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
