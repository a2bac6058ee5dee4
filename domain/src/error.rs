use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Image is not a PNG file")]
    NotAPng,

    #[error("Truncated chunk: needs {needed} more bytes, {remaining} remain")]
    TruncatedChunk { needed: usize, remaining: usize },

    #[error("Image does not have a palette")]
    MissingPalette,

    #[error("Invalid color format: {0}")]
    InvalidColorFormat(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
