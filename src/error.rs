use thiserror::Error;

/// Errors produced by the JSON adapters. Container mutations themselves
/// never fail; absence is reported through `Option`.
#[derive(Debug, Error)]
pub enum Error {
    /// The JSON codec rejected the input, either at the array level or
    /// while decoding an element.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
