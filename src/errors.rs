use thiserror::Error;

/// Errors that can abort an icon resolution run.
///
/// Captures that simply cannot be resolved are not errors; they are
/// collected by the disambiguator and reported at the end of the run.
#[derive(Error, Debug)]
pub enum IconizeError {
    #[error("config error: {message}")]
    Config { message: String },

    #[error("asset error: {message} (path: {path})")]
    Asset { message: String, path: String },

    #[error("data integrity error: {message}. This only happens if the asset files were generated wrongly")]
    DataIntegrity { message: String },

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("http error: {0}")]
    Http(#[from] ureq::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `IconizeError`.
pub type Result<T> = std::result::Result<T, IconizeError>;
