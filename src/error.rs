use thiserror::Error;

/// Result type for jaif operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error types for the injector.
///
/// Problems inside the index text are not fatal; they surface as
/// [`crate::wash::Diagnostic`] values and the run continues.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read annotation index '{path}': {source}")]
    IndexSource {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("unknown compilation unit #{0}")]
    UnknownUnit(usize),

    #[error("Internal injector error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}
