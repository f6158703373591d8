use std::fmt;
use std::path::PathBuf;

/// Failures raised by this library. They travel inside `anyhow::Error`;
/// callers that care about the kind use `downcast_ref::<Error>()`.
#[derive(Debug)]
pub enum Error {
    /// An image asset is missing or could not be decoded.
    AssetNotFound { path: PathBuf, reason: String },
    /// A game state was assembled in a way the run loop cannot honour.
    InvariantViolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AssetNotFound { path, reason } => {
                write!(f, "asset not found: {} ({})", path.display(), reason)
            }
            Error::InvariantViolation(msg) => write!(f, "invariant violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
