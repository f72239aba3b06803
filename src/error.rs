//! Error types for HashPDF

use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::digest::MalformedDigest;
pub use crate::hashing::HashError;
pub use crate::verify::VerifyError;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Verification error: {0}")]
    Verify(#[from] VerifyError),

    #[error("Invalid digest: {0}")]
    Digest(#[from] MalformedDigest),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error reflects bad input from the user rather than a
    /// failure of the source or the environment
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Error::Digest(_)
                | Error::Verify(VerifyError::MissingExpectedDigest)
                | Error::Verify(VerifyError::MalformedExpectedDigest(_))
        )
    }
}
