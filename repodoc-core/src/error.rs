//! Error taxonomy shared by every component of repodoc-core.
//!
//! Optional lookups (manifest, readme, individual files inside the source walk)
//! swallow these after logging them. Mandatory lookups propagate them up to the
//! top-level action handler, which turns them into a single [`Notification`].
//!
//! [`Notification`]: crate::notify::Notification

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoDocError {
    /// A credential or setting required before any network call is missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// The remote service rejected the credential (401).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The remote resource does not exist or is not visible with this credential.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller supplied invalid or insufficient data.
    #[error("invalid input: {0}")]
    Input(String),

    /// Any other network failure or malformed response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The local identity slot could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),
}

impl RepoDocError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoDocError::NotFound(_))
    }

    /// Short stable label for the variant, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            RepoDocError::Config(_) => "config",
            RepoDocError::Auth(_) => "auth",
            RepoDocError::NotFound(_) => "not_found",
            RepoDocError::Input(_) => "input",
            RepoDocError::Transport(_) => "transport",
            RepoDocError::Storage(_) => "storage",
        }
    }
}

impl From<reqwest::Error> for RepoDocError {
    fn from(e: reqwest::Error) -> Self {
        RepoDocError::Transport(e.to_string())
    }
}

impl From<std::io::Error> for RepoDocError {
    fn from(e: std::io::Error) -> Self {
        RepoDocError::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RepoDocError>;
