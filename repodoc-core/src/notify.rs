//! User-visible notifications. The top-level action handler is the only place
//! that turns a [`RepoDocError`] into one of these.

use std::fmt;

use crate::error::RepoDocError;

pub const UNEXPECTED_FAILURE: &str = "An unexpected error occurred";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub success: bool,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }

    /// Generic notice for failures no specific handler caught.
    pub fn unexpected() -> Self {
        Self::error(UNEXPECTED_FAILURE)
    }
}

impl From<&RepoDocError> for Notification {
    fn from(error: &RepoDocError) -> Self {
        let message = match error {
            RepoDocError::Config(detail) => format!("Missing configuration: {detail}"),
            RepoDocError::Auth(_) => {
                "Authentication failed, check your GitHub token and API key".to_string()
            }
            RepoDocError::NotFound(_) => "Repository not found or is private".to_string(),
            RepoDocError::Input(detail) => format!("Invalid request: {detail}"),
            RepoDocError::Transport(detail) => format!("Network error: {detail}"),
            RepoDocError::Storage(detail) => format!("Could not access local state: {detail}"),
        };
        Self::error(message)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.success { "✓" } else { "✗" };
        write!(f, "{marker} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_failure_notifications() {
        let n = Notification::from(&RepoDocError::NotFound("https://api/x".into()));
        assert!(!n.success);
        assert_eq!(n.message, "Repository not found or is private");

        let n = Notification::from(&RepoDocError::Input("no eligible source files".into()));
        assert!(n.message.contains("no eligible source files"));
    }

    #[test]
    fn display_marks_outcome() {
        assert_eq!(Notification::success("Connected").to_string(), "✓ Connected");
        assert_eq!(Notification::unexpected().to_string(), format!("✗ {UNEXPECTED_FAILURE}"));
    }
}
