//! Error types for the iFood core.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by every core operation.
pub type Result<T, E = IfoodError> = std::result::Result<T, E>;

/// Errors that can occur while talking to iFood or walking the browse flow.
///
/// Nothing here is retried by the core. Callers either surface the error to
/// the user (re-enter email/code) or fall back to an earlier screen.
#[derive(Debug, Error)]
pub enum IfoodError {
    /// Non-success HTTP status or transport failure.
    #[error("{operation} failed{}: {message}", status_suffix(.status))]
    Remote {
        /// Short name of the endpoint that failed.
        operation: &'static str,
        /// HTTP status, `None` for network failures.
        status: Option<u16>,
        /// Response body or transport error text.
        message: String,
    },

    /// The OTP claim came back without a token.
    #[error("invalid one-time code")]
    InvalidCode,

    /// The stored refresh token was rejected.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// Credential file missing or unreadable.
    #[error("no saved credentials at {}", .0.display())]
    NotFound(PathBuf),

    /// An authenticated call was attempted without a bearer token.
    #[error("not logged in")]
    NotAuthenticated,

    /// Navigation ordering was violated.
    #[error("{0}")]
    Precondition(&'static str),

    /// Selection handle does not point at a displayed line.
    #[error("no line {0} on this screen")]
    NoSuchLine(usize),

    /// Reading or writing the credential file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl IfoodError {
    /// Builds a `Remote` error from a transport failure.
    pub(crate) fn network(operation: &'static str, err: &reqwest::Error) -> Self {
        Self::Remote {
            operation,
            status: None,
            message: err.to_string(),
        }
    }

    /// Returns true when the server answered 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Remote { status: Some(401), .. })
    }

    /// Returns true for errors that should send the user back to login.
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::RefreshFailed(_) | Self::NotAuthenticated
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let err = IfoodError::Remote {
            operation: "list addresses",
            status: Some(500),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "list addresses failed (HTTP 500): boom");

        let err = IfoodError::Remote {
            operation: "home feed",
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "home feed failed: connection refused");
    }

    #[test]
    fn test_is_unauthorized() {
        let err = IfoodError::Remote {
            operation: "home feed",
            status: Some(401),
            message: String::new(),
        };
        assert!(err.is_unauthorized());
        assert!(!IfoodError::InvalidCode.is_unauthorized());
    }

    #[test]
    fn test_needs_login() {
        assert!(IfoodError::RefreshFailed("nope".into()).needs_login());
        assert!(IfoodError::NotFound(PathBuf::from("x")).needs_login());
        assert!(!IfoodError::InvalidCode.needs_login());
    }
}
