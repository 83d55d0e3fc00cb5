use thiserror::Error;

/// Common errors for mirroring hosts and executors
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Authentication failed")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Already exists or validation error: {0}")]
    Unprocessable(String),

    #[error("Rate limited")]
    RateLimited { reset_epoch: Option<i64> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("git error: {0}")]
    Git(String),
}

impl MirrorError {
    /// HTTP status this error corresponds to, if it came from an API response
    pub fn status(&self) -> Option<u16> {
        match self {
            MirrorError::Unauthorized => Some(401),
            MirrorError::Forbidden(_) => Some(403),
            MirrorError::NotFound(_) => Some(404),
            MirrorError::Unprocessable(_) => Some(422),
            MirrorError::RateLimited { .. } => Some(429),
            MirrorError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MirrorError::NotFound(_))
    }

    /// Remediation hint for errors users can usually fix themselves
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            MirrorError::Forbidden(_) => Some(
                "check that the token has the repo and read:org scopes and is SSO-authorized for the organization",
            ),
            MirrorError::Unauthorized => Some("the token is invalid or expired"),
            MirrorError::RateLimited { .. } => Some(
                "the API rate limit is exhausted; raise rate_limit_min_remaining or retry after the reset",
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;
