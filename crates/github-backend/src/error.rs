use mirror_core::MirrorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Unprocessable(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited { reset: Option<i64> },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for MirrorError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(e) => MirrorError::Http(e.to_string()),
            GitHubError::Parse(e) => MirrorError::Parse(e.to_string()),
            GitHubError::Io(e) => MirrorError::Io(e.to_string()),
            GitHubError::NotFound(what) => MirrorError::NotFound(what),
            GitHubError::Forbidden(msg) => MirrorError::Forbidden(msg),
            GitHubError::Unprocessable(msg) => MirrorError::Unprocessable(msg),
            GitHubError::Unauthorized => MirrorError::Unauthorized,
            GitHubError::RateLimited { reset } => MirrorError::RateLimited { reset_epoch: reset },
            GitHubError::Api { status, message } => MirrorError::Api { status, message },
        }
    }
}
