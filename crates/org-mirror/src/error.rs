use mirror_core::MirrorError;
use thiserror::Error;

/// Failures that end a run, each with its own exit code
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(
        "Organization verification failed ({failed} of {checked} checks); no repositories were touched"
    )]
    Verification { failed: usize, checked: usize },

    #[error("git is not available: {0}")]
    GitUnavailable(String),

    #[error(transparent)]
    Mirror(#[from] MirrorError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn config(err: impl std::fmt::Display) -> Self {
        AppError::Config(err.to_string())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            AppError::Verification { .. } => 3,
            AppError::GitUnavailable(_) => 4,
            AppError::Mirror(_) | AppError::Other(_) => 1,
        }
    }

    /// Stable identifier used in JSON error output
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::Verification { .. } => "verification_failed",
            AppError::GitUnavailable(_) => "git_unavailable",
            AppError::Mirror(_) => "api_error",
            AppError::Other(_) => "error",
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AppError::Mirror(err) => err.hint(),
            _ => None,
        }
    }
}
