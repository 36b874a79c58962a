use thiserror::Error;

#[derive(Error, Debug)]
pub enum StagehandError {
    #[error("secret not found: {0}")]
    SecretNotFound(String),

    #[error("stage not found: {stage} on secret {secret}")]
    StageNotFound { secret: String, stage: String },

    #[error("format error: {0}")]
    Format(String),

    #[error("declined: confirmation token did not match")]
    ConfirmationDeclined,

    #[error("store error during {operation}: {message}")]
    Store {
        operation: &'static str,
        message: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StagehandError {
    /// Wrap a collaborator failure with the name of the failing operation.
    pub fn store(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Store {
            operation,
            message: err.to_string(),
        }
    }

    /// Whether this error means "the thing is already gone".
    ///
    /// The retention sweep tolerates these when removing labels.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SecretNotFound(_) | Self::StageNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StagehandError>;
