use thiserror::Error;

use crate::tag::validation::ValidationError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid format: '{input}' (valid format: '{expected}')")]
    Format { input: String, expected: String },
}

impl TagError {
    /// True for constructor and rename failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, TagError::Validation(_))
    }

    /// True for decoder grammar violations.
    pub fn is_format(&self) -> bool {
        matches!(self, TagError::Format { .. })
    }
}

pub type Result<T> = std::result::Result<T, TagError>;
