use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("field path is empty")]
    EmptyPath,
    #[error("invalid field path {input:?}: {message}")]
    InvalidPath { input: String, message: String },
    #[error("field path {input:?} must start with a name, not an index")]
    LeadingIndex { input: String },
    #[error("index {index} exceeds the largest supported index {max}")]
    IndexTooLarge { index: String, max: usize },
}

impl ModelError {
    pub(crate) fn invalid(input: &str, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            input: input.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
