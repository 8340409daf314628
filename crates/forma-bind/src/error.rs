use forma_core::FormError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BindError {
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Form(#[from] FormError),
}

pub type Result<T> = std::result::Result<T, BindError>;
