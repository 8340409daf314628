use forma_model::{FieldPath, ModelError};
use thiserror::Error;

/// Boxed error returned by observer callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("field {path} is not registered")]
    UnregisteredField { path: FieldPath },

    #[error("field {path} is registered but has no binding attached")]
    MissingBinding { path: FieldPath },

    #[error("observer for {path} failed: {source}")]
    Observer {
        path: FieldPath,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Path(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, FormError>;
