//! Error types for pawdiary-core

use thiserror::Error;

/// Result type alias using pawdiary-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pawdiary-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any remote call was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote store rejected or failed a write
    #[error("Store error: {0}")]
    Store(String),

    /// A live subscription terminated and will not recover locally
    #[error("Subscription closed for collection '{0}'")]
    SubscriptionClosed(String),

    /// Document decode/encode error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
