//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart and pricing operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Unit price below zero.
    #[error("Invalid price for {item}: {price}")]
    InvalidPrice { item: String, price: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in cart calculation")]
    Overflow,

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bite_cache::CacheError> for CommerceError {
    fn from(e: bite_cache::CacheError) -> Self {
        CommerceError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
