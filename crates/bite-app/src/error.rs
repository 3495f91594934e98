//! Application error types.

use thiserror::Error;

/// Errors surfaced by the storefront shell.
#[derive(Error, Debug)]
pub enum AppError {
    /// Config text could not be parsed.
    #[error("Invalid config: {0}")]
    Config(String),

    /// Config file could not be read.
    #[error("Failed to read config file {path}: {reason}")]
    ConfigIo { path: String, reason: String },

    /// Logging could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Router(#[from] bite_router::RouterError),

    #[error(transparent)]
    Cache(#[from] bite_cache::CacheError),

    #[error(transparent)]
    Commerce(#[from] bite_commerce::CommerceError),

    #[error(transparent)]
    Fetch(#[from] bite_data::FetchError),
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Config(e.to_string())
    }
}
