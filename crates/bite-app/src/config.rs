//! Storefront configuration.
//!
//! Every field has a default, so an empty file (or no file at all) gives
//! the stock local-development setup.

use crate::error::AppError;
use crate::logging::LogFormat;
use bite_commerce::cart::{PricingConfig, DEFAULT_CART_KEY};
use bite_commerce::notice::DEFAULT_NOTICE_DURATION_MS;
use serde::{Deserialize, Serialize};

/// Backend the storefront talks to when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub cart: CartConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub notices: NoticeConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Text format of a config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file name: `.json` is JSON, anything else TOML.
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".json") {
            ConfigFormat::Json
        } else {
            ConfigFormat::Toml
        }
    }
}

impl AppConfig {
    /// Parse a config document.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, AppError> {
        let config: AppConfig = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &str) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigIo {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&content, ConfigFormat::from_path(path))
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::Config("api.base_url must not be empty".into()));
        }
        if self.cart.storage_key.trim().is_empty() {
            return Err(AppError::Config("cart.storage_key must not be empty".into()));
        }
        if self.pricing.delivery_fee < 0.0 || !self.pricing.delivery_fee.is_finite() {
            return Err(AppError::Config(format!(
                "pricing.delivery_fee must be a non-negative amount, got {}",
                self.pricing.delivery_fee
            )));
        }
        if self.pricing.tax_rate_percent < 0.0 || !self.pricing.tax_rate_percent.is_finite() {
            return Err(AppError::Config(format!(
                "pricing.tax_rate_percent must be a non-negative rate, got {}",
                self.pricing.tax_rate_percent
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// localStorage slot holding the cart.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeConfig {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u32,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
        }
    }
}

fn default_duration_ms() -> u32 {
    DEFAULT_NOTICE_DURATION_MS
}

/// What happens on a path no route matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// Navigate to `/`. Unknown links land on the home page.
    #[default]
    RedirectHome,
    /// Register `/404` and show a not-found page for the unknown path.
    NotFound,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub unmatched: UnmatchedPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `bite_router=debug,info`.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
