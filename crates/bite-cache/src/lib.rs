//! Typed key-value storage for ByteBites.
//!
//! Values are stored as JSON text under string keys, in the browser's
//! `localStorage` on `wasm32` or in memory everywhere else.
//!
//! # Example
//!
//! ```rust,ignore
//! use bite_cache::{Cache, LocalStore};
//!
//! let cache = Cache::new(LocalStore::open()?);
//!
//! // Store a value
//! cache.set("cart", &items)?;
//!
//! // Retrieve a value
//! let items: Option<Vec<LineItem>> = cache.get("cart")?;
//!
//! // Delete a value
//! cache.delete("cart")?;
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::{Cache, KeyValueStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use kv::LocalStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KeyValueStore, MemoryStore};
}
