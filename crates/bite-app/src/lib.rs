//! ByteBites storefront.
//!
//! Wires the hash router, the persisted cart and the backend client into
//! one [`App`]. Rendering is delegated to a [`PageRenderer`]; the browser
//! build hands typed views to JavaScript, tests record them.
//!
//! # Example
//!
//! ```rust
//! use bite_app::prelude::*;
//! use bite_cache::MemoryStore;
//! use bite_commerce::cart::Cart;
//! use bite_commerce::notice::Notice;
//! use bite_data::ScriptedTransport;
//! use bite_router::MemoryLocation;
//! use futures::executor::LocalPool;
//! use std::rc::Rc;
//!
//! struct Quiet;
//! impl PageRenderer for Quiet {
//!     fn render(&self, _: &PageView) {}
//!     fn cart_changed(&self, _: &Cart) {}
//!     fn notice(&self, _: &Notice) {}
//! }
//!
//! let pool = LocalPool::new();
//! let app = App::new(
//!     AppConfig::default(),
//!     Platform {
//!         location: Rc::new(MemoryLocation::at("/cart")),
//!         store: MemoryStore::new(),
//!         transport: Rc::new(ScriptedTransport::new()),
//!         renderer: Rc::new(Quiet),
//!         spawner: Rc::new(pool.spawner()),
//!     },
//! );
//!
//! app.start();
//! assert_eq!(app.current_page(), Some(Page::Cart));
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod pages;

#[cfg(target_arch = "wasm32")]
mod web;

pub use app::{App, Delivery, Platform, TaskSpawner};
pub use config::{AppConfig, ConfigFormat, UnmatchedPolicy};
pub use error::AppError;
pub use pages::{Page, PageRenderer, PageView};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::app::{App, Delivery, Platform, TaskSpawner};
    pub use crate::config::{AppConfig, ConfigFormat, UnmatchedPolicy};
    pub use crate::error::AppError;
    pub use crate::pages::{Page, PageRenderer, PageView};
}
