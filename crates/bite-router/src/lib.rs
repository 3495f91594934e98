//! Hash-fragment routing for the ByteBites storefront.
//!
//! The router maps the part of the page location after `#` to exactly one
//! registered handler:
//!
//! ```text
//! #/                 -> "/"
//! #/cart             -> "/cart"
//! #/restaurant/42    -> "/restaurant/:id"   { id: "42" }
//! #/nonexistent      -> "/404" if registered, otherwise redirect to "/"
//! ```
//!
//! # Usage
//!
//! ```rust
//! use bite_router::prelude::*;
//! use std::rc::Rc;
//!
//! let location = Rc::new(MemoryLocation::new());
//! let router = Router::new(location);
//!
//! router.add_route("/", |_| println!("home"));
//! router.add_route("/restaurant/:id", |ctx| {
//!     println!("restaurant {}", ctx.param("id").unwrap_or_default());
//! });
//!
//! router.start();
//! router.navigate("/restaurant/42");
//! router.run_pending();
//! ```

mod error;
pub mod location;
pub mod prelude;
mod route;
mod router;

pub use error::RouterError;
pub use location::{Location, MemoryLocation};
pub use route::{path_from_hash, Params, RoutePattern, PARAM_MARKER};
pub use router::{
    Dispatch, Handler, NavigationToken, RouteContext, Router, HOME_PATH, NOT_FOUND_PATH,
};

#[cfg(target_arch = "wasm32")]
pub use location::{HashChangeListener, HashLocation};
