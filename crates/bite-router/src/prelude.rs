//! Prelude for convenient imports.
//!
//! ```rust,ignore
//! use bite_router::prelude::*;
//! ```

pub use crate::{
    Dispatch, Location, MemoryLocation, NavigationToken, Params, RouteContext, Router,
    RouterError, HOME_PATH, NOT_FOUND_PATH,
};
