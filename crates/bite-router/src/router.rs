//! Route table and dispatch.

use crate::location::Location;
use crate::route::{path_from_hash, Params, RoutePattern};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, warn};

/// Path of the home route, the target of the redirect-home fallback.
pub const HOME_PATH: &str = "/";

/// Pattern under which a catch-all "not found" handler is registered.
pub const NOT_FOUND_PATH: &str = "/404";

/// Upper bound on change notifications drained by one [`Router::run_pending`].
const MAX_PENDING_DISPATCHES: usize = 16;

/// A route handler.
pub type Handler = Rc<dyn Fn(&RouteContext)>;

/// Identifies one dispatch of the router.
///
/// Page loads that finish asynchronously keep the token they were started
/// with and check [`Router::is_current`] before touching the view, so a
/// slow response for an abandoned page is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigationToken(u64);

impl NavigationToken {
    /// Sequence number of the dispatch.
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// What a handler is invoked with.
#[derive(Debug, Clone)]
pub struct RouteContext {
    path: String,
    params: Params,
    token: NavigationToken,
}

impl RouteContext {
    /// The resolved path, e.g. `/restaurant/42`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Captured parameters; empty for static routes.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Shortcut for `params().get(name)`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Token of the dispatch that produced this context.
    pub fn token(&self) -> NavigationToken {
        self.token
    }
}

/// How a location change was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A pattern equal to the path was found.
    Exact { pattern: String },
    /// The first matching parameterized pattern in registration order.
    Dynamic { pattern: String, params: Params },
    /// Nothing matched; the `/404` handler ran.
    NotFound { path: String },
    /// Nothing matched and no `/404` handler exists; navigated to `/`.
    RedirectHome { from: String },
    /// The home path itself is unmatched. Nothing ran.
    Unresolved { path: String },
}

struct RouteEntry {
    pattern: RoutePattern,
    handler: Handler,
}

/// Client-side hash router.
///
/// Exact patterns win over parameterized ones; among parameterized
/// patterns the first registered one that matches wins, with no
/// specificity ranking. A path nothing matches goes to the handler
/// registered under [`NOT_FOUND_PATH`] when there is one and otherwise
/// redirects to [`HOME_PATH`].
///
/// Single-threaded: handlers are cloned out of the table before they run,
/// so a handler may register routes or navigate.
pub struct Router {
    location: Rc<dyn Location>,
    routes: RefCell<Vec<RouteEntry>>,
    current_path: RefCell<String>,
    sequence: Cell<u64>,
}

impl Router {
    /// Create a router reading and writing `location`.
    pub fn new(location: Rc<dyn Location>) -> Self {
        Self {
            location,
            routes: RefCell::new(Vec::new()),
            current_path: RefCell::new(HOME_PATH.to_string()),
            sequence: Cell::new(0),
        }
    }

    /// Register `handler` under `pattern`.
    ///
    /// Registering an identical pattern again replaces the handler and
    /// keeps the original position in the scan order.
    pub fn add_route(&self, pattern: &str, handler: impl Fn(&RouteContext) + 'static) {
        let pattern = match RoutePattern::parse(pattern) {
            Ok(pattern) => pattern,
            Err(err) => {
                warn!(%err, "ignoring route");
                return;
            }
        };
        let handler: Handler = Rc::new(handler);

        let mut routes = self.routes.borrow_mut();
        match routes.iter_mut().find(|e| e.pattern == pattern) {
            Some(entry) => {
                debug!(pattern = %pattern, "replacing route handler");
                entry.handler = handler;
            }
            None => {
                debug!(pattern = %pattern, "adding route");
                routes.push(RouteEntry { pattern, handler });
            }
        }
    }

    /// Register the catch-all handler for unmatched paths.
    pub fn set_not_found(&self, handler: impl Fn(&RouteContext) + 'static) {
        self.add_route(NOT_FOUND_PATH, handler);
    }

    /// Check whether a pattern is registered verbatim.
    pub fn has_route(&self, pattern: &str) -> bool {
        self.routes
            .borrow()
            .iter()
            .any(|e| e.pattern.as_str() == pattern)
    }

    /// Registered patterns in scan order.
    pub fn patterns(&self) -> Vec<String> {
        self.routes
            .borrow()
            .iter()
            .map(|e| e.pattern.as_str().to_string())
            .collect()
    }

    /// Change the location to `path`.
    ///
    /// Does not call any handler itself: the resulting change notification
    /// goes through [`Router::handle_location_change`] like any other
    /// navigation.
    pub fn navigate(&self, path: &str) {
        debug!(path, "navigate");
        self.location.set_hash(path);
    }

    /// Resolve the initial location. Call once on page load.
    pub fn start(&self) -> Dispatch {
        self.handle_location_change()
    }

    /// Resolve the current location and run the chosen handler.
    pub fn handle_location_change(&self) -> Dispatch {
        let path = path_from_hash(&self.location.hash());
        *self.current_path.borrow_mut() = path.clone();
        let token = NavigationToken(self.sequence.get() + 1);
        self.sequence.set(token.0);
        self.dispatch(path, token)
    }

    /// Deliver queued change notifications of a polled location.
    ///
    /// Returns the dispatches in order. Browser locations deliver their
    /// changes through `hashchange` and never queue anything here.
    pub fn run_pending(&self) -> Vec<Dispatch> {
        let mut dispatches = Vec::new();
        while self.location.poll_change() {
            if dispatches.len() == MAX_PENDING_DISPATCHES {
                warn!(
                    limit = MAX_PENDING_DISPATCHES,
                    "too many chained navigations, dropping the rest"
                );
                while self.location.poll_change() {}
                break;
            }
            dispatches.push(self.handle_location_change());
        }
        dispatches
    }

    /// Path resolved by the latest dispatch.
    pub fn current_path(&self) -> String {
        self.current_path.borrow().clone()
    }

    /// Token of the latest dispatch.
    pub fn current_token(&self) -> NavigationToken {
        NavigationToken(self.sequence.get())
    }

    /// Whether `token` belongs to the latest dispatch.
    pub fn is_current(&self, token: NavigationToken) -> bool {
        token.0 == self.sequence.get()
    }

    fn dispatch(&self, path: String, token: NavigationToken) -> Dispatch {
        if let Some(handler) = self.exact(&path) {
            debug!(path = %path, "exact route match");
            let context = RouteContext {
                path: path.clone(),
                params: Params::new(),
                token,
            };
            handler(&context);
            return Dispatch::Exact { pattern: path };
        }

        if let Some((pattern, params, handler)) = self.first_dynamic(&path) {
            debug!(path = %path, pattern = %pattern, "parameterized route match");
            let context = RouteContext {
                path,
                params: params.clone(),
                token,
            };
            handler(&context);
            return Dispatch::Dynamic { pattern, params };
        }

        if let Some(handler) = self.exact(NOT_FOUND_PATH) {
            debug!(path = %path, "no route, using not-found handler");
            let context = RouteContext {
                path: path.clone(),
                params: Params::new(),
                token,
            };
            handler(&context);
            return Dispatch::NotFound { path };
        }

        if path == HOME_PATH {
            warn!("no route registered for the home path");
            return Dispatch::Unresolved { path };
        }

        debug!(path = %path, "no route, redirecting home");
        self.navigate(HOME_PATH);
        Dispatch::RedirectHome { from: path }
    }

    fn exact(&self, path: &str) -> Option<Handler> {
        self.routes
            .borrow()
            .iter()
            .find(|e| e.pattern.as_str() == path)
            .map(|e| Rc::clone(&e.handler))
    }

    fn first_dynamic(&self, path: &str) -> Option<(String, Params, Handler)> {
        self.routes
            .borrow()
            .iter()
            .filter(|e| e.pattern.is_dynamic())
            .find_map(|e| {
                e.pattern.captures(path).map(|params| {
                    (
                        e.pattern.as_str().to_string(),
                        params,
                        Rc::clone(&e.handler),
                    )
                })
            })
    }
}
