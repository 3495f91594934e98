//! The location fragment: the router's only input and output surface.

use std::cell::{Cell, RefCell};

/// Read and write access to the routing fragment of the page location.
pub trait Location {
    /// The raw hash, including the leading `#`, or an empty string.
    fn hash(&self) -> String;

    /// Point the location at `path`.
    ///
    /// Writing the value that is already current must not produce a
    /// change notification, matching what browsers do for `location.hash`.
    fn set_hash(&self, path: &str);

    /// Consume one pending change notification, if any.
    ///
    /// Browser-backed locations deliver changes through an event listener
    /// instead and always return `false` here.
    fn poll_change(&self) -> bool {
        false
    }
}

/// In-memory location for tests and non-browser targets.
///
/// Records every distinct hash it was set to and queues one change
/// notification per effective write, so the router can drain them the
/// way the browser event loop would deliver `hashchange`.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    hash: RefCell<String>,
    history: RefCell<Vec<String>>,
    pending: Cell<usize>,
}

impl MemoryLocation {
    /// Create a location with an empty hash.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a location that starts at `path` without a pending change.
    pub fn at(path: &str) -> Self {
        let location = Self::new();
        *location.hash.borrow_mut() = normalize(path);
        location
    }

    /// Every hash this location has held, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    /// Number of change notifications not yet consumed.
    pub fn pending_changes(&self) -> usize {
        self.pending.get()
    }

    /// Step back to the previous hash, like the browser back button.
    ///
    /// Returns `false` when there is nothing to go back to.
    pub fn back(&self) -> bool {
        let previous = {
            let mut history = self.history.borrow_mut();
            if history.len() < 2 {
                return false;
            }
            history.pop();
            history.last().cloned()
        };
        match previous {
            Some(previous) => {
                *self.hash.borrow_mut() = previous;
                self.pending.set(self.pending.get() + 1);
                true
            }
            None => false,
        }
    }
}

impl Location for MemoryLocation {
    fn hash(&self) -> String {
        self.hash.borrow().clone()
    }

    fn set_hash(&self, path: &str) {
        let next = normalize(path);
        if *self.hash.borrow() == next {
            return;
        }
        {
            let mut history = self.history.borrow_mut();
            if history.is_empty() {
                history.push(self.hash.borrow().clone());
            }
            history.push(next.clone());
        }
        *self.hash.borrow_mut() = next;
        self.pending.set(self.pending.get() + 1);
    }

    fn poll_change(&self) -> bool {
        match self.pending.get() {
            0 => false,
            n => {
                self.pending.set(n - 1);
                true
            }
        }
    }
}

fn normalize(path: &str) -> String {
    if path.is_empty() || path.starts_with('#') {
        path.to_string()
    } else {
        format!("#{}", path)
    }
}

/// `window.location.hash` backed location.
#[cfg(target_arch = "wasm32")]
pub struct HashLocation {
    window: web_sys::Window,
}

#[cfg(target_arch = "wasm32")]
impl HashLocation {
    /// Bind to the current browser window.
    pub fn new() -> Result<Self, crate::RouterError> {
        let window = web_sys::window().ok_or(crate::RouterError::NoWindow)?;
        Ok(Self { window })
    }
}

#[cfg(target_arch = "wasm32")]
impl Location for HashLocation {
    fn hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn set_hash(&self, path: &str) {
        if let Err(err) = self.window.location().set_hash(path) {
            tracing::warn!(path, error = ?err, "failed to update location hash");
        }
    }
}

/// Keeps a `hashchange` listener registered until dropped.
#[cfg(target_arch = "wasm32")]
pub struct HashChangeListener {
    window: web_sys::Window,
    closure: wasm_bindgen::closure::Closure<dyn Fn()>,
}

#[cfg(target_arch = "wasm32")]
impl HashChangeListener {
    /// Call `callback` on every `hashchange` event of the current window.
    pub fn new(callback: impl Fn() + 'static) -> Result<Self, crate::RouterError> {
        use wasm_bindgen::JsCast;

        let window = web_sys::window().ok_or(crate::RouterError::NoWindow)?;
        let closure = wasm_bindgen::closure::Closure::<dyn Fn()>::new(callback);
        window
            .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref())
            .map_err(|e| crate::RouterError::Browser(format!("{:?}", e)))?;
        Ok(Self { window, closure })
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for HashChangeListener {
    fn drop(&mut self) {
        use wasm_bindgen::JsCast;

        let _ = self.window.remove_event_listener_with_callback(
            "hashchange",
            self.closure.as_ref().unchecked_ref(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_location_starts_empty() {
        let location = MemoryLocation::new();
        assert_eq!(location.hash(), "");
        assert!(!location.poll_change());
    }

    #[test]
    fn test_set_hash_queues_change() {
        let location = MemoryLocation::new();
        location.set_hash("/cart");
        assert_eq!(location.hash(), "#/cart");
        assert_eq!(location.pending_changes(), 1);
        assert!(location.poll_change());
        assert!(!location.poll_change());
    }

    #[test]
    fn test_same_hash_is_not_a_change() {
        let location = MemoryLocation::at("/cart");
        location.set_hash("/cart");
        assert_eq!(location.pending_changes(), 0);
    }

    #[test]
    fn test_back_restores_previous_hash() {
        let location = MemoryLocation::new();
        location.set_hash("/");
        location.set_hash("/orders");
        assert!(location.poll_change());
        assert!(location.poll_change());

        assert!(location.back());
        assert_eq!(location.hash(), "#/");
        assert!(location.poll_change());
        assert_eq!(location.history(), vec!["".to_string(), "#/".to_string()]);
    }

    #[test]
    fn test_back_without_history() {
        let location = MemoryLocation::new();
        assert!(!location.back());
    }
}
