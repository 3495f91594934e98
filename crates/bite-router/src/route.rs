//! Route patterns and parameter extraction.

use crate::RouterError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Marker that starts a named parameter inside a pattern (`/restaurant/:id`).
pub const PARAM_MARKER: char = ':';

/// Matches one `:name` parameter marker inside a pattern.
fn param_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r":([a-zA-Z0-9_]+)").expect("parameter marker regex"))
}

/// Named values captured from a parameterized route.
///
/// Keeps the order in which the parameters appear in the pattern. A name
/// that occurs twice keeps its first position and the last captured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Get a parameter by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether a parameter was captured.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over `(name, value)` pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no parameters were captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// A registered path pattern.
///
/// Patterns without a [`PARAM_MARKER`] only ever match verbatim. Patterns
/// containing one are compiled into an anchored matcher where every
/// `:name` captures one or more non-`/` characters and the remaining text
/// matches literally.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw: String,
    matcher: Option<Regex>,
    param_names: Vec<String>,
}

impl RoutePattern {
    /// Parse a pattern such as `/`, `/cart` or `/restaurant/:id`.
    pub fn parse(pattern: impl Into<String>) -> Result<Self, RouterError> {
        let raw = pattern.into();
        if !raw.contains(PARAM_MARKER) {
            return Ok(Self {
                raw,
                matcher: None,
                param_names: Vec::new(),
            });
        }

        let mut source = String::with_capacity(raw.len() + 16);
        let mut param_names = Vec::new();
        let mut last = 0;
        source.push('^');

        for caps in param_marker().captures_iter(&raw) {
            let (Some(marker), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            source.push_str(&regex::escape(&raw[last..marker.start()]));
            source.push_str("([^/]+)");
            param_names.push(name.as_str().to_string());
            last = marker.end();
        }
        source.push_str(&regex::escape(&raw[last..]));
        source.push('$');

        let matcher = Regex::new(&source).map_err(|e| RouterError::InvalidPattern {
            pattern: raw.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            raw,
            matcher: Some(matcher),
            param_names,
        })
    }

    /// The pattern exactly as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern takes part in the parameterized scan.
    pub fn is_dynamic(&self) -> bool {
        self.matcher.is_some()
    }

    /// Parameter names in the order they appear in the pattern.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Test a path against the parameterized form of this pattern.
    ///
    /// Always `None` for static patterns; those are looked up verbatim by
    /// the router before any parameterized pattern is considered.
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.matcher.as_ref()?.captures(path)?;
        let mut params = Params::new();
        for (index, name) in self.param_names.iter().enumerate() {
            if let Some(value) = caps.get(index + 1) {
                params.insert(name.clone(), value.as_str());
            }
        }
        Some(params)
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for RoutePattern {}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Path the router should resolve for a raw location hash.
///
/// Strips the leading `#` and falls back to `/` when nothing is left.
pub fn path_from_hash(hash: &str) -> String {
    let path = hash.strip_prefix('#').unwrap_or(hash);
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
