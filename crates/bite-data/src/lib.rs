//! HTTP client for the ByteBites backend.
//!
//! Requests are built here and handed to a [`Transport`]: the browser's
//! `fetch` on wasm32, a [`ScriptedTransport`] in tests.
//!
//! # Example
//!
//! ```rust
//! use bite_data::{FetchClient, ScriptedTransport};
//! use std::rc::Rc;
//!
//! let transport = Rc::new(ScriptedTransport::new());
//! transport.reply(200, serde_json::json!({"email": "asha@example.com"}));
//!
//! let client = FetchClient::new("http://127.0.0.1:5000/api", transport.clone());
//! let user: serde_json::Value =
//!     futures::executor::block_on(client.get("/user").fetch_json()).unwrap();
//!
//! assert_eq!(user["email"], "asha@example.com");
//! assert_eq!(transport.sent()[0].url, "http://127.0.0.1:5000/api/user");
//! ```

pub mod api;
mod error;
mod request;
mod response;
mod transport;

pub use api::BiteApi;
pub use error::FetchError;
pub use request::{Method, Request, RequestBuilder};
pub use response::Response;
#[cfg(target_arch = "wasm32")]
pub use transport::BrowserTransport;
pub use transport::{ScriptedTransport, Transport};

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, error};

/// HTTP client bound to one backend.
#[derive(Clone)]
pub struct FetchClient {
    base_url: String,
    default_headers: BTreeMap<String, String>,
    transport: Rc<dyn Transport>,
}

impl FetchClient {
    /// Create a client; relative request paths are appended to `base_url`.
    pub fn new(base_url: impl Into<String>, transport: Rc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: BTreeMap::new(),
            transport,
        }
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a PUT request.
    pub fn put(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Put, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = if url.starts_with("http://") || url.starts_with("https://") {
            url
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), url)
        };

        let mut builder = RequestBuilder::new(method, full_url).accept("application/json");
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            builder,
            transport: Rc::clone(&self.transport),
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    builder: RequestBuilder,
    transport: Rc<dyn Transport>,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Send the request and return the raw response, whatever its status.
    pub async fn send(self) -> Result<Response, FetchError> {
        let request = self.builder.build();
        debug!(
            method = %request.method,
            url = %request.url,
            transport = self.transport.name(),
            "Sending request"
        );
        self.transport.send(request).await
    }

    /// Send the request, reject non-2xx responses and parse the body.
    pub async fn fetch_json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        let result = async move {
            let response = self.send().await?.error_for_status()?;
            response.json::<T>()
        }
        .await;

        if let Err(e) = &result {
            error!(error = %e, "API fetch failed");
        }
        result
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::api::*;
    pub use crate::{FetchClient, FetchError, Method, Response, ScriptedTransport, Transport};
}
