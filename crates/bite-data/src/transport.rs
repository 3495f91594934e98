//! Transports that carry a [`Request`] to the backend.

use crate::{FetchError, Request, Response};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Sends one request and returns the raw response.
///
/// Futures are not `Send`: the browser event loop is single-threaded.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: Request) -> Result<Response, FetchError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

/// Replays canned responses in order and records every request.
///
/// Used by tests and by native builds that have no browser `fetch`.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<Response, FetchError>>>,
    sent: RefCell<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply.
    pub fn reply(&self, status: u16, body: serde_json::Value) -> &Self {
        self.replies
            .borrow_mut()
            .push_back(Ok(Response::json_body(status, &body)));
        self
    }

    /// Queue a transport-level failure (network down, CORS, ...).
    pub fn fail(&self, message: impl Into<String>) -> &Self {
        self.replies
            .borrow_mut()
            .push_back(Err(FetchError::RequestError(message.into())));
        self
    }

    /// Requests sent so far, oldest first.
    pub fn sent(&self) -> Vec<Request> {
        self.sent.borrow().clone()
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        let url = request.url.clone();
        self.sent.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::RequestError(format!("no scripted reply for {}", url))))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// `window.fetch`, sending cookies so the backend session survives.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct BrowserTransport;

#[cfg(target_arch = "wasm32")]
impl BrowserTransport {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(value: wasm_bindgen::JsValue) -> FetchError {
    FetchError::RequestError(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{RequestCredentials, RequestInit, RequestMode};

        let window = web_sys::window()
            .ok_or_else(|| FetchError::RequestError("no window".to_string()))?;

        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        init.set_mode(RequestMode::Cors);
        init.set_credentials(RequestCredentials::Include);
        if let Some(body) = &request.body {
            init.set_body(&wasm_bindgen::JsValue::from_str(body));
        }

        let js_request =
            web_sys::Request::new_with_str_and_init(&request.url, &init).map_err(js_error)?;
        for (key, value) in &request.headers {
            js_request.headers().set(key, value).map_err(js_error)?;
        }

        let value = JsFuture::from(window.fetch_with_request(&js_request))
            .await
            .map_err(js_error)?;
        let js_response: web_sys::Response = value.dyn_into().map_err(js_error)?;

        let mut headers = std::collections::HashMap::new();
        if let Ok(Some(content_type)) = js_response.headers().get("Content-Type") {
            headers.insert("Content-Type".to_string(), content_type);
        }

        let text = JsFuture::from(js_response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        let body = text.as_string().unwrap_or_default().into_bytes();

        Ok(Response::new(js_response.status(), headers, body))
    }

    fn name(&self) -> &'static str {
        "fetch"
    }
}
