//! HTTP client wrapper with shared failure-classification settings

use crate::request::RequestBuilder;
use entitle_errors::{Fields, Result, ResultExt};
use reqwest::Method;
use std::time::Duration;

/// How much of a failing response body is kept as diagnostic context.
pub const DEFAULT_ERROR_BODY_MAX: usize = 256;

/// A reusable HTTP client.
///
/// Wraps a connection-pooling `reqwest::Client` and stamps every request
/// started from it with the client-wide error body cap.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    error_body_max: usize,
}

impl HttpClient {
    /// Build a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .wrap_msg(Fields::new(), "building http client")?;

        Ok(Self {
            client,
            error_body_max: DEFAULT_ERROR_BODY_MAX,
        })
    }

    /// Override how many bytes of a failing response body are kept.
    pub fn with_error_body_max(mut self, max: usize) -> Self {
        self.error_body_max = max;
        self
    }

    /// Start a request.
    pub fn request(&self, method: Method, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.client.clone(), method, url.into(), self.error_body_max)
    }

    /// Start a GET request.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Start a POST request.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    /// Start a PUT request.
    pub fn put(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::PUT, url)
    }
}
