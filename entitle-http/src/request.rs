//! Request builder that turns bad responses into classified diagnostic errors

use entitle_errors::{fields, Error, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

// =============================================================================
// Hook types
// =============================================================================

/// What the summary hook sees when a response is classified as a failure.
///
/// `body` is already truncated to the request's error body cap.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Decides whether a status code is a failure. `true` means failure.
type ErrorCheck = Box<dyn Fn(u16) -> bool + Send + Sync>;

/// Renders the one-line message of a classified failure.
type ErrorSummary = Box<dyn Fn(&ErrorContext) -> String + Send + Sync>;

fn default_check(status: u16) -> bool {
    status >= 300
}

fn default_summary(context: &ErrorContext) -> String {
    let body = context.body.trim();
    if body.is_empty() {
        format!("unexpected status {}", context.status)
    } else {
        format!("unexpected status {}: {}", context.status, body)
    }
}

// =============================================================================
// Request builder
// =============================================================================

enum RequestBody {
    Json(String),
    Text(String),
}

/// A single in-flight request.
///
/// Configure headers, body, and failure classification, then finish with
/// [`execute`](RequestBuilder::execute), [`recv_json`](RequestBuilder::recv_json)
/// or [`recv_text`](RequestBuilder::recv_text).
pub struct RequestBuilder {
    client: reqwest::Client,
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
    error_check: Option<ErrorCheck>,
    error_summary: Option<ErrorSummary>,
    error_body_max: usize,
}

/// Status and raw body of a response that passed the failure check.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl RequestBuilder {
    pub(crate) fn new(
        client: reqwest::Client,
        method: Method,
        url: String,
        error_body_max: usize,
    ) -> Self {
        Self {
            client,
            method,
            url,
            headers: Vec::new(),
            body: None,
            error_check: None,
            error_summary: None,
            error_body_max,
        }
    }

    /// Add a header. Headers set here win over the built-in defaults.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body, serialized immediately.
    ///
    /// Sets `Content-Type: application/json` unless a content type was
    /// given explicitly.
    pub fn send_json<T: Serialize>(mut self, value: &T) -> Result<Self> {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                return Err(entitle_errors::wrap_msg(
                    err,
                    fields! { "url" => self.url },
                    "encoding request body",
                ))
            }
        };
        self.body = Some(RequestBody::Json(json));
        Ok(self)
    }

    /// Attach a plain text body.
    pub fn send_text(mut self, text: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(text.into()));
        self
    }

    /// Replace the failure check. The hook gets the response status and
    /// returns `true` to classify it as a failure.
    pub fn error_check(mut self, check: impl Fn(u16) -> bool + Send + Sync + 'static) -> Self {
        self.error_check = Some(Box::new(check));
        self
    }

    /// Replace how classified failures are summarized into a message.
    pub fn error_summary(
        mut self,
        summary: impl Fn(&ErrorContext) -> String + Send + Sync + 'static,
    ) -> Self {
        self.error_summary = Some(Box::new(summary));
        self
    }

    /// Override the error body cap for this request only.
    pub fn error_body_max(mut self, max: usize) -> Self {
        self.error_body_max = max;
        self
    }

    // -------------------------------------------------------------------
    // Terminals
    // -------------------------------------------------------------------

    /// Send the request and return the raw response.
    ///
    /// Transport failures and statuses the check classifies as failures
    /// come back as diagnostic errors carrying `method`, `url`,
    /// `status_code` and a truncated `response_body`.
    pub async fn execute(self) -> Result<HttpResponse> {
        let RequestBuilder {
            client,
            method,
            url,
            headers,
            body,
            error_check,
            error_summary,
            error_body_max,
        } = self;
        let method_label = method.to_string();

        let mut request = client.request(method, url.as_str());
        if !has_header(&headers, "accept") {
            request = request.header("Accept", "application/json");
        }
        if !has_header(&headers, "accept-charset") {
            request = request.header("Accept-Charset", "utf-8");
        }
        let content_type_set = has_header(&headers, "content-type");
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        match body {
            Some(RequestBody::Json(json)) => {
                if !content_type_set {
                    request = request.header("Content-Type", "application/json");
                }
                request = request.body(json);
            }
            Some(RequestBody::Text(text)) => {
                if !content_type_set {
                    request = request.header("Content-Type", "text/plain");
                }
                request = request.body(text);
            }
            None => {}
        }

        tracing::debug!(method = %method_label, url = %url, "sending request");
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                return Err(entitle_errors::wrap_msg(
                    err,
                    fields! { "method" => method_label, "url" => url },
                    "sending request",
                ))
            }
        };

        let status = response.status().as_u16();
        let response_body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                return Err(entitle_errors::wrap_msg(
                    err,
                    fields! {
                        "method" => method_label,
                        "url" => url,
                        "status_code" => status,
                    },
                    "reading response body",
                ))
            }
        };

        let failed = match &error_check {
            Some(check) => check(status),
            None => default_check(status),
        };
        if failed {
            tracing::warn!(method = %method_label, url = %url, status, "request failed");
            let context = ErrorContext {
                method: method_label,
                url,
                status,
                body: truncate_to_boundary(&response_body, error_body_max),
            };
            let summary = match &error_summary {
                Some(hook) => hook(&context),
                None => default_summary(&context),
            };
            return Err(Error::http(status, summary).with(fields! {
                "method" => context.method,
                "url" => context.url,
                "status_code" => context.status,
                "response_body" => context.body,
            }));
        }

        Ok(HttpResponse {
            status,
            body: response_body,
        })
    }

    /// Send the request and decode the response body as JSON.
    pub async fn recv_json<T: DeserializeOwned>(self) -> Result<T> {
        let url = self.url.clone();
        let response = self.execute().await?;
        match serde_json::from_str(&response.body) {
            Ok(value) => Ok(value),
            Err(err) => Err(entitle_errors::wrap_msg(
                err,
                fields! { "url" => url, "status_code" => response.status },
                "decoding response body",
            )),
        }
    }

    /// Send the request and return the response body as text.
    pub async fn recv_text(mut self) -> Result<String> {
        if !has_header(&self.headers, "accept") {
            self.headers
                .push(("Accept".to_string(), "text/plain".to_string()));
        }
        let response = self.execute().await?;
        Ok(response.body)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}

/// Cut the body at `max` bytes, backing off to a UTF-8 boundary.
fn truncate_to_boundary(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}
