//! Client construction and the request plumbing shared by every operation

use entitle_errors::{fields, Error, Result};
use entitle_http::{HttpClient, Method, RequestBuilder};
use entitle_validation::{invalid_url, Errors};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Request timeout applied when the config does not set one.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`Client`].
#[derive(Clone)]
pub struct Config {
    /// Root of the entitlement service, e.g. `https://entitle.example.com`.
    pub base_url: Url,
    /// Bearer token attached to every request when present.
    pub token: Option<String>,
    /// Per-request timeout in seconds; defaults to 30.
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout_secs: None,
        }
    }

    /// Authenticate requests with a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

// Keep the token out of debug output and logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Client for the entitlement service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    base_url: Url,
    token: Option<String>,
}

impl Client {
    /// Build a client from connection settings.
    ///
    /// The base URL must be absolute http(s); anything else is rejected as
    /// a 400-classified validation error.
    pub fn new(config: Config) -> Result<Self> {
        if !entitle_validation::is_url(config.base_url.as_str()) {
            let errors = Errors::from(invalid_url("base_url", config.base_url.as_str()));
            return Err(Error::from(errors));
        }
        let timeout = Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        Ok(Self {
            http: HttpClient::new(timeout)?,
            base_url: config.base_url,
            token: config.token,
        })
    }

    /// Absolute URL for an API path, one percent-encoded segment per entry.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                Error::new(
                    fields! { "base_url" => self.base_url.as_str() },
                    "base url does not accept path segments",
                )
            })?;
            path.pop_if_empty();
            path.extend(["api", "v1"]);
            path.extend(segments);
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    /// Start a request with the client-wide auth header applied.
    pub(crate) fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        let mut request = self.http.request(method, url.as_str());
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        request
    }
}
