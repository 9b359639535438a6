//! # entitle-http
//!
//! The HTTP request layer for entitle services. Every request started
//! here comes back as either a plain response or a diagnostic error that
//! already carries the request method, URL, status code and a bounded
//! slice of the failing body.
//!
//! ## Design Philosophy
//!
//! - **Failures are classified at the edge**: a status the check rejects
//!   becomes a status-bearing [`entitle_errors::Error`] right where the
//!   response was read, so `http_status` works on anything above it
//! - **Hooks, not subclasses**: per-request `error_check` and
//!   `error_summary` closures replace the default classification without
//!   a new client type
//! - **Bounded diagnostics**: failing bodies are truncated to a byte cap
//!   before they are attached as context
//!
//! ## Usage
//!
//! ```no_run
//! use entitle_http::HttpClient;
//! use std::time::Duration;
//!
//! # async fn run() -> entitle_errors::Result<()> {
//! let client = HttpClient::new(Duration::from_secs(10))?;
//!
//! #[derive(serde::Deserialize)]
//! struct Health { ok: bool }
//!
//! let health: Health = client
//!     .get("https://api.example.com/health")
//!     .recv_json()
//!     .await?;
//! assert!(health.ok);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Modules
// =============================================================================

mod client;
mod request;

pub use client::{HttpClient, DEFAULT_ERROR_BODY_MAX};
pub use request::{ErrorContext, HttpResponse, RequestBuilder};

// The method type callers pass to `HttpClient::request`.
pub use reqwest::Method;
