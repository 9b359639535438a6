//! Login against the entitlement service

use crate::client::Client;
use crate::model::{LoginRequest, LoginResult, RawLoginError};
use entitle_errors::{fields, wrap, Error};
use entitle_http::{ErrorContext, Method};
use entitle_validation::Validate;
use std::fmt;

/// Bytes of a login reject body kept for diagnostics and raw parsing.
///
/// Reject bodies carry per-field validation messages, so the cap is wider
/// than the client-wide default.
const LOGIN_BODY_MAX: usize = 2048;

/// A failed login.
///
/// Embeds the diagnostic error, so `entitle_errors::http_status` recognizes
/// the reject status through the `source()` chain, and the parsed raw body
/// when the service sent one.
#[derive(Debug)]
pub struct LoginError {
    /// The underlying diagnostic error.
    pub source: Error,
    /// Parsed reject body, when one could be parsed.
    pub raw: Option<RawLoginError>,
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        if let Some(raw) = &self.raw {
            write!(f, " (raw: {:?})", raw)?;
        }
        Ok(())
    }
}

impl std::error::Error for LoginError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl Client {
    /// Authenticate and obtain a bearer token.
    ///
    /// `POST /api/v1/login`. A rejected login yields [`LoginError`] carrying
    /// both the classified diagnostic error and the service's raw reject
    /// body, which spells out what the service disliked about the
    /// credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, LoginError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let context = fields! {
            "op" => "login",
            "username" => username,
        };
        if let Err(invalid) = request.validate() {
            return Err(LoginError {
                source: wrap(Error::from(invalid), context),
                raw: None,
            });
        }

        let url = match self.endpoint(&["login"]) {
            Ok(url) => url,
            Err(err) => {
                return Err(LoginError {
                    source: wrap(err, context),
                    raw: None,
                })
            }
        };

        let outcome = match self
            .request(Method::POST, &url)
            .error_body_max(LOGIN_BODY_MAX)
            .error_summary(login_summary)
            .send_json(&request)
        {
            Ok(started) => started.recv_json::<LoginResult>().await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(result) => Ok(result),
            Err(err) => {
                // fields() reads the newest layer, so pull the body off the
                // transport error before the op wrap goes on
                let raw = err
                    .fields()
                    .get("response_body")
                    .and_then(|value| value.as_str())
                    .and_then(|body| serde_json::from_str(body).ok());
                Err(LoginError {
                    source: wrap(err, context),
                    raw,
                })
            }
        }
    }
}

/// Summarize a login reject from its raw body.
fn login_summary(context: &ErrorContext) -> String {
    match serde_json::from_str::<RawLoginError>(&context.body) {
        Ok(RawLoginError {
            detail: Some(detail),
            ..
        }) => format!("login rejected: {detail}"),
        _ => format!("login rejected with status {}", context.status),
    }
}
