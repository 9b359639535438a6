//! Wire types for the entitlement service

use chrono::{DateTime, Utc};
use entitle_validation::{
    invalid_email, invalid_empty, invalid_pattern, is_email, is_empty, matches, Errors, Validate,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Subscription state
// =============================================================================

/// Lifecycle state of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Active,
    Expired,
    Cancelled,
    Preparing,
    Failed,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            State::Active => "active",
            State::Expired => "expired",
            State::Cancelled => "cancelled",
            State::Preparing => "preparing",
            State::Failed => "failed",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Account ids travel as URL path segments, so they are restricted to a
/// URL-safe slug.
pub const ACCOUNT_ID_PATTERN: &str = "^[A-Za-z0-9][A-Za-z0-9_-]*$";

/// An entitlement account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Check an id on its own, for operations that address an account by id
/// without the rest of the record.
pub(crate) fn check_account_id(id: &str) -> Result<(), Errors> {
    let mut errors = Errors::new();
    if is_empty(id) {
        errors.push(invalid_empty("id"));
    } else if !matches(id, ACCOUNT_ID_PATTERN) {
        errors.push(invalid_pattern("id", id, ACCOUNT_ID_PATTERN));
    }
    errors.into_result()
}

impl Validate for Account {
    fn validate(&self) -> Result<(), Errors> {
        let mut errors = Errors::new();
        if let Err(id_errors) = check_account_id(&self.id) {
            for invalid in id_errors {
                errors.push(invalid);
            }
        }
        if is_empty(&self.name) {
            errors.push(invalid_empty("name"));
        }
        if !is_email(&self.email) {
            errors.push(invalid_email("email", &self.email));
        }
        errors.into_result()
    }
}

// =============================================================================
// Subscriptions
// =============================================================================

/// One metered dimension of a subscription, e.g. seats or nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingComponent {
    pub name: String,
    pub value: i64,
}

/// A subscription as the service reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub name: String,
    pub account_id: String,
    pub product_id: String,
    pub rate_plan: String,
    pub state: State,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pricing_components: Vec<PricingComponent>,
}

/// Payload for opening a new subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCreation {
    pub name: String,
    pub account_id: String,
    pub product_id: String,
    pub rate_plan: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pricing_components: Vec<PricingComponent>,
}

impl Validate for SubscriptionCreation {
    fn validate(&self) -> Result<(), Errors> {
        let mut errors = Errors::new();
        if is_empty(&self.name) {
            errors.push(invalid_empty("name"));
        }
        if let Err(id_errors) = check_account_id(&self.account_id) {
            for invalid in id_errors {
                errors.push(invalid);
            }
        }
        if is_empty(&self.product_id) {
            errors.push(invalid_empty("product_id"));
        }
        if is_empty(&self.rate_plan) {
            errors.push(invalid_empty("rate_plan"));
        }
        errors.into_result()
    }
}

/// Filters for [`list_subscriptions`](crate::Client::list_subscriptions).
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    pub account_id: String,
    pub partner_account_id: Option<String>,
    pub origin: Option<String>,
    pub pagination: Option<PaginationParams>,
}

impl Validate for SubscriptionFilter {
    fn validate(&self) -> Result<(), Errors> {
        let mut errors = Errors::new();
        if is_empty(&self.account_id) {
            errors.push(invalid_empty("account_id"));
        }
        errors.into_result()
    }
}

/// Which page of a listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u32,
    pub page_size: u32,
}

/// Listing metadata returned alongside paginated results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedMeta {
    #[serde(default)]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

/// One page of a subscription listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPage {
    #[serde(flatten)]
    pub meta: PaginatedMeta,
    pub results: Vec<Subscription>,
}

// =============================================================================
// Login
// =============================================================================

/// Credentials posted to the login endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Keep the password out of debug output and logs.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), Errors> {
        let mut errors = Errors::new();
        if is_empty(&self.username) {
            errors.push(invalid_empty("username"));
        }
        if self.password.is_empty() {
            errors.push(invalid_empty("password"));
        }
        errors.into_result()
    }
}

/// Response of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    /// Bearer token for the authenticated user, passed through opaquely.
    pub token: String,
}

/// The raw reject body the login endpoint sends.
///
/// `detail` carries the human-readable reason; the per-field vectors are
/// populated when the reject was a validation failure on the service side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLoginError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub username: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub password: Vec<String>,
}

// =============================================================================
// Tests
// =============================================================================
