//! # entitle-client
//!
//! Typed client for the entitlement service: accounts, subscriptions and
//! login over the `/api/v1` REST surface.
//!
//! ## Design Philosophy
//!
//! - **Failures carry their context**: every operation wraps transport
//!   failures with the operation name and the ids involved, so one log
//!   line says what was being done to what
//! - **Validate before sending**: payloads are checked with
//!   `entitle-validation` first; a bad input never reaches the wire and
//!   still classifies as a 400
//! - **Status survives wrapping**: a missing account or a rejected login
//!   stays recognizable through [`entitle_errors::http_status`] no matter
//!   how many layers annotate it on the way up
//!
//! ## Usage
//!
//! ```no_run
//! use entitle_client::{Client, Config};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let base = "https://entitle.example.com".parse::<url::Url>()?;
//! let client = Client::new(Config::new(base).with_token("api-token"))?;
//!
//! let account = client.get_account("acct-42").await?;
//! println!("{} <{}>", account.name, account.email);
//!
//! let trial = client.new_trial_subscription(&account, "prod-team").await?;
//! println!("trial {} in state {}", trial.id, trial.state);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Modules
// =============================================================================

mod accounts;
mod client;
mod login;
mod model;
mod subscriptions;

pub use client::{Client, Config};
pub use login::LoginError;
pub use model::{
    Account, LoginRequest, LoginResult, PaginatedMeta, PaginationParams, PricingComponent,
    RawLoginError, State, Subscription, SubscriptionCreation, SubscriptionFilter,
    SubscriptionPage, ACCOUNT_ID_PATTERN,
};
pub use subscriptions::TRIAL_RATE_PLAN;
