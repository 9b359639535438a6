//! Subscription operations and the trial-signup orchestration

use crate::client::Client;
use crate::model::{
    Account, Subscription, SubscriptionCreation, SubscriptionFilter, SubscriptionPage,
};
use entitle_errors::{fields, http_status, wrap, Error, Result, ResultExt};
use entitle_http::Method;
use entitle_validation::{invalid_empty, is_empty, Errors, Validate};

/// Rate plan assigned to subscriptions opened through
/// [`new_trial_subscription`](Client::new_trial_subscription).
pub const TRIAL_RATE_PLAN: &str = "free-trial";

impl Client {
    /// Open a new subscription.
    ///
    /// `POST /api/v1/subscriptions`; returns the subscription as stored,
    /// including its server-assigned id and state.
    pub async fn create_subscription(
        &self,
        creation: &SubscriptionCreation,
    ) -> Result<Subscription> {
        let context = fields! {
            "op" => "create_subscription",
            "account_id" => creation.account_id.clone(),
            "product_id" => creation.product_id.clone(),
        };
        if let Err(invalid) = creation.validate() {
            return Err(wrap(Error::from(invalid), context));
        }
        let url = self.endpoint(&["subscriptions"])?;
        match self.request(Method::POST, &url).send_json(creation) {
            Ok(request) => request.recv_json().await.wrap(context),
            Err(err) => Err(wrap(err, context)),
        }
    }

    /// Fetch a subscription by id.
    ///
    /// `GET /api/v1/subscriptions/{id}`.
    pub async fn get_subscription(&self, id: &str) -> Result<Subscription> {
        let context = fields! {
            "op" => "get_subscription",
            "subscription_id" => id,
        };
        if is_empty(id) {
            let errors = Errors::from(invalid_empty("id"));
            return Err(wrap(Error::from(errors), context));
        }
        let url = self.endpoint(&["subscriptions", id])?;
        self.request(Method::GET, &url)
            .recv_json()
            .await
            .wrap(context)
    }

    /// List subscriptions for an account, one page at a time.
    ///
    /// `GET /api/v1/subscriptions?account_id=..` plus optional partner,
    /// origin and pagination parameters from the filter.
    pub async fn list_subscriptions(
        &self,
        filter: &SubscriptionFilter,
    ) -> Result<SubscriptionPage> {
        let context = fields! {
            "op" => "list_subscriptions",
            "account_id" => filter.account_id.clone(),
        };
        if let Err(invalid) = filter.validate() {
            return Err(wrap(Error::from(invalid), context));
        }
        let mut url = self.endpoint(&["subscriptions"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("account_id", &filter.account_id);
            if let Some(partner) = &filter.partner_account_id {
                query.append_pair("partner_account_id", partner);
            }
            if let Some(origin) = &filter.origin {
                query.append_pair("origin", origin);
            }
            if let Some(page) = &filter.pagination {
                query.append_pair("page", &page.page.to_string());
                query.append_pair("page_size", &page.page_size.to_string());
            }
        }
        self.request(Method::GET, &url)
            .recv_json()
            .await
            .wrap(context)
    }

    /// Make sure `account` exists, then open a trial subscription for it.
    ///
    /// A 404 on the account lookup means the account is created first; any
    /// other lookup failure is passed through. The trial is opened on the
    /// [`TRIAL_RATE_PLAN`] rate plan.
    pub async fn new_trial_subscription(
        &self,
        account: &Account,
        product_id: &str,
    ) -> Result<Subscription> {
        let context = fields! {
            "op" => "new_trial_subscription",
            "account_id" => account.id.clone(),
            "product_id" => product_id,
        };
        if is_empty(product_id) {
            let errors = Errors::from(invalid_empty("product_id"));
            return Err(wrap(Error::from(errors), context));
        }

        if let Err(err) = self.get_account(&account.id).await {
            if http_status(Some(&err)) != (404, true) {
                return Err(wrap(err, context));
            }
            tracing::debug!(account_id = %account.id, "account missing, creating it for the trial");
            if let Err(err) = self.create_account(account).await {
                return Err(wrap(err, context));
            }
        }

        let creation = SubscriptionCreation {
            name: format!("{product_id} trial"),
            account_id: account.id.clone(),
            product_id: product_id.to_string(),
            rate_plan: TRIAL_RATE_PLAN.to_string(),
            pricing_components: Vec::new(),
        };
        self.create_subscription(&creation).await.wrap(context)
    }
}
