//! Account operations

use crate::client::Client;
use crate::model::{check_account_id, Account};
use entitle_errors::{fields, wrap, Error, Result, ResultExt};
use entitle_http::Method;
use entitle_validation::Validate;

impl Client {
    /// Create or replace an account.
    ///
    /// `PUT /api/v1/accounts/{id}` with the account as the body; returns
    /// the account as stored by the service.
    pub async fn create_account(&self, account: &Account) -> Result<Account> {
        let context = fields! {
            "op" => "create_account",
            "account_id" => account.id.clone(),
        };
        if let Err(invalid) = account.validate() {
            return Err(wrap(Error::from(invalid), context));
        }
        let url = self.endpoint(&["accounts", &account.id])?;
        match self.request(Method::PUT, &url).send_json(account) {
            Ok(request) => request.recv_json().await.wrap(context),
            Err(err) => Err(wrap(err, context)),
        }
    }

    /// Fetch an account by id.
    ///
    /// `GET /api/v1/accounts/{id}`; a missing account comes back as a
    /// 404-classified error.
    pub async fn get_account(&self, id: &str) -> Result<Account> {
        let context = fields! {
            "op" => "get_account",
            "account_id" => id,
        };
        if let Err(invalid) = check_account_id(id) {
            return Err(wrap(Error::from(invalid), context));
        }
        let url = self.endpoint(&["accounts", id])?;
        self.request(Method::GET, &url)
            .recv_json()
            .await
            .wrap(context)
    }
}
