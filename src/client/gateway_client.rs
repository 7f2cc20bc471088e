use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use log::debug;
use reqwest::{blocking::{Client, Response}, Url};

use crate::client::Teller;
use crate::core::{AccountId, Amount, Transaction};
use crate::server::dto::{BalanceResponse, ErrorBody, TransactRequest};

/// Blocking HTTP client for the teller gateway.
pub struct GatewayClient {
    base: Url,
    http: Client
}

impl GatewayClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("invalid gateway url: {}", base_url))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()?;
        return Ok(GatewayClient { base, http });
    }

    /// `<base>/accounts/<id>[/<tail>]`, with the id percent-encoded.
    fn endpoint(&self, id: &AccountId, tail: Option<&str>) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("gateway url cannot be a base: {}", self.base))?
            .pop_if_empty()
            .push("accounts")
            .push(id.as_str())
            .extend(tail);
        return Ok(url);
    }

    fn check(response: Response) -> anyhow::Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match response.json::<ErrorBody>() {
            Ok(body) => bail!("{}", body.message),
            Err(_) => bail!("gateway answered {}", status)
        }
    }
}

impl Teller for GatewayClient {
    fn verify_user(&self, id: &AccountId) -> anyhow::Result<()> {
        let url = self.endpoint(id, None)?;
        debug!("GET {}", url);
        GatewayClient::check(self.http.get(url).send()?)?;
        return Ok(());
    }

    fn balance(&self, id: &AccountId) -> anyhow::Result<Amount> {
        let url = self.endpoint(id, Some("balance"))?;
        debug!("GET {}", url);
        let body: BalanceResponse = GatewayClient::check(self.http.get(url).send()?)?.json()?;
        return Ok(body.balance);
    }

    fn transact(&self, transaction: &Transaction) -> anyhow::Result<Amount> {
        let url = self.endpoint(&transaction.account_id, Some("transactions"))?;
        let request = TransactRequest { kind: transaction.kind, amount: transaction.amount };
        debug!("POST {} {:?}", url, request);
        let body: BalanceResponse = GatewayClient::check(self.http.post(url).json(&request).send()?)?.json()?;
        return Ok(body.balance);
    }
}
