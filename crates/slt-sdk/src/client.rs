//! HTTP client for the SLT self-care portal
//!
//! Every call issues exactly one request. Success means `200 OK`; any other
//! status becomes [`ApiError::Remote`]. There are no retries and, unless the
//! builder is given one, no timeout beyond what the transport applies.
//!
//! ```rust,no_run
//! use slt_sdk::{ClientBuilder, Endpoints, PortalApi};
//!
//! # async fn example(endpoints: Endpoints) -> slt_sdk::Result<()> {
//! let client = ClientBuilder::new(endpoints).build()?;
//! let token = client.exchange_credentials("user@example.com", "secret").await?;
//! let header = token.authorization_header();
//! let details = client.fetch_account_details(&header, "user@example.com").await?;
//! println!("{}", details.telephone);
//! # Ok(())
//! # }
//! ```

use crate::error::{ApiError, Result};
use crate::headers::HeaderProfile;
use crate::types::{
    AccessToken, AccountDetails, BillingSummary, Endpoint, LoginResponse, Payload,
    ProfileSummary, UsageSummary,
};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Channel the portal records web logins under
pub const LOGIN_CHANNEL: &str = "WEB";

/// URLs of the portal endpoints; any of them may be left unset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub login: Option<String>,
    pub account_details: Option<String>,
    pub usage_details: Option<String>,
    pub profile_details: Option<String>,
    pub bill_payment: Option<String>,
}

impl Endpoints {
    /// Build the set from a lookup keyed by [`Endpoint`]
    pub fn from_fn(mut lookup: impl FnMut(Endpoint) -> Option<String>) -> Self {
        Self {
            login: lookup(Endpoint::Login),
            account_details: lookup(Endpoint::AccountDetails),
            usage_details: lookup(Endpoint::UsageDetails),
            profile_details: lookup(Endpoint::ProfileDetails),
            bill_payment: lookup(Endpoint::BillPayment),
        }
    }

    /// URL of `endpoint`, or [`ApiError::MissingEndpoint`] when unset
    pub fn url(&self, endpoint: Endpoint) -> Result<&str> {
        let url = match endpoint {
            Endpoint::Login => &self.login,
            Endpoint::AccountDetails => &self.account_details,
            Endpoint::UsageDetails => &self.usage_details,
            Endpoint::ProfileDetails => &self.profile_details,
            Endpoint::BillPayment => &self.bill_payment,
        };
        url.as_deref().ok_or(ApiError::MissingEndpoint(endpoint))
    }
}

/// Remote capabilities of the portal.
///
/// `authorization` is the full `Authorization` header value as persisted
/// after login (`"bearer <token>"`).
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// Trade username and password for an access token
    async fn exchange_credentials(&self, username: &str, password: &str) -> Result<AccessToken>;

    /// Look up the account number and telephone registered to `username`
    async fn fetch_account_details(
        &self,
        authorization: &str,
        username: &str,
    ) -> Result<AccountDetails>;

    async fn fetch_usage(
        &self,
        authorization: &str,
        subscriber_id: &str,
        raw: bool,
    ) -> Result<Payload<UsageSummary>>;

    async fn fetch_profile(
        &self,
        authorization: &str,
        subscriber_id: &str,
        raw: bool,
    ) -> Result<Payload<ProfileSummary>>;

    async fn fetch_billing(
        &self,
        authorization: &str,
        telephone: &str,
        account_no: &str,
        raw: bool,
    ) -> Result<Payload<BillingSummary>>;
}

/// HTTP implementation of [`PortalApi`]
#[derive(Debug, Clone)]
pub struct PortalClient {
    http_client: reqwest::Client,
    endpoints: Endpoints,
}

impl PortalClient {
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Send a prepared request and decode the body of a `200 OK` answer
    async fn send(&self, endpoint: Endpoint, request: RequestBuilder) -> Result<Value> {
        debug!("Sending {} request", endpoint);
        let response = request.send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            debug!("{} request failed with status {}", endpoint, status);
            return Err(ApiError::Remote { endpoint, status });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }

    async fn get(
        &self,
        endpoint: Endpoint,
        profile: HeaderProfile,
        authorization: &str,
        query: &[(&str, &str)],
    ) -> Result<Value> {
        let request = self
            .http_client
            .get(self.endpoints.url(endpoint)?)
            .headers(profile.headers(Some(authorization))?)
            .query(query);
        self.send(endpoint, request).await
    }
}

/// Pass the body through untouched, or project it into a summary
fn shape<T>(body: Value, raw: bool, project: impl FnOnce(&Value) -> Result<T>) -> Result<Payload<T>> {
    if raw {
        Ok(Payload::Raw(body))
    } else {
        project(&body).map(Payload::Summary)
    }
}

#[async_trait]
impl PortalApi for PortalClient {
    async fn exchange_credentials(&self, username: &str, password: &str) -> Result<AccessToken> {
        let form = [
            ("username", username),
            ("password", password),
            ("channelID", LOGIN_CHANNEL),
        ];
        let request = self
            .http_client
            .post(self.endpoints.url(Endpoint::Login)?)
            .headers(HeaderProfile::Portal.headers(None)?)
            .form(&form);

        let body = self.send(Endpoint::Login, request).await?;
        let response: LoginResponse =
            serde_json::from_value(body).map_err(|source| ApiError::Decode {
                endpoint: Endpoint::Login,
                source,
            })?;
        response.into_token()
    }

    async fn fetch_account_details(
        &self,
        authorization: &str,
        username: &str,
    ) -> Result<AccountDetails> {
        let body = self
            .get(
                Endpoint::AccountDetails,
                HeaderProfile::Portal,
                authorization,
                &[("username", username)],
            )
            .await?;
        AccountDetails::from_payload(&body)
    }

    async fn fetch_usage(
        &self,
        authorization: &str,
        subscriber_id: &str,
        raw: bool,
    ) -> Result<Payload<UsageSummary>> {
        let body = self
            .get(
                Endpoint::UsageDetails,
                HeaderProfile::Portal,
                authorization,
                &[("subscriberID", subscriber_id)],
            )
            .await?;
        shape(body, raw, UsageSummary::from_payload)
    }

    async fn fetch_profile(
        &self,
        authorization: &str,
        subscriber_id: &str,
        raw: bool,
    ) -> Result<Payload<ProfileSummary>> {
        let body = self
            .get(
                Endpoint::ProfileDetails,
                HeaderProfile::SelfCare,
                authorization,
                &[("subscriberID", subscriber_id)],
            )
            .await?;
        shape(body, raw, ProfileSummary::from_payload)
    }

    async fn fetch_billing(
        &self,
        authorization: &str,
        telephone: &str,
        account_no: &str,
        raw: bool,
    ) -> Result<Payload<BillingSummary>> {
        let body = self
            .get(
                Endpoint::BillPayment,
                HeaderProfile::SelfCare,
                authorization,
                &[("telephoneNo", telephone), ("accountNo", account_no)],
            )
            .await?;
        shape(body, raw, BillingSummary::from_payload)
    }
}

/// Builder for constructing a [`PortalClient`]
#[derive(Debug)]
pub struct ClientBuilder {
    endpoints: Endpoints,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl ClientBuilder {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            timeout: None,
            connect_timeout: None,
        }
    }

    /// Set the request timeout (unset by default)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout (unset by default)
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<PortalClient> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(PortalClient {
            http_client: builder.build()?,
            endpoints: self.endpoints,
        })
    }
}
