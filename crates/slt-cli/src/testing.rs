//! Test doubles shared by the unit tests

use crate::config::{Document, MemoryConfigStore};
use async_trait::async_trait;
use serde_json::{json, Value};
use slt_sdk::{
    AccessToken, AccountDetails, ApiError, BillingSummary, Bundle, Endpoint, Payload,
    PortalApi, ProfileSummary, StatusCode, UsageSummary,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Portal stand-in that counts every call it receives
pub(crate) struct FakePortal {
    pub token: Option<String>,
    pub account: Option<AccountDetails>,
    pub fail_queries: bool,
    calls: AtomicUsize,
    authorizations: Mutex<Vec<String>>,
}

impl FakePortal {
    pub fn new() -> Self {
        Self {
            token: Some("T".to_string()),
            account: Some(AccountDetails {
                accountno: "0034567".to_string(),
                telephone: "0711234567".to_string(),
            }),
            fail_queries: false,
            calls: AtomicUsize::new(0),
            authorizations: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn authorizations(&self) -> Vec<String> {
        self.authorizations.lock().unwrap().clone()
    }

    fn record(&self, authorization: Option<&str>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(authorization) = authorization {
            self.authorizations
                .lock()
                .unwrap()
                .push(authorization.to_string());
        }
    }

    fn query_result<T>(&self, endpoint: Endpoint, raw: bool, summary: T) -> slt_sdk::Result<Payload<T>> {
        if self.fail_queries {
            return Err(ApiError::Remote {
                endpoint,
                status: StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        if raw {
            Ok(Payload::Raw(raw_body()))
        } else {
            Ok(Payload::Summary(summary))
        }
    }
}

pub(crate) fn raw_body() -> Value {
    json!({"isSuccess": true, "dataBundle": {"untouched": [1, 2, 3]}})
}

#[async_trait]
impl PortalApi for FakePortal {
    async fn exchange_credentials(&self, _username: &str, _password: &str) -> slt_sdk::Result<AccessToken> {
        self.record(None);
        match &self.token {
            Some(token) => Ok(AccessToken::new(token.clone())),
            None => Err(ApiError::Remote {
                endpoint: Endpoint::Login,
                status: StatusCode::UNAUTHORIZED,
            }),
        }
    }

    async fn fetch_account_details(
        &self,
        authorization: &str,
        _username: &str,
    ) -> slt_sdk::Result<AccountDetails> {
        self.record(Some(authorization));
        self.account.clone().ok_or(ApiError::Remote {
            endpoint: Endpoint::AccountDetails,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        })
    }

    async fn fetch_usage(
        &self,
        authorization: &str,
        _subscriber_id: &str,
        raw: bool,
    ) -> slt_sdk::Result<Payload<UsageSummary>> {
        self.record(Some(authorization));
        let summary = UsageSummary {
            package_name: json!("ANY BEAT"),
            bundles: vec![Bundle {
                name: "Data".to_string(),
                used: "2GB".to_string(),
                limit: "10GB".to_string(),
            }],
        };
        self.query_result(Endpoint::UsageDetails, raw, summary)
    }

    async fn fetch_profile(
        &self,
        authorization: &str,
        subscriber_id: &str,
        raw: bool,
    ) -> slt_sdk::Result<Payload<ProfileSummary>> {
        self.record(Some(authorization));
        let summary = ProfileSummary {
            subscriberid: json!(subscriber_id),
            fullname: json!("A. Perera"),
            subscriber_package: json!("Fibre"),
            email: json!("a@example.com"),
            phone: json!("0711234567"),
        };
        self.query_result(Endpoint::ProfileDetails, raw, summary)
    }

    async fn fetch_billing(
        &self,
        authorization: &str,
        _telephone: &str,
        _account_no: &str,
        raw: bool,
    ) -> slt_sdk::Result<Payload<BillingSummary>> {
        self.record(Some(authorization));
        let summary = BillingSummary {
            outstanding_balance: json!("1500.00"),
            payment_due_date: json!("2024-02-01"),
        };
        self.query_result(Endpoint::BillPayment, raw, summary)
    }
}

/// Document with credentials and endpoints but no session
pub(crate) fn anonymous_document() -> Document {
    serde_json::from_value(json!({
        "server": {
            "loginUrl": "http://portal/login",
            "AccountDetailsUrl": "http://portal/account",
            "UsageDetailsUrl": "http://portal/usage",
            "ProfileDetailsUrl": "http://portal/profile",
            "BillPaymentUrl": "http://portal/bill"
        },
        "authentication": {"username": "user@example.com", "password": "pw"},
        "account": {}
    }))
    .unwrap()
}

pub(crate) fn authenticated_document() -> Document {
    let mut document = anonymous_document();
    document.set(
        crate::config::Section::Authentication,
        crate::config::AUTHORIZATION_HEADER,
        "bearer T",
    );
    document
}

pub(crate) fn ready_document() -> Document {
    use crate::config::{Section, ACCOUNT_NO, SUBSCRIBER_ID, TELEPHONE};
    let mut document = authenticated_document();
    document.set(Section::Account, ACCOUNT_NO, "0034567");
    document.set(Section::Account, TELEPHONE, "0711234567");
    document.set(Section::Account, SUBSCRIBER_ID, "94711234567");
    document
}

pub(crate) fn store_with(document: Document) -> MemoryConfigStore {
    MemoryConfigStore::new(document)
}
