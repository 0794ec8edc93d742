//! Request targets, response envelopes and summary projections

use crate::error::{ApiError, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// The five portal endpoints the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    AccountDetails,
    UsageDetails,
    ProfileDetails,
    BillPayment,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Login,
        Endpoint::AccountDetails,
        Endpoint::UsageDetails,
        Endpoint::ProfileDetails,
        Endpoint::BillPayment,
    ];

    /// Key of this endpoint's URL in the `server` config section
    pub fn config_key(self) -> &'static str {
        match self {
            Endpoint::Login => "loginUrl",
            Endpoint::AccountDetails => "AccountDetailsUrl",
            Endpoint::UsageDetails => "UsageDetailsUrl",
            Endpoint::ProfileDetails => "ProfileDetailsUrl",
            Endpoint::BillPayment => "BillPaymentUrl",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Login => "login",
            Endpoint::AccountDetails => "account details",
            Endpoint::UsageDetails => "usage details",
            Endpoint::ProfileDetails => "profile details",
            Endpoint::BillPayment => "bill payment",
        };
        f.write_str(name)
    }
}

/// Opaque access token handed out by the credential exchange
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header, in the lowercase scheme the portal issues
    pub fn authorization_header(&self) -> String {
        format!("bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Account identifiers returned by the account lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    pub accountno: String,
    pub telephone: String,
}

/// Either the decoded body as-is or its projected summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Raw(Value),
    Summary(T),
}

impl<T> Payload<T> {
    pub fn is_raw(&self) -> bool {
        matches!(self, Payload::Raw(_))
    }
}

/// Every portal response wraps its data in `dataBundle`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "dataBundle")]
    data_bundle: T,
}

fn decode<'a, T: Deserialize<'a>>(endpoint: Endpoint, body: &'a Value) -> Result<T> {
    T::deserialize(body).map_err(|source| ApiError::Decode { endpoint, source })
}

/// Non-empty text of a string or number field
fn field_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(rename = "accessToken", default)]
    access_token: Option<String>,
}

impl LoginResponse {
    pub(crate) fn into_token(self) -> Result<AccessToken> {
        match self.access_token {
            Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
            _ => Err(ApiError::MissingField {
                endpoint: Endpoint::Login,
                field: "accessToken",
            }),
        }
    }
}

impl AccountDetails {
    /// Take `accountno` and `telephoneno` from the first entry of `dataBundle`
    pub fn from_payload(body: &Value) -> Result<Self> {
        let endpoint = Endpoint::AccountDetails;
        let envelope: Envelope<Vec<serde_json::Map<String, Value>>> = decode(endpoint, body)?;
        let first = envelope
            .data_bundle
            .first()
            .ok_or(ApiError::MissingField {
                endpoint,
                field: "dataBundle[0]",
            })?;

        let accountno = field_text(first.get("accountno")).ok_or(ApiError::MissingField {
            endpoint,
            field: "accountno",
        })?;
        let telephone = field_text(first.get("telephoneno")).ok_or(ApiError::MissingField {
            endpoint,
            field: "telephoneno",
        })?;

        Ok(Self {
            accountno,
            telephone,
        })
    }
}

/// One usage bundle, rendered as `{"<name>": "<used>/<limit>"}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub name: String,
    pub used: String,
    pub limit: String,
}

impl Bundle {
    pub fn quota(&self) -> String {
        format!("{}/{}", self.used, self.limit)
    }
}

impl Serialize for Bundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.quota())?;
        map.end()
    }
}

/// Package name plus one entry per bundle, in portal order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub package_name: Value,
    pub bundles: Vec<Bundle>,
}

#[derive(Debug, Deserialize)]
struct UsageBundle {
    my_package_info: PackageInfo,
}

#[derive(Debug, Deserialize)]
struct PackageInfo {
    package_name: Value,
    #[serde(rename = "usageDetails", default)]
    usage_details: Vec<UsageEntry>,
}

#[derive(Debug, Deserialize)]
struct UsageEntry {
    name: Value,
    limit: Value,
    used: Value,
}

/// Strings render bare, everything else as its JSON text
fn quota_part(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl UsageSummary {
    pub fn from_payload(body: &Value) -> Result<Self> {
        let envelope: Envelope<UsageBundle> = decode(Endpoint::UsageDetails, body)?;
        let info = envelope.data_bundle.my_package_info;

        let bundles = info
            .usage_details
            .into_iter()
            .map(|entry| Bundle {
                name: quota_part(&entry.name),
                used: quota_part(&entry.used),
                limit: quota_part(&entry.limit),
            })
            .collect();

        Ok(Self {
            package_name: info.package_name,
            bundles,
        })
    }
}

/// Subscriber profile, renamed from the self-care field names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub subscriberid: Value,
    pub fullname: Value,
    #[serde(rename(deserialize = "subscriber_package_display"))]
    pub subscriber_package: Value,
    pub email: Value,
    pub phone: Value,
}

impl ProfileSummary {
    pub fn from_payload(body: &Value) -> Result<Self> {
        let envelope: Envelope<ProfileSummary> = decode(Endpoint::ProfileDetails, body)?;
        Ok(envelope.data_bundle)
    }
}

/// Outstanding balance and due date of the latest bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingSummary {
    #[serde(rename = "outstandingBalance")]
    pub outstanding_balance: Value,
    #[serde(rename = "paymentDueDate")]
    pub payment_due_date: Value,
}

#[derive(Debug, Deserialize)]
struct BillingBundle {
    #[serde(rename = "listofbillingInquiryType", default)]
    inquiries: Vec<BillingSummary>,
}

impl BillingSummary {
    pub fn from_payload(body: &Value) -> Result<Self> {
        let endpoint = Endpoint::BillPayment;
        let envelope: Envelope<BillingBundle> = decode(endpoint, body)?;
        envelope
            .data_bundle
            .inquiries
            .into_iter()
            .next()
            .ok_or(ApiError::MissingField {
                endpoint,
                field: "listofbillingInquiryType[0]",
            })
    }
}
