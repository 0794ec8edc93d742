//! Authentication lifecycle
//!
//! Login state lives entirely in the config document. It is read once per
//! call into a [`SessionState`]:
//!
//! - `Anonymous`: no `authorization_header`
//! - `Authenticated`: header present, no `subscriberID`
//! - `Ready`: header and `subscriberID` present
//!
//! Guards run before any request is sent, so a missing login never costs a
//! network round trip.

use crate::config::{
    ConfigError, ConfigStore, Document, Section, ACCOUNT_NO, AUTHORIZATION_HEADER,
    SUBSCRIBER_ID, TELEPHONE,
};
use serde_json::Value;
use slt_sdk::{AccountDetails, ApiError, Endpoint, PortalApi};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Country code that replaces the trunk prefix of a local number
pub const COUNTRY_CODE: &str = "94";

/// Session-level failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Already logged in, logout first to relogin!")]
    AlreadyLoggedIn,

    #[error("Login failed!")]
    LoginFailed(#[source] ApiError),

    #[error("Error fetching account information!")]
    AccountResolutionFailed(#[source] ApiError),

    #[error("Please log in and provide account details.")]
    NotAuthenticated,

    #[error("Please log in and provide account details.")]
    AccountNotResolved,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Account identifiers cached after a successful lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccount {
    pub subscriber_id: String,
    pub telephone: Option<String>,
    pub accountno: Option<String>,
}

/// Login state derived from a loaded document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated {
        authorization: String,
    },
    Ready {
        authorization: String,
        account: ResolvedAccount,
    },
}

impl SessionState {
    /// Key presence alone decides the state; non-string values are kept
    /// as their JSON text.
    pub fn from_document(document: &Document) -> Self {
        let Some(authorization) = stored_text(document, Section::Authentication, AUTHORIZATION_HEADER)
        else {
            return SessionState::Anonymous;
        };

        match stored_text(document, Section::Account, SUBSCRIBER_ID) {
            Some(subscriber_id) => SessionState::Ready {
                authorization,
                account: ResolvedAccount {
                    subscriber_id,
                    telephone: document
                        .get_str(Section::Account, TELEPHONE)
                        .map(str::to_string),
                    accountno: document
                        .get_str(Section::Account, ACCOUNT_NO)
                        .map(str::to_string),
                },
            },
            None => SessionState::Authenticated { authorization },
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, SessionState::Anonymous)
    }

    pub fn authorization(&self) -> Option<&str> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated { authorization }
            | SessionState::Ready { authorization, .. } => Some(authorization),
        }
    }
}

/// Credentials needed by usage, profile and bill queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadySession {
    pub authorization: String,
    pub account: ResolvedAccount,
}

impl ReadySession {
    /// Telephone and account number, both required by the billing query
    pub fn billing_account(&self) -> Result<(&str, &str)> {
        match (&self.account.telephone, &self.account.accountno) {
            (Some(telephone), Some(accountno)) => Ok((telephone, accountno)),
            _ => Err(SessionError::AccountNotResolved),
        }
    }
}

fn stored_text(document: &Document, section: Section, key: &str) -> Option<String> {
    document.section(section).get(key).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// A missing endpoint URL is a config problem, not a portal failure
fn portal_error(err: ApiError, wrap: fn(ApiError) -> SessionError) -> SessionError {
    match err {
        ApiError::MissingEndpoint(endpoint) => ConfigError::missing_endpoint(endpoint).into(),
        other => wrap(other),
    }
}

/// `0711234567` -> `94711234567`: drop the leading digit, prepend the country code
pub fn derive_subscriber_id(telephone: &str) -> String {
    let mut chars = telephone.chars();
    chars.next();
    format!("{COUNTRY_CODE}{}", chars.as_str())
}

/// Forget the token and every derived account identifier.
///
/// Valid in any state and idempotent.
pub async fn logout<S: ConfigStore>(store: &S) -> std::result::Result<(), ConfigError> {
    store
        .update(|document| {
            document.remove(Section::Authentication, AUTHORIZATION_HEADER);
            for key in [TELEPHONE, ACCOUNT_NO, SUBSCRIBER_ID] {
                document.remove(Section::Account, key);
            }
        })
        .await?;
    info!("Cleared stored session");
    Ok(())
}

/// Owns the store and the portal for one command invocation
pub struct SessionManager<S, P> {
    store: S,
    portal: P,
}

impl<S: ConfigStore, P: PortalApi> SessionManager<S, P> {
    pub fn new(store: S, portal: P) -> Self {
        Self { store, portal }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn portal(&self) -> &P {
        &self.portal
    }

    pub async fn state(&self) -> Result<SessionState> {
        let document = self.store.load().await?;
        Ok(SessionState::from_document(&document))
    }

    /// Exchange credentials for a token and persist it as `authorization_header`
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        if self.state().await?.is_authenticated() {
            debug!("Refusing login: already authenticated");
            return Err(SessionError::AlreadyLoggedIn);
        }

        let token = self
            .portal
            .exchange_credentials(username, password)
            .await
            .map_err(|e| {
                warn!("Credential exchange failed: {}", e);
                portal_error(e, SessionError::LoginFailed)
            })?;

        self.store
            .set(
                Section::Authentication,
                AUTHORIZATION_HEADER,
                Value::String(token.authorization_header()),
            )
            .await?;

        info!("Logged in as {}", username);
        Ok(())
    }

    /// [`Self::login`] with the username and password from the config document
    pub async fn login_with_stored_credentials(&self) -> Result<()> {
        let document = self.store.load().await?;
        if SessionState::from_document(&document).is_authenticated() {
            return Err(SessionError::AlreadyLoggedIn);
        }
        let credentials = document.credentials()?;
        self.login(&credentials.username, &credentials.password).await
    }

    /// Look up the account and persist `accountno`, `telephone` and
    /// `subscriberID` together. On failure nothing is written.
    pub async fn resolve_account(&self) -> Result<ResolvedAccount> {
        let document = self.store.load().await?;
        let state = SessionState::from_document(&document);
        let authorization = state.authorization().ok_or(SessionError::NotAuthenticated)?;
        let username = document.credentials()?.username;

        let details = self
            .portal
            .fetch_account_details(authorization, &username)
            .await
            .map_err(|e| {
                warn!("Account lookup failed: {}", e);
                portal_error(e, SessionError::AccountResolutionFailed)
            })?;

        let AccountDetails {
            accountno,
            telephone,
        } = details;
        if telephone.is_empty() || accountno.is_empty() {
            let field = if telephone.is_empty() {
                "telephoneno"
            } else {
                "accountno"
            };
            return Err(SessionError::AccountResolutionFailed(
                ApiError::MissingField {
                    endpoint: Endpoint::AccountDetails,
                    field,
                },
            ));
        }

        let subscriber_id = derive_subscriber_id(&telephone);
        let account = ResolvedAccount {
            subscriber_id: subscriber_id.clone(),
            telephone: Some(telephone.clone()),
            accountno: Some(accountno.clone()),
        };

        self.store
            .update(move |document| {
                document.set(Section::Account, ACCOUNT_NO, accountno);
                document.set(Section::Account, TELEPHONE, telephone);
                document.set(Section::Account, SUBSCRIBER_ID, subscriber_id);
            })
            .await?;

        info!("Resolved subscriber {}", account.subscriber_id);
        Ok(account)
    }

    /// Guard for usage, profile and bill queries
    pub async fn require_ready(&self) -> Result<ReadySession> {
        match self.state().await? {
            SessionState::Anonymous => Err(SessionError::NotAuthenticated),
            SessionState::Authenticated { .. } => Err(SessionError::AccountNotResolved),
            SessionState::Ready {
                authorization,
                account,
            } => Ok(ReadySession {
                authorization,
                account,
            }),
        }
    }

    pub async fn logout(&self) -> Result<()> {
        logout(&self.store).await?;
        Ok(())
    }
}
