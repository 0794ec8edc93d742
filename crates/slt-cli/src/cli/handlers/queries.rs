//! Usage, profile and bill handlers
//!
//! Each handler runs the session guard first, so nothing is sent unless a
//! token and subscriber id are stored. `all` prints the portal's response
//! untouched instead of the summary.

use crate::config::ConfigStore;
use crate::error::{CliError, Resource, Result};
use crate::output::json_output;
use crate::session::SessionManager;
use slt_sdk::PortalApi;
use tracing::debug;

pub async fn handle_usage<S: ConfigStore, P: PortalApi>(
    session: &SessionManager<S, P>,
    all: bool,
) -> Result<()> {
    let ready = session.require_ready().await?;
    debug!("Fetching usage for {}", ready.account.subscriber_id);

    let usage = session
        .portal()
        .fetch_usage(&ready.authorization, &ready.account.subscriber_id, all)
        .await
        .map_err(CliError::fetch(Resource::Usage))?;
    json_output(&usage)
}

pub async fn handle_account<S: ConfigStore, P: PortalApi>(
    session: &SessionManager<S, P>,
    all: bool,
) -> Result<()> {
    let ready = session.require_ready().await?;
    debug!("Fetching profile for {}", ready.account.subscriber_id);

    let profile = session
        .portal()
        .fetch_profile(&ready.authorization, &ready.account.subscriber_id, all)
        .await
        .map_err(CliError::fetch(Resource::Account))?;
    json_output(&profile)
}

pub async fn handle_bill<S: ConfigStore, P: PortalApi>(
    session: &SessionManager<S, P>,
    all: bool,
) -> Result<()> {
    let ready = session.require_ready().await?;
    let (telephone, accountno) = ready.billing_account()?;
    debug!("Fetching bill for account {}", accountno);

    let bill = session
        .portal()
        .fetch_billing(&ready.authorization, telephone, accountno, all)
        .await
        .map_err(CliError::fetch(Resource::Bill))?;
    json_output(&bill)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use crate::session::SessionError;
    use crate::testing::{anonymous_document, authenticated_document, ready_document, store_with, FakePortal};

    fn ready_session(portal: FakePortal) -> SessionManager<MemoryConfigStore, FakePortal> {
        SessionManager::new(store_with(ready_document()), portal)
    }

    #[tokio::test]
    async fn test_queries_need_login() {
        let session = SessionManager::new(store_with(anonymous_document()), FakePortal::new());

        for result in [
            handle_usage(&session, false).await,
            handle_account(&session, true).await,
            handle_bill(&session, false).await,
        ] {
            let err = result.unwrap_err();
            assert!(matches!(err, CliError::Session(SessionError::NotAuthenticated)));
            assert_eq!(err.exit_code(), 0);
        }
        assert_eq!(session.portal().calls(), 0);
    }

    #[tokio::test]
    async fn test_queries_need_resolved_account() {
        let session = SessionManager::new(store_with(authenticated_document()), FakePortal::new());

        for result in [
            handle_usage(&session, true).await,
            handle_account(&session, false).await,
            handle_bill(&session, true).await,
        ] {
            assert!(matches!(
                result,
                Err(CliError::Session(SessionError::AccountNotResolved))
            ));
        }
        assert_eq!(session.portal().calls(), 0);
    }

    #[tokio::test]
    async fn test_queries_send_stored_authorization() {
        let session = ready_session(FakePortal::new());

        handle_usage(&session, false).await.unwrap();
        handle_account(&session, true).await.unwrap();
        handle_bill(&session, false).await.unwrap();

        assert_eq!(session.portal().calls(), 3);
        assert!(session
            .portal()
            .authorizations()
            .iter()
            .all(|header| header == "bearer T"));
    }

    #[tokio::test]
    async fn test_remote_failure_maps_to_fetch_error() {
        let mut portal = FakePortal::new();
        portal.fail_queries = true;
        let session = ready_session(portal);

        let err = handle_usage(&session, false).await.unwrap_err();
        assert_eq!(err.to_string(), "Error fetching usage information!");
        assert_eq!(err.exit_code(), 0);

        let err = handle_account(&session, true).await.unwrap_err();
        assert_eq!(err.to_string(), "Error fetching account information!");

        let err = handle_bill(&session, false).await.unwrap_err();
        assert_eq!(err.to_string(), "Error fetching bill information!");
    }
}
