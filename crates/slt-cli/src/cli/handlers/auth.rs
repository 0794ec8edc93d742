//! Login and logout handlers

use crate::config::ConfigStore;
use crate::error::Result;
use crate::output::{print_error, print_success};
use crate::session::{self, SessionError, SessionManager};
use slt_sdk::PortalApi;
use tracing::{debug, warn};

/// Handle login command.
///
/// A failed account lookup after a successful login is reported but does
/// not fail the command; the token stays stored. Config problems still do.
pub async fn handle_login<S: ConfigStore, P: PortalApi>(
    session: &SessionManager<S, P>,
) -> Result<()> {
    debug!("Starting login process");

    session.login_with_stored_credentials().await?;
    print_success("Login successful.");

    match session.resolve_account().await {
        Ok(account) => {
            debug!("Resolved subscriber {}", account.subscriber_id);
            print_success("Account information fetched and saved!");
        }
        Err(SessionError::Config(e)) => return Err(e.into()),
        Err(e) => {
            warn!("Account resolution failed: {:?}", e);
            print_error(&e.to_string());
        }
    }

    Ok(())
}

/// Handle logout command
pub async fn handle_logout<S: ConfigStore>(store: &S) -> Result<()> {
    session::logout(store).await?;
    print_success("Logout successful!");
    Ok(())
}
