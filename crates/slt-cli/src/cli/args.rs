use crate::cli::handlers;
use crate::config::{ConfigStore, FileConfigStore};
use crate::error::{CliError, Result};
use crate::output;
use crate::session::SessionManager;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{OffLevel, Verbosity};
use slt_sdk::ClientBuilder;
use std::error::Error as _;
use std::process::ExitCode;
use tracing::debug;

/// Action to perform
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Log in with the configured credentials and fetch account details
    Login,
    /// Show data usage per bundle
    Usage,
    /// Show the subscriber profile
    Account,
    /// Show the outstanding bill
    Bill,
    /// Forget the stored token and account details
    Logout,
}

/// Command Line Tool to fetch usage, bill and account information for SLT users
#[derive(Parser, Debug)]
#[command(
    name = "sltcli",
    version,
    about = "Command Line Tool to fetch usage, bill and account information for SLT users",
    long_about = "Command Line Tool to fetch usage, bill and account information for SLT users.

Credentials and portal URLs are read from config.json in the per-user config
directory. The file is created from a template on first run.

  sltcli login        # Log in and fetch account details
  sltcli usage        # Data usage per bundle
  sltcli account      # Subscriber profile
  sltcli bill         # Outstanding balance and due date
  sltcli logout       # Forget the stored session"
)]
pub struct Args {
    /// Action to perform
    #[arg(value_enum)]
    pub action: Action,

    /// Output all the details in json
    #[arg(short, long)]
    pub all: bool,

    #[command(flatten)]
    pub verbosity: Verbosity<OffLevel>,
}

impl Args {
    /// Execute the action against the default config file and report the outcome
    pub async fn run(self) -> ExitCode {
        let result = match FileConfigStore::default_location() {
            Ok(store) => {
                debug!("Using config at {}", store.path().display());
                self.execute(store).await
            }
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                report(&e);
                ExitCode::from(e.exit_code())
            }
        }
    }

    /// Dispatch the action using `store`
    pub async fn execute<S: ConfigStore>(&self, store: S) -> Result<()> {
        let document = store.load().await?;

        if self.action == Action::Logout {
            return handlers::auth::handle_logout(&store).await;
        }

        let portal = ClientBuilder::new(document.endpoints())
            .build()
            .map_err(CliError::Client)?;
        let session = SessionManager::new(store, portal);

        match self.action {
            Action::Login => handlers::auth::handle_login(&session).await,
            Action::Usage => handlers::queries::handle_usage(&session, self.all).await,
            Action::Account => handlers::queries::handle_account(&session, self.all).await,
            Action::Bill => handlers::queries::handle_bill(&session, self.all).await,
            Action::Logout => handlers::auth::handle_logout(session.store()).await,
        }
    }
}

/// Print the user-facing message for a failed command
fn report(err: &CliError) {
    let mut source = err.source();
    while let Some(cause) = source {
        debug!("Caused by: {}", cause);
        source = cause.source();
    }

    if err.exit_code() == 0 {
        output::print_info(&err.to_string());
    } else {
        output::print_error(&err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_action_and_all_flag() {
        let args = Args::parse_from(["sltcli", "usage", "-a"]);
        assert_eq!(args.action, Action::Usage);
        assert!(args.all);

        let args = Args::parse_from(["sltcli", "--all", "bill"]);
        assert_eq!(args.action, Action::Bill);
        assert!(args.all);

        let args = Args::parse_from(["sltcli", "logout"]);
        assert!(!args.all);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert!(Args::try_parse_from(["sltcli", "status"]).is_err());
        assert!(Args::try_parse_from(["sltcli"]).is_err());
    }

    #[tokio::test]
    async fn test_guard_runs_before_endpoint_lookup() {
        use crate::config::Section;
        use crate::testing::{anonymous_document, ready_document, store_with};

        let mut document = anonymous_document();
        document.remove(Section::Server, "ProfileDetailsUrl");
        document.remove(Section::Server, "UsageDetailsUrl");

        for action in ["usage", "account", "bill"] {
            let args = Args::parse_from(["sltcli", action]);
            let err = args.execute(store_with(document.clone())).await.unwrap_err();
            assert_eq!(err.to_string(), "Please log in and provide account details.");
            assert_eq!(err.exit_code(), 0);
        }

        let mut document = ready_document();
        document.remove(Section::Server, "ProfileDetailsUrl");
        let err = Args::parse_from(["sltcli", "account", "--all"])
            .execute(store_with(document))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Config is missing \"server.ProfileDetailsUrl\""
        );
        assert_eq!(err.exit_code(), 1);
    }
}
