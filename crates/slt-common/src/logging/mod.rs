//! Logging initialization for the `sltcli` binary
//!
//! Filter priority, highest first:
//! 1. CLI flags (`-v/-q`)
//! 2. `RUST_LOG` environment variable
//! 3. The binary's default filter
//!
//! Log lines go to stderr so that JSON written to stdout stays machine readable.

use anyhow::Result;
use clap_verbosity_flag::{LogLevel, Verbosity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter for the given verbosity, falling back to `RUST_LOG`
/// and then to `default_filter`.
pub fn build_filter<L: LogLevel>(verbosity: &Verbosity<L>, default_filter: &str) -> Result<EnvFilter> {
    let filter = if let Some(log_level) = verbosity.log_level() {
        EnvFilter::try_new(format!("{}", log_level))?
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
    };
    Ok(filter)
}

/// Initialize logging with the specified verbosity level and default filter.
///
/// # Example
///
/// ```no_run
/// use clap::Parser;
/// use clap_verbosity_flag::{Verbosity, OffLevel};
/// use slt_common::logging;
///
/// #[derive(Parser)]
/// struct Args {
///     #[clap(flatten)]
///     verbosity: Verbosity<OffLevel>,
/// }
///
/// let args = Args::parse();
/// logging::init_logging(&args.verbosity, "sltcli=info").unwrap();
/// ```
pub fn init_logging<L: LogLevel>(verbosity: &Verbosity<L>, default_filter: &str) -> Result<()> {
    let filter = build_filter(verbosity, default_filter)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

/// Initialize logging only when it was asked for.
///
/// The CLI prints status lines and JSON for the user; tracing output is for
/// debugging the tool itself and stays off unless `-v` or `RUST_LOG` is given.
///
/// Returns `true` if a subscriber was installed.
pub fn init_cli_logging<L: LogLevel>(
    verbosity: &Verbosity<L>,
    default_filter: &str,
) -> Result<bool> {
    if verbosity.log_level().is_some() || std::env::var("RUST_LOG").is_ok() {
        init_logging(verbosity, default_filter)?;
        Ok(true)
    } else {
        Ok(false)
    }
}
