//! Main entry point for the SLT CLI

use clap::{CommandFactory, Parser};
use clap_complete::env::CompleteEnv;
use clap_verbosity_flag::LevelFilter;
use color_eyre::eyre::{eyre, Result};
use slt_cli::cli::Args;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Handle shell completions first (must be before argument parsing)
    CompleteEnv::with_factory(Args::command).complete();

    let args = Args::parse();

    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    match args.verbosity.log_level_filter() {
        LevelFilter::Off | LevelFilter::Error => {}
        _ => {
            std::env::set_var("RUST_LIB_BACKTRACE", "1");
        }
    }

    // Silent unless -v or RUST_LOG asks for output
    let binary_name = env!("CARGO_BIN_NAME").replace("-", "_");
    let default_filter = format!("{}=info,slt_cli=info,slt_sdk=info", binary_name);
    slt_common::logging::init_cli_logging(&args.verbosity, &default_filter)
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

    Ok(args.run().await)
}
