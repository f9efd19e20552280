//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`validate`], or [`init`]. Each handler
//! lives in its own submodule.

pub mod init;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::UrlshortError;

pub async fn dispatch(cli: Cli) -> Result<(), UrlshortError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  urlshort v{version} \u{2014} redirect server\n\n  \
         No command provided. To get started:\n\n    \
         urlshort init                  Generate a starter paths.yaml\n    \
         urlshort run                   Serve redirects (auto-detects ./paths.yaml)\n    \
         urlshort run -j links.json     Serve redirects from a JSON file\n    \
         urlshort --help                See all commands and options\n"
    );
}
