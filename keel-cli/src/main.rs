//! Keel CLI - Command-line interface for Keel schema migrations.

use clap::Parser;

use keel_cli::cli::{Cli, Command};
use keel_cli::commands;
use keel_cli::logging;
use keel_cli::output;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let code = match cli.command {
        Command::Migrate(args) => match commands::migrate::run(args).await {
            Ok(outcome) => commands::migrate::exit_code(&outcome),
            Err(e) => {
                output::newline();
                output::error(&e.to_string());
                1
            }
        },
    };

    std::process::exit(code);
}
