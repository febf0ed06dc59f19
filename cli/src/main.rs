mod commands;
mod snapshot;
mod terminal;

use std::process::ExitCode;
use std::time::Duration;

use bidgate_common::config::{CategoryScope, EngineConfig};
use commands::{CommandLine, Commands, check, conditions, score};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);

    let cfg = EngineConfig {
        store_timeout: Duration::from_millis(commands.timeout_ms),
        category_scope: if commands.category_window {
            CategoryScope::CategoryWindow
        } else {
            CategoryScope::Category
        },
    };

    match commands.command {
        Commands::Conditions { snapshot } => {
            print::header("conditions in effect");
            conditions::conditions(&snapshot, &cfg).await
        }
        Commands::Score { snapshot, user } => {
            print::header("trust score");
            score::score(&snapshot, user.into(), &cfg).await
        }
        Commands::Check {
            snapshot,
            seller,
            category,
            start,
            end,
        } => {
            print::header("admission check");
            let request = check::request(seller, category, start, end);
            check::check(&snapshot, request, &cfg).await
        }
    }
}
