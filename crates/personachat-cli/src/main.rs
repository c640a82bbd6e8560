//! PersonaChat CLI entry point.
//!
//! Binary name: `pchat`
//!
//! Parses CLI arguments, initializes tracing, configuration and the local
//! database, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use personachat_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "pchat", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init().await?;

    match cli.command {
        Commands::Create {
            name,
            persona,
            avatar,
        } => cli::bot::create_bot(&state, name, persona, avatar, cli.json).await,
        Commands::List => cli::bot::list_bots(&state, cli.json).await,
        Commands::Delete { id, force } => cli::bot::delete_bot(&state, &id, force, cli.json).await,
        Commands::Share { id } => cli::bot::share_bot(&state, &id, cli.json).await,
        Commands::Chat { link } => cli::chat::loop_runner::run_chat_loop(&state, &link).await,
        Commands::Check => cli::provider::check_provider(&state, cli.json).await,
        Commands::Completions { .. } => Ok(()),
    }
}
