//! CLI command definitions and dispatch for the `pchat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod bot;
pub mod chat;
pub mod provider;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

/// Create persona bots, share them as links, and chat with shared bots.
#[derive(Parser)]
#[command(name = "pchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new bot and print its share link.
    #[command(alias = "new")]
    Create {
        /// Bot name (prompted for if omitted).
        #[arg(long)]
        name: Option<String>,

        /// Persona instruction the bot follows (prompted for if omitted).
        #[arg(long)]
        persona: Option<String>,

        /// Avatar image URL (a generated avatar is used if omitted).
        #[arg(long)]
        avatar: Option<String>,
    },

    /// List the bots you created.
    #[command(alias = "ls")]
    List,

    /// Delete one of your bots.
    #[command(alias = "rm")]
    Delete {
        /// Bot id.
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Print the share link for one of your bots.
    Share {
        /// Bot id.
        id: String,
    },

    /// Chat with a bot from a share link, a bare token, or one of your bot ids.
    Chat {
        /// Share link, token, or bot id.
        link: String,
    },

    /// Verify the configured model service is reachable with the current key.
    Check,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Start a steady-ticking spinner with the given message.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_with_flags() {
        let cli = Cli::try_parse_from([
            "pchat", "create", "--name", "Luna", "--persona", "You are Luna.",
        ])
        .unwrap();
        match cli.command {
            Commands::Create {
                name,
                persona,
                avatar,
            } => {
                assert_eq!(name.as_deref(), Some("Luna"));
                assert_eq!(persona.as_deref(), Some("You are Luna."));
                assert!(avatar.is_none());
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pchat", "list", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_parse_chat_link() {
        let cli = Cli::try_parse_from([
            "pchat",
            "chat",
            "http://localhost:3000/#/chat/share?data=abc",
        ])
        .unwrap();
        match cli.command {
            Commands::Chat { link } => assert!(link.ends_with("data=abc")),
            _ => panic!("expected chat"),
        }
    }
}
