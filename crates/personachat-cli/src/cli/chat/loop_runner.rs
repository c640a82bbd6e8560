//! Main chat loop orchestration.
//!
//! Opens the bot behind a share link (or a local bot id), then runs the
//! input loop: each line is submitted to the session and the reply is
//! streamed to the terminal fragment by fragment.

use std::io::Write;

use console::style;
use tracing::{info, warn};

use personachat_core::chat::exchange::run_exchange;
use personachat_core::chat::session::StreamingChatSession;
use personachat_core::llm::box_provider::BoxLlmProvider;
use personachat_core::share::link::open_shared_bot;
use personachat_types::bot::{Bot, BotId};
use personachat_types::chat::{ChatStatus, MessageRole};

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use crate::cli::{bot, spinner};
use crate::state::AppState;

/// Resolve the bot to chat with.
///
/// A local bot id wins; anything else is treated as a share link or token.
/// On an invalid link the user sees an alert and the bot list, and `None`
/// is returned.
async fn resolve_bot(state: &AppState, input: &str) -> anyhow::Result<Option<Bot>> {
    if let Ok(bot) = state.bot_service.get_bot(&BotId::from(input.trim())).await {
        return Ok(Some(bot));
    }

    match open_shared_bot(input) {
        Ok(bot) => Ok(Some(bot)),
        Err(e) => {
            eprintln!();
            eprintln!("  {} Invalid Bot Link", style("!").red().bold());
            eprintln!("  {}", style(e).dim());
            bot::list_bots(state, false).await?;
            Ok(None)
        }
    }
}

/// Run the interactive chat loop.
pub async fn run_chat_loop(state: &AppState, link: &str) -> anyhow::Result<()> {
    let Some(bot) = resolve_bot(state, link).await? else {
        return Ok(());
    };

    let provider = state.provider()?;
    info!(bot_id = %bot.id, provider = provider.name(), "opening chat");

    print_welcome_banner(&bot, provider.model());

    let mut session = StreamingChatSession::new(bot).with_temperature(state.config.temperature);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => commands::print_help(),
                        ChatCommand::Clear => match session.clear() {
                            Ok(()) => chat_input.clear(),
                            Err(e) => warn!(error = %e, "cannot clear mid-exchange"),
                        },
                        ChatCommand::Exit => {
                            println!("\n  {}", style("Session ended.").dim());
                            break;
                        }
                        ChatCommand::History => print_history(&session),
                        ChatCommand::Unknown(name) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                                style("?").yellow().bold(),
                                style(name).dim()
                            );
                        }
                    }
                    continue;
                }

                exchange_turn(&mut session, &provider, &text).await;
            }
        }
    }

    chat_input.flush();
    Ok(())
}

/// Submit one user line and stream the reply to stdout.
async fn exchange_turn(session: &mut StreamingChatSession, provider: &BoxLlmProvider, text: &str) {
    let pending = match session.submit(text) {
        Ok(pending) => pending,
        Err(e) => {
            println!("\n  {} {e}\n", style("!").yellow().bold());
            return;
        }
    };

    let bot_name = session.bot().name.clone();
    let progress = spinner(session.status().presence_label());
    let mut started = false;

    let result = run_exchange(session, provider, pending, |fragment| {
        if !started {
            progress.finish_and_clear();
            print!("\n  {} ", style(&bot_name).cyan().bold());
            started = true;
        }
        print!("{fragment}");
        let _ = std::io::stdout().flush();
    })
    .await;

    if !started {
        progress.finish_and_clear();
    }

    match result {
        Ok(outcome) if outcome.status == ChatStatus::Error => {
            if !started {
                print!("\n  {} ", style(&bot_name).cyan().bold());
                print!("{}", style(&outcome.text).red());
            }
            println!();
            if let Some(e) = &outcome.error {
                eprintln!("  {}", style(e).dim());
            }
            println!();
        }
        Ok(_) => {
            println!();
            println!();
        }
        Err(e) => {
            warn!(error = %e, "exchange rejected by session");
            println!("\n  {} {e}\n", style("!").red().bold());
        }
    }
}

/// Print the transcript so far.
fn print_history(session: &StreamingChatSession) {
    println!();
    if session.transcript().is_empty() {
        println!("  {}", style("No messages yet.").dim());
    }
    for message in session.transcript() {
        let label = match message.role {
            MessageRole::User => style("You".to_string()).green(),
            MessageRole::Model => style(session.bot().name.clone()).cyan(),
        };
        println!("  {} {}", label.bold(), bot::preview(&message.text, 100));
    }
    println!();
}
