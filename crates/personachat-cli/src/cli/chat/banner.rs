//! Welcome banner display for chat sessions.

use console::style;

use personachat_types::bot::Bot;
use personachat_types::chat::ChatStatus;

use crate::cli::bot::preview;

/// Print the welcome banner at the start of a chat session.
///
/// Shows the bot's name, presence, persona preview, avatar and model.
pub fn print_welcome_banner(bot: &Bot, model: &str) {
    println!();
    println!(
        "  {} {}",
        style(&bot.name).cyan().bold(),
        style(format!("({})", ChatStatus::Idle.presence_label())).green()
    );
    println!("  {}", style(preview(&bot.persona, 72)).dim());
    println!();
    println!("  {}  {}", style("Model:").bold(), style(model).dim());
    if !bot.avatar_url.is_empty() {
        println!("  {} {}", style("Avatar:").bold(), style(&bot.avatar_url).dim());
    }
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
