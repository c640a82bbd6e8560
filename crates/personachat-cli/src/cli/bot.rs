//! Bot CLI commands: create, list, delete, share.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::{Confirm, Input};

use personachat_types::bot::{BotId, CreateBotRequest};

use super::spinner;
use crate::state::AppState;

/// Create a new bot via prompts or one-shot flags.
///
/// ```bash
/// pchat create
/// pchat create --name "Luna" --persona "You are Luna, a curious astronomer."
/// ```
pub async fn create_bot(
    state: &AppState,
    name: Option<String>,
    persona: Option<String>,
    avatar: Option<String>,
    json: bool,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt("Bot name")
            .interact_text()?,
    };

    let persona = match persona {
        Some(p) => p,
        None => Input::<String>::new()
            .with_prompt("Persona (how should the bot behave?)")
            .interact_text()?,
    };

    let avatar_url = match avatar {
        Some(a) => Some(a),
        None if json => None,
        None => Some(
            Input::<String>::new()
                .with_prompt("Avatar URL (leave empty for a generated one)")
                .allow_empty(true)
                .interact_text()?,
        ),
    };

    let request = CreateBotRequest {
        name,
        persona,
        avatar_url,
    };

    let created = state.bot_service.create_bot(request).await?;

    if json {
        let out = serde_json::json!({
            "bot": created.bot,
            "token": created.token,
            "link": created.link,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {} Bot created!", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Name:").bold(), style(&created.bot.name).cyan());
    println!("  {}    {}", style("ID:").bold(), style(&created.bot.id).dim());
    println!();
    println!("  {}", style("Share link:").bold());
    println!("  {}", style(&created.link).yellow());
    println!();
    println!(
        "  Chat now: {}",
        style(format!("pchat chat {}", created.bot.id)).yellow()
    );
    println!();

    Ok(())
}

/// List the user's bots in a table.
pub async fn list_bots(state: &AppState, json: bool) -> Result<()> {
    let bots = state.bot_service.list_bots().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&bots)?);
        return Ok(());
    }

    if bots.is_empty() {
        println!();
        println!(
            "  {} No bots yet. Create one with: {}",
            style("i").blue().bold(),
            style("pchat create").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("ID").fg(Color::White),
        Cell::new("Persona").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for bot in &bots {
        table.add_row(vec![
            Cell::new(&bot.name).fg(Color::Cyan),
            Cell::new(&bot.id).fg(Color::DarkGrey),
            Cell::new(preview(&bot.persona, 50)),
            Cell::new(format_relative_time(&bot.created_at)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} bot{}",
        style(bots.len()).bold(),
        if bots.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Delete a bot with confirmation.
pub async fn delete_bot(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let id = BotId::from(id);
    let bot = state.bot_service.get_bot(&id).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete bot '{}'? Links you already shared keep working.",
                style(&bot.name).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let progress = spinner(format!("Deleting {}...", bot.name));
    let result = state.bot_service.delete_bot(&id).await;
    progress.finish_and_clear();
    result?;

    if json {
        println!("{}", serde_json::json!({"deleted": true, "id": id}));
    } else {
        println!("  {} Bot '{}' deleted.", style("✓").red().bold(), bot.name);
    }

    Ok(())
}

/// Print the share link for a bot.
pub async fn share_bot(state: &AppState, id: &str, json: bool) -> Result<()> {
    let link = state.bot_service.share_link(&BotId::from(id)).await?;

    if json {
        println!("{}", serde_json::json!({"id": id, "link": link}));
    } else {
        println!("{link}");
    }

    Ok(())
}

/// First `max` characters of `text` on one line, with an ellipsis when cut.
pub(crate) fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let diff = now - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("You are Luna.", 50), "You are Luna.");
    }

    #[test]
    fn test_preview_flattens_and_truncates() {
        let text = "You are a pirate.\nSpeak   like one.";
        assert_eq!(preview(text, 12), "You are a...");
    }

    #[test]
    fn test_preview_multibyte_safe() {
        assert_eq!(preview("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_format_relative_time() {
        let now = chrono::Utc::now();
        assert_eq!(format_relative_time(&now), "just now");
        assert_eq!(
            format_relative_time(&(now - chrono::Duration::hours(3))),
            "3h ago"
        );
    }
}
