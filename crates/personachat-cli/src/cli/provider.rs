//! Model service connectivity check.

use anyhow::Result;
use console::style;

use personachat_infra::llm::test_provider_connection;

use super::spinner;
use crate::state::AppState;

/// Send a tiny request through the configured provider and report the result.
pub async fn check_provider(state: &AppState, json: bool) -> Result<()> {
    let provider = state.provider()?;

    let progress = (!json).then(|| {
        spinner(format!(
            "Testing connection to {} ({})...",
            provider.name(),
            provider.model()
        ))
    });
    let result = test_provider_connection(&provider).await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    if json {
        let out = serde_json::json!({
            "provider": provider.name(),
            "model": provider.model(),
            "connected": result.is_ok(),
            "error": result.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match result {
        Ok(()) => {
            println!(
                "  {} {} ({}) is reachable.",
                style("✓").green().bold(),
                style(provider.name()).cyan(),
                provider.model()
            );
        }
        Err(e) => {
            println!(
                "  {} Connection to {} failed: {e}",
                style("✗").red().bold(),
                style(provider.name()).cyan()
            );
        }
    }

    Ok(())
}
