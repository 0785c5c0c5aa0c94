//! The `timedquiz validate` command.

use std::path::PathBuf;

use anyhow::Result;

use timedquiz_bank::config::{create_source, load_config_from};
use timedquiz_core::bank::validate_bank;

pub async fn execute(bank: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let location = match bank {
        Some(location) => location,
        None => load_config_from(config_path.as_deref())?.bank,
    };

    let source = create_source(&location)?;
    let bank = source.load().await?;
    println!("Bank: {} ({} questions)", source.location(), bank.len());

    let warnings = validate_bank(&bank);
    for w in &warnings {
        let prefix = w
            .question
            .map(|n| format!("  [Q{n}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
