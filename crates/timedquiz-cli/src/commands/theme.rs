//! The `timedquiz theme` command.

use std::path::PathBuf;

use anyhow::Result;

use timedquiz_bank::config::{load_config_from, preferences_path, set_dark_mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChoice {
    Show,
    Toggle,
    Dark,
    Light,
}

fn theme_name(dark: bool) -> &'static str {
    if dark {
        "dark"
    } else {
        "light"
    }
}

pub fn execute(choice: ThemeChoice, config_path: Option<PathBuf>) -> Result<()> {
    let path = preferences_path(config_path.as_deref());
    let current = if path.exists() {
        load_config_from(Some(&path))?.dark_mode
    } else {
        false
    };

    let dark = match choice {
        ThemeChoice::Show => {
            println!("Theme: {}", theme_name(current));
            return Ok(());
        }
        ThemeChoice::Toggle => !current,
        ThemeChoice::Dark => true,
        ThemeChoice::Light => false,
    };

    set_dark_mode(&path, dark)?;
    println!("Theme set to {} ({})", theme_name(dark), path.display());
    Ok(())
}
