//! User configuration and the source factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use timedquiz_core::model::ExamSettings;
use timedquiz_core::traits::QuestionSource;

use crate::file::FileSource;
use crate::http::HttpSource;

const LOCAL_CONFIG: &str = "timedquiz.toml";

/// Top-level timedquiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Bank location: a file path or an http(s) URL.
    #[serde(default = "default_bank")]
    pub bank: String,
    /// Questions drawn per exam.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Seconds allowed per question.
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: u32,
    /// Pause before moving on after a timeout, in milliseconds.
    #[serde(default = "default_advance_delay")]
    pub advance_delay_ms: u64,
    /// Minimum percentage that counts as a pass.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
    /// Move on automatically after an answer too.
    #[serde(default)]
    pub auto_advance_after_answer: bool,
    /// Use the dark terminal palette.
    #[serde(default)]
    pub dark_mode: bool,
}

fn default_bank() -> String {
    "questions.json".to_string()
}
fn default_question_count() -> usize {
    10
}
fn default_time_limit() -> u32 {
    20
}
fn default_advance_delay() -> u64 {
    1500
}
fn default_pass_threshold() -> f64 {
    70.0
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            bank: default_bank(),
            question_count: default_question_count(),
            time_limit_secs: default_time_limit(),
            advance_delay_ms: default_advance_delay(),
            pass_threshold: default_pass_threshold(),
            auto_advance_after_answer: false,
            dark_mode: false,
        }
    }
}

impl QuizConfig {
    /// Timing and scoring settings for the exam engine.
    pub fn exam_settings(&self) -> ExamSettings {
        ExamSettings {
            time_limit: self.time_limit_secs,
            advance_delay: Duration::from_millis(self.advance_delay_ms),
            pass_threshold: self.pass_threshold,
            auto_advance_after_answer: self.auto_advance_after_answer,
            ..ExamSettings::default()
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `timedquiz.toml` in the current directory
/// 2. `~/.config/timedquiz/config.toml`
///
/// Environment variable override: `TIMEDQUIZ_BANK`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => find_config(),
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => QuizConfig::default(),
    };

    let config = apply_overrides(config, std::env::var("TIMEDQUIZ_BANK").ok());
    check(&config)?;
    Ok(config)
}

fn apply_overrides(mut config: QuizConfig, bank: Option<String>) -> QuizConfig {
    if let Some(bank) = bank {
        config.bank = bank;
    }
    config.bank = resolve_env_vars(&config.bank);
    config
}

fn check(config: &QuizConfig) -> Result<()> {
    if !(0.0..=100.0).contains(&config.pass_threshold) {
        anyhow::bail!(
            "pass_threshold must be between 0 and 100, got {}",
            config.pass_threshold
        );
    }
    if config.time_limit_secs == 0 {
        anyhow::bail!("time_limit_secs must be at least 1");
    }
    if config.bank.trim().is_empty() {
        anyhow::bail!("no question bank configured");
    }
    Ok(())
}

fn find_config() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return Some(local);
    }
    global_config_path().filter(|p| p.exists())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("timedquiz"))
}

fn global_config_path() -> Option<PathBuf> {
    dirs_path().map(|d| d.join("config.toml"))
}

/// Where preference changes are written: the explicit path, else the config
/// file currently in effect, else the global config path.
pub fn preferences_path(path: Option<&Path>) -> PathBuf {
    if let Some(p) = path {
        return p.to_path_buf();
    }
    find_config()
        .or_else(global_config_path)
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG))
}

/// Persist the theme flag, keeping the rest of the file as written.
pub fn set_dark_mode(path: &Path, dark: bool) -> Result<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    doc["dark_mode"] = toml_edit::value(dark);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, doc.to_string())
        .with_context(|| format!("failed to write config: {}", path.display()))?;

    tracing::info!(dark, "theme preference saved to {}", path.display());
    Ok(())
}

/// Create a question source for a path or an http(s) URL.
pub fn create_source(location: &str) -> Result<Box<dyn QuestionSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}
