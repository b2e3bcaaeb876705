use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use board_core::BoardConfig;
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "board.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub signup_feedback_secs: u64,
    pub unregister_feedback_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            signup_feedback_secs: 5,
            unregister_feedback_secs: 4,
            request_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn board_config(&self) -> BoardConfig {
        BoardConfig {
            signup_feedback: Duration::from_secs(self.signup_feedback_secs),
            unregister_feedback: Duration::from_secs(self.unregister_feedback_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    signup_feedback_secs: Option<u64>,
    unregister_feedback_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
}

pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_from(
        path.unwrap_or(Path::new(SETTINGS_FILE)),
        |key| std::env::var(key).ok(),
    )
}

/// Defaults, then the TOML file when present, then the environment.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
        if let Some(v) = file_cfg.server_url {
            settings.server_url = v;
        }
        if let Some(v) = file_cfg.signup_feedback_secs {
            settings.signup_feedback_secs = v;
        }
        if let Some(v) = file_cfg.unregister_feedback_secs {
            settings.unregister_feedback_secs = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
    }

    if let Some(v) = env("BOARD_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .parse()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
    }

    Ok(settings)
}
