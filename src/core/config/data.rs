use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::mode::Mode;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const BASE_URL_ENV: &str = "VISTACHAT_BASE_URL";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Root URL of the chat server; endpoints are appended to it
    pub base_url: Option<String>,
    /// Mode the TUI starts in
    pub default_mode: Option<Mode>,
    /// Per-request timeout; unset means wait indefinitely
    pub timeout_secs: Option<u64>,
}

/// Values given on the command line. They win over everything else.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub base_url: Option<String>,
    pub mode: Option<Mode>,
}

/// The effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub mode: Mode,
    pub timeout: Option<Duration>,
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    /// Resolve flag > environment > config file > default.
    pub fn resolve(&self, overrides: &SettingsOverrides) -> Settings {
        let env_base_url = std::env::var(BASE_URL_ENV).ok();
        self.resolve_with_env(overrides, env_base_url.as_deref())
    }

    pub(crate) fn resolve_with_env(
        &self,
        overrides: &SettingsOverrides,
        env_base_url: Option<&str>,
    ) -> Settings {
        let non_empty = |value: &str| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        let base_url = overrides
            .base_url
            .as_deref()
            .and_then(non_empty)
            .or_else(|| env_base_url.and_then(non_empty))
            .or_else(|| self.base_url.as_deref().and_then(non_empty))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Settings {
            base_url,
            mode: overrides.mode.or(self.default_mode).unwrap_or_default(),
            timeout: self
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    /// Apply `vistachat set <key> <value>`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<String, String> {
        match key {
            "base-url" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err("base-url cannot be empty".to_string());
                }
                self.base_url = Some(value.to_string());
                Ok(format!("base-url set to: {value}"))
            }
            "default-mode" => {
                let mode: Mode = value.parse()?;
                self.default_mode = Some(mode);
                Ok(format!("default-mode set to: {mode}"))
            }
            "timeout-secs" => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("timeout-secs must be a whole number, got '{value}'"))?;
                self.timeout_secs = Some(secs);
                Ok(format!("timeout-secs set to: {secs}"))
            }
            other => Err(unknown_key(other)),
        }
    }

    /// Apply `vistachat unset <key>`.
    pub fn unset_value(&mut self, key: &str) -> Result<String, String> {
        match key {
            "base-url" => self.base_url = None,
            "default-mode" => self.default_mode = None,
            "timeout-secs" => self.timeout_secs = None,
            other => return Err(unknown_key(other)),
        }
        Ok(format!("{key} unset"))
    }
}

pub const CONFIG_KEYS: &[&str] = &["base-url", "default-mode", "timeout-secs"];

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown config key '{key}'. Available keys: {}",
        CONFIG_KEYS.join(", ")
    )
}
