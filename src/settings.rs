//! Agent configuration.
//!
//! Loaded from a TOML file given with `--config`, otherwise from
//! `/etc/kiosk-displayd/config.toml` when it exists. Every key is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/kiosk-displayd/config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the control server.
    pub server_url: String,
    /// Seconds between config polls.
    pub poll_interval_secs: u64,
    /// Seconds before an HTTP request to the control server is abandoned.
    pub request_timeout_secs: u64,
    /// Network interface whose hardware address identifies this device.
    pub interface: Option<String>,
    pub browser: BrowserSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrowserSettings {
    pub binary: String,
    pub args: Vec<String>,
    /// Per-output profiles live in `<profile_root>/<output name>`.
    pub profile_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    pub seat: String,
    pub hide_cursor_ms: u32,
    /// Pause after each output so sway has the assign rule before the
    /// browser window maps.
    pub settle_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "https://display.gulas.ch".to_string(),
            poll_interval_secs: 5,
            request_timeout_secs: 10,
            interface: None,
            browser: BrowserSettings::default(),
            display: DisplaySettings::default(),
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            binary: "chromium".to_string(),
            args: vec![
                "--noerrdialogs".to_string(),
                "--enable-features=OverlayScrollbar".to_string(),
                "--disable-restore-session-state".to_string(),
            ],
            profile_root: PathBuf::from("/tmp/chromium_userdata"),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            seat: "seat0".to_string(),
            hide_cursor_ms: 3000,
            settle_delay_ms: 500,
        }
    }
}

impl Settings {
    /// Loads `path` if given (it must exist), otherwise the default location
    /// if present, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Settings::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Settings> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.server_url.is_empty(), "server_url must not be empty");
        anyhow::ensure!(self.poll_interval_secs > 0, "poll_interval_secs must be at least 1");
        anyhow::ensure!(
            self.request_timeout_secs > 0,
            "request_timeout_secs must be at least 1"
        );
        anyhow::ensure!(!self.browser.binary.is_empty(), "browser.binary must not be empty");
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
