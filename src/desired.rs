use crate::modes::Mode;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

/// Layout document served by the control server.
///
/// Compared structurally to decide whether anything needs re-applying.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DesiredConfiguration {
    #[serde(default)]
    pub displays: Vec<DisplayRule>,
}

/// What one output should look like and show.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayRule {
    pub name: String,
    /// Transform token handed to sway as is; numbers are accepted too.
    #[serde(deserialize_with = "token")]
    pub rotation: String,
    #[serde(default, deserialize_with = "optional_mode")]
    pub mode: Option<Mode>,
    #[serde(default, deserialize_with = "non_empty")]
    pub url: Option<String>,
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let url: Option<String> = Option::deserialize(deserializer)?;
    Ok(url.filter(|url| !url.is_empty()))
}

fn token<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(token) => Ok(token),
        Value::Number(token) => Ok(token.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or number token, got {other}"
        ))),
    }
}

/// `null` and `{}` both leave the resolution alone.
fn optional_mode<'de, D>(deserializer: D) -> Result<Option<Mode>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(mode) => Mode::deserialize(mode).map(Some).map_err(D::Error::custom),
    }
}

impl DisplayRule {
    pub fn build_transform_cmd(&self) -> String {
        format!("output {} transform {}", self.name, self.rotation)
    }

    pub fn build_mode_cmd(&self) -> Option<String> {
        self.mode
            .as_ref()
            .map(|mode| format!("output {} mode {}", self.name, mode.get_modestr()))
    }

    pub fn build_workspace_output_cmd(&self) -> String {
        format!("workspace \"{}\" output {}", self.name, self.name)
    }

    pub fn build_workspace_cmd(&self) -> String {
        format!("workspace \"{}\"", self.name)
    }

    /// Sends browser windows whose title mentions this output to its workspace.
    pub fn build_assign_cmd(&self) -> String {
        format!(
            "assign [title='^Chromium.*{}.*'] \"{}\"",
            self.name, self.name
        )
    }

    pub fn build_exec_cmd(
        &self,
        browser: &str,
        args: &[String],
        profile_root: &Path,
    ) -> Option<String> {
        let url = self.url.as_deref()?;
        let mut cmd = format!("exec {browser}");
        for arg in args {
            cmd.push(' ');
            cmd.push_str(arg);
        }
        let profile = profile_root.join(&self.name);
        cmd.push_str(&format!(
            " --user-data-dir={} --kiosk {url}",
            profile.display()
        ));
        Some(cmd)
    }
}
