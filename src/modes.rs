use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;
use swayipc_async::Mode as SwayMode;

/// One resolution/refresh combination of an output.
///
/// `refresh` is kept as the raw JSON value: sway reports millihertz, the
/// control server may hand back whatever it stored.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Mode {
    pub width: i32,
    pub height: i32,
    pub refresh: Refresh,
}

/// Refresh rate as a JSON number or string, rendered without quotes.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Refresh {
    Number(Number),
    Text(String),
}

impl fmt::Display for Refresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refresh::Number(n) => write!(f, "{n}"),
            Refresh::Text(s) => f.write_str(s),
        }
    }
}

impl From<i32> for Refresh {
    fn from(refresh: i32) -> Refresh {
        Refresh::Number(refresh.into())
    }
}

impl Mode {
    pub fn new(width: i32, height: i32, refresh: impl Into<Refresh>) -> Mode {
        Mode {
            width,
            height,
            refresh: refresh.into(),
        }
    }

    /// Mode token for `output <name> mode <token>`.
    ///
    /// Only the first digit of the refresh value is sent (60 becomes `6Hz`).
    /// The control server is built around this token.
    pub fn get_modestr(&self) -> String {
        let refresh = self.refresh.to_string();
        let leading: String = refresh.chars().take(1).collect();
        format!("{}x{}@{}Hz", self.width, self.height, leading)
    }
}

impl From<&SwayMode> for Mode {
    fn from(mode_info: &SwayMode) -> Mode {
        let SwayMode {
            height,
            width,
            refresh,
            ..
        } = *mode_info;
        Mode::new(width, height, refresh)
    }
}
