//! Application configuration, loadable from a partial JSON document.

use std::{str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::Level;

use super::{
    error::{Error, Result},
    style::Theme,
};

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Style constants applied to every new window.
    pub theme: Theme,
    /// How long the engine loop sleeps when a tick did no work, in
    /// milliseconds.
    pub frame_interval_ms: u64,
    /// Maximum tracing level: one of `error`, `warn`, `info`, `debug`,
    /// `trace`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            frame_interval_ms: 16,
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The idle sleep of the engine loop.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// The configured log level.
    pub fn level(&self) -> Result<Level> {
        Level::from_str(&self.log_level)
            .map_err(|_| Error::Config(format!("unknown log level: {}", self.log_level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn partial_document() -> Result<()> {
        let c = Config::from_json(
            r#"{"frame_interval_ms": 5, "theme": {"scrollbar_width": 20.0}}"#,
        )?;
        assert_eq!(c.frame_interval(), Duration::from_millis(5));
        assert_eq!(c.theme.scrollbar_width, 20.0);
        assert_eq!(c.theme.scrollbar_padding, 2.0);
        assert_eq!(c.theme.window_background, Color::WHITE);
        assert_eq!(c.level()?, Level::INFO);
        Ok(())
    }

    #[test]
    fn roundtrip_defaults() -> Result<()> {
        let c = Config::default();
        assert_eq!(Config::from_json(&c.to_json()?)?, c);
        assert_eq!(Config::from_json("{}")?, c);
        Ok(())
    }

    #[test]
    fn errors() {
        assert!(matches!(Config::from_json("{"), Err(Error::Config(_))));
        assert!(matches!(
            Config::from_json(r#"{"frame_interval_ms": "soon"}"#),
            Err(Error::Config(_))
        ));
        let c = Config {
            log_level: "loud".into(),
            ..Config::default()
        };
        assert!(matches!(c.level(), Err(Error::Config(_))));
    }
}
