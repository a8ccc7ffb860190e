use serde::Deserialize;

use crate::{Error, Result};

/// Tunables shared by the registries and the navigation relay.
///
/// ```rust
/// use pagekit_core::Config;
///
/// let cfg = Config::from_json(r#"{ "data_event": "payload" }"#).unwrap();
/// assert_eq!(cfg.data_event, "payload");
/// assert_eq!(cfg.default_watch_fires, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Event name the navigation relay emits payloads under.
    pub data_event: String,
    /// Title used for user-facing notices.
    pub notice_title: String,
    /// Fires granted by a plain `watch` call.
    pub default_watch_fires: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_event: "getData".into(),
            notice_title: "Notice".into(),
            default_watch_fires: 1,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_event.is_empty() {
            return Err(Error::Config("data_event must not be empty".into()));
        }
        if self.default_watch_fires == 0 {
            return Err(Error::Config("default_watch_fires must be at least 1".into()));
        }
        Ok(())
    }
}
