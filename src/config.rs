use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = ".config/padmouse";
const SESSION_FILE: &str = "session.toml";
const MAPPING_FILE: &str = "mapping.conf";

/// Runtime settings read from `~/.config/padmouse/session.toml`
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SessionSettings {
    /// Polling cadence of the controller loop
    pub poll_interval_ms: u64,
    /// How long to wait for a controller at startup
    pub connect_timeout_ms: u64,
    /// Pause between connection checks while waiting
    pub connect_poll_ms: u64,
    /// Mapping file; defaults to `mapping.conf` next to `session.toml`
    pub mapping_file: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 16,
            connect_timeout_ms: 5000,
            connect_poll_ms: 100,
            mapping_file: config_dir().join(MAPPING_FILE),
        }
    }
}

impl SessionSettings {
    /// Loads the default settings file; missing or broken files give the defaults.
    pub async fn load() -> Self {
        Self::load_from(&config_dir().join(SESSION_FILE)).await
    }

    pub async fn load_from(path: &Path) -> Self {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session settings at {:?}, using defaults", path);
                return Self::default();
            }
            Err(e) => {
                warn!("Failed to read {:?}: {}, using defaults", path, e);
                return Self::default();
            }
        };

        match toml::from_str::<SessionSettings>(&content) {
            Ok(settings) => {
                info!("Session settings loaded from {:?}", path);
                settings.sanitized()
            }
            Err(e) => {
                warn!("Invalid session settings in {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    // Zero intervals would spin the loop
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.poll_interval_ms == 0 {
            warn!("poll_interval_ms must be positive, using {}", defaults.poll_interval_ms);
            self.poll_interval_ms = defaults.poll_interval_ms;
        }
        if self.connect_poll_ms == 0 {
            warn!("connect_poll_ms must be positive, using {}", defaults.connect_poll_ms);
            self.connect_poll_ms = defaults.connect_poll_ms;
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn connect_poll(&self) -> Duration {
        Duration::from_millis(self.connect_poll_ms)
    }
}

pub fn config_dir() -> PathBuf {
    get_home_dir().join(CONFIG_DIR)
}

fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| {
        warn!("Could not determine home directory, using current directory");
        PathBuf::from(".")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SessionSettings::load_from(&dir.path().join("session.toml")).await;
        assert_eq!(settings, SessionSettings::default());
        assert_eq!(settings.poll_interval(), Duration::from_millis(16));
        assert_eq!(settings.connect_timeout(), Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        tokio::fs::write(&path, "poll_interval_ms = 8\nmapping_file = \"/tmp/pad.conf\"\n")
            .await
            .unwrap();

        let settings = SessionSettings::load_from(&path).await;
        assert_eq!(settings.poll_interval_ms, 8);
        assert_eq!(settings.connect_timeout_ms, 5000);
        assert_eq!(settings.mapping_file, PathBuf::from("/tmp/pad.conf"));
    }

    #[tokio::test]
    async fn broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        tokio::fs::write(&path, "poll_interval_ms = \"fast\"").await.unwrap();
        assert_eq!(
            SessionSettings::load_from(&path).await,
            SessionSettings::default()
        );
    }

    #[tokio::test]
    async fn zero_interval_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        tokio::fs::write(&path, "poll_interval_ms = 0").await.unwrap();
        assert_eq!(SessionSettings::load_from(&path).await.poll_interval_ms, 16);
    }
}
