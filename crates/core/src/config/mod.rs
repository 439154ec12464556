use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{timeline::ResumePolicy, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub player: PlayerConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing sections and fields fall back
    /// to their defaults.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Tunables for the playback coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume given to the first imported entry.
    pub initial_volume: f64,
    /// Preview magnification used when zoom is on.
    pub zoom_factor: f64,
    /// Step used by the arrow keys and the inner transport buttons.
    pub short_seek_seconds: f64,
    /// Step used by the outer transport buttons.
    pub long_seek_seconds: f64,
    pub resume_policy: ResumePolicy,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: 0.5,
            zoom_factor: 2.3,
            short_seek_seconds: 10.0,
            long_seek_seconds: 60.0,
            resume_policy: ResumePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AppConfig::from_json_str(r#"{ "player": { "zoom_factor": 3.0 } }"#).unwrap();

        assert_eq!(config.player.zoom_factor, 3.0);
        assert_eq!(config.player.initial_volume, 0.5);
        assert_eq!(config.player.resume_policy, ResumePolicy::ResumeIfPlaying);
    }

    #[test]
    fn empty_object_is_the_default_config() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn parses_resume_policy() {
        let config =
            AppConfig::from_json_str(r#"{ "player": { "resume_policy": "stay_paused" } }"#)
                .unwrap();
        assert_eq!(config.player.resume_policy, ResumePolicy::StayPaused);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = AppConfig::from_json_str("{ player: ").unwrap_err();
        assert!(matches!(err, crate::MultiViewError::Json(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AppConfig::from_json_path("/definitely/not/here/multiview.json").unwrap_err();
        assert!(matches!(err, crate::MultiViewError::Io(_)));
    }
}
