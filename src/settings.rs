//! User settings stored as settings.json in the app data directory

use crate::constants::DEFAULT_BACKEND_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Backend
    pub backend_url: Option<String>,

    // Speech
    pub auto_speak: bool,

    // Last directory the file picker was opened in
    pub browse_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            backend_url: None,
            auto_speak: true,
            browse_dir: None,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn backend_url_or_default(&self) -> String {
        self.backend_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    pub fn browse_dir_or_default(&self) -> PathBuf {
        self.browse_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::picture_dir()
                    .or_else(dirs::home_dir)
                    .unwrap_or_else(|| PathBuf::from("."))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            window_w: Some(900.0),
            backend_url: Some("http://10.0.0.2:8000".to_string()),
            auto_speak: false,
            browse_dir: Some("/tmp/scans".to_string()),
            ..Default::default()
        };
        settings.save(dir.path());

        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.window_w, Some(900.0));
        assert_eq!(loaded.backend_url_or_default(), "http://10.0.0.2:8000");
        assert!(!loaded.auto_speak);
        assert_eq!(loaded.browse_dir, Some("/tmp/scans".to_string()));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();

        let loaded = Settings::load(dir.path());
        assert!(loaded.auto_speak);
        assert_eq!(loaded.backend_url_or_default(), DEFAULT_BACKEND_URL);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load(dir.path());
        assert!(loaded.backend_url.is_none());
        assert_eq!(loaded.backend_url_or_default(), DEFAULT_BACKEND_URL);
    }
}
