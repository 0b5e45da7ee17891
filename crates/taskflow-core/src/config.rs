use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_DRAG_ACTIVATION_DISTANCE: f32 = 8.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pointer travel (in pixels) before a press becomes a drag.
    #[serde(default)]
    pub drag_activation_distance: Option<f32>,
    /// Revert an optimistic move when the store rejects it.
    #[serde(default)]
    pub rollback_on_failure: Option<bool>,
    #[serde(default)]
    pub default_sort_key: Option<String>,
    #[serde(default)]
    pub default_sort_direction: Option<String>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/taskflow/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("taskflow/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("taskflow\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Read a config file, falling back to defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring invalid config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn effective_drag_activation_distance(&self) -> f32 {
        self.drag_activation_distance
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(DEFAULT_DRAG_ACTIVATION_DISTANCE)
    }

    pub fn effective_rollback_on_failure(&self) -> bool {
        self.rollback_on_failure.unwrap_or(true)
    }

    pub fn effective_default_sort_key(&self) -> &str {
        self.default_sort_key.as_deref().unwrap_or("due_date")
    }

    pub fn effective_default_sort_direction(&self) -> &str {
        self.default_sort_direction.as_deref().unwrap_or("ascending")
    }
}
