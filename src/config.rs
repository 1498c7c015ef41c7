use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Tuning for the crop editor, in display pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Side of the square hit zone around each handle.
    pub handle_size: f64,
    /// Smallest width/height a resize may produce.
    pub min_size: f64,
    /// Share of each display dimension the default rectangle covers.
    pub default_fraction: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            handle_size: 20.0,
            min_size: 50.0,
            default_fraction: 0.5,
        }
    }
}

impl EditorConfig {
    /// Replaces unusable values with their defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let sanitized = Self {
            handle_size: if positive(self.handle_size) {
                self.handle_size
            } else {
                defaults.handle_size
            },
            min_size: if positive(self.min_size) {
                self.min_size
            } else {
                defaults.min_size
            },
            default_fraction: if positive(self.default_fraction) && self.default_fraction <= 1.0 {
                self.default_fraction
            } else {
                defaults.default_fraction
            },
        };
        if sanitized != self {
            tracing::warn!(
                original = ?self,
                ?sanitized,
                "editor config had invalid values, using defaults"
            );
        }
        sanitized
    }
}

/// Persisted preferences of the desktop shell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub editor: EditorConfig,
    pub portrait: bool,
    pub custom_w: u32,
    pub custom_h: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            portrait: false,
            custom_w: 4,
            custom_h: 3,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents),
            Err(_) => Self::default(),
        }
    }

    pub fn from_json(contents: &str) -> Self {
        match serde_json::from_str::<Settings>(contents) {
            Ok(mut settings) => {
                settings.editor = settings.editor.sanitized();
                settings.custom_w = settings.custom_w.max(1);
                settings.custom_h = settings.custom_h.max(1);
                settings
            }
            Err(e) => {
                tracing::warn!("ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        let config_path = Self::config_path();
        if let Err(e) = self.save_to(&config_path) {
            tracing::warn!("failed to save settings to {}: {}", config_path.display(), e);
        }
    }

    /// Writes the settings as pretty JSON, creating parent directories first.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }

    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("image_cropper");
        path.push("settings.json");
        path
    }
}
