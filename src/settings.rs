//! User preferences: persistence and presentation style derivation.
//!
//! Settings are stored as a single JSON document. Loading merges the
//! persisted record over the compiled-in defaults per-field, so a record
//! written by an older version (or a partial one) still yields a complete
//! [`Settings`] value. Unknown persisted fields are ignored.

use crate::error::{Result, WidgetError};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Element classes the glow filter is applied to.
pub const GLOW_TARGETS: [&str; 3] = ["orbit", "orbital-ring", "main-orb"];

/// Theme accent color, from a fixed palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    #[default]
    Cyan,
    Purple,
    Green,
    Orange,
    Pink,
}

impl ThemeColor {
    /// Parse a theme name; unknown names fall back to cyan.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "purple" => Self::Purple,
            "green" => Self::Green,
            "orange" => Self::Orange,
            "pink" => Self::Pink,
            _ => Self::Cyan,
        }
    }

    /// Hex value for the accent color CSS variable.
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            Self::Cyan => "#00f0ff",
            Self::Purple => "#8b5cf6",
            Self::Green => "#10b981",
            Self::Orange => "#f97316",
            Self::Pink => "#ec4899",
        }
    }
}

impl<'de> Deserialize<'de> for ThemeColor {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// User preferences for voice output and the visual layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Speech rate multiplier (slightly under 1.0 sounds more natural).
    pub voice_rate: f32,
    /// Speech pitch multiplier.
    pub voice_pitch: f32,
    /// Speech volume, 0.0–1.0.
    pub voice_volume: f32,
    /// Animation speed multiplier for the loader/status animations.
    pub animation_speed: f32,
    /// Whether the particle background is drawn.
    pub enable_particles: bool,
    /// Whether the glow filter is applied to [`GLOW_TARGETS`].
    pub enable_glow: bool,
    /// Whether assistant replies are spoken aloud.
    pub auto_speak: bool,
    /// Whether user messages carry a timestamp.
    pub show_timestamp: bool,
    /// Theme accent color.
    pub theme_color: ThemeColor,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            voice_rate: 0.95,
            voice_pitch: 1.0,
            voice_volume: 1.0,
            animation_speed: 1.0,
            enable_particles: true,
            enable_glow: true,
            auto_speak: true,
            show_timestamp: true,
            theme_color: ThemeColor::Cyan,
        }
    }
}

impl Settings {
    /// Generated style block scaling the loader animation durations.
    ///
    /// The presentation layer replaces any previously generated block with
    /// this one, so at most one exists at a time.
    #[must_use]
    pub fn animation_style_block(&self) -> String {
        let duration = 2.0 / self.animation_speed;
        format!(
            ".loader {{ animation-duration: {duration}s !important; }}\n\
             .loader-letter {{ animation-duration: {duration}s !important; }}\n"
        )
    }
}

/// Load/save/reset of the persisted settings record.
///
/// Consumers receive fresh [`Settings`] snapshots; the store never hands out
/// shared mutable state.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default settings file path: `<config_dir>/orion/settings.json`.
    ///
    /// Override the directory with the `ORION_CONFIG_DIR` environment
    /// variable (used by tests and custom deployments).
    #[must_use]
    pub fn default_path() -> PathBuf {
        let dir = if let Some(override_dir) = std::env::var_os("ORION_CONFIG_DIR") {
            PathBuf::from(override_dir)
        } else {
            dirs::config_dir()
                .map(|d| d.join("orion"))
                .unwrap_or_else(|| PathBuf::from("/tmp/orion-config"))
        };
        dir.join("settings.json")
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted record merged over the compiled-in defaults.
    ///
    /// A missing or unreadable file yields the defaults; a malformed file is
    /// logged and also yields the defaults so startup never fails on a bad
    /// settings record.
    #[must_use]
    pub fn load(&self) -> Settings {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Settings::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "malformed settings record, using defaults"
                );
                Settings::default()
            }
        }
    }

    /// Serialize and persist the given settings, creating parent directories
    /// as needed.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(settings)
            .map_err(|e| WidgetError::Settings(e.to_string()))?;
        std::fs::write(&self.path, raw)?;
        tracing::info!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Persist the compiled-in defaults and return them.
    pub fn reset(&self) -> Result<Settings> {
        let defaults = Settings::default();
        self.save(&defaults)?;
        Ok(defaults)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn temp_store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn partial_record_merges_over_defaults() {
        let (_dir, store) = temp_store();
        std::fs::write(
            store.path(),
            r#"{ "voice_rate": 1.2, "theme_color": "purple" }"#,
        )
        .unwrap();

        let settings = store.load();
        assert!((settings.voice_rate - 1.2).abs() < f32::EPSILON);
        assert_eq!(settings.theme_color, ThemeColor::Purple);
        // Every unspecified field equals its compiled-in default.
        assert!((settings.voice_pitch - 1.0).abs() < f32::EPSILON);
        assert!((settings.voice_volume - 1.0).abs() < f32::EPSILON);
        assert!(settings.auto_speak);
        assert!(settings.enable_glow);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let (_dir, store) = temp_store();
        std::fs::write(
            store.path(),
            r#"{ "auto_speak": false, "legacy_field": 42 }"#,
        )
        .unwrap();

        let settings = store.load();
        assert!(!settings.auto_speak);
    }

    #[test]
    fn malformed_record_yields_defaults() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "this is not json {{{").unwrap();
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = temp_store();
        let mut settings = Settings::default();
        settings.voice_volume = 0.5;
        settings.enable_glow = false;
        settings.theme_color = ThemeColor::Orange;

        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn reset_then_load_yields_exact_defaults() {
        let (_dir, store) = temp_store();
        let mut settings = Settings::default();
        settings.animation_speed = 2.0;
        settings.auto_speak = false;
        store.save(&settings).unwrap();

        let restored = store.reset().unwrap();
        assert_eq!(restored, Settings::default());
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn unknown_theme_name_falls_back_to_cyan() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), r#"{ "theme_color": "mauve" }"#).unwrap();
        assert_eq!(store.load().theme_color, ThemeColor::Cyan);
    }

    #[test]
    fn theme_palette_hex_values() {
        assert_eq!(ThemeColor::Cyan.hex(), "#00f0ff");
        assert_eq!(ThemeColor::Purple.hex(), "#8b5cf6");
        assert_eq!(ThemeColor::Green.hex(), "#10b981");
        assert_eq!(ThemeColor::Orange.hex(), "#f97316");
        assert_eq!(ThemeColor::Pink.hex(), "#ec4899");
    }

    #[test]
    fn animation_style_block_scales_with_speed() {
        let mut settings = Settings::default();
        settings.animation_speed = 2.0;
        let block = settings.animation_style_block();
        assert!(block.contains("animation-duration: 1s"));

        settings.animation_speed = 0.5;
        let block = settings.animation_style_block();
        assert!(block.contains("animation-duration: 4s"));
    }
}
