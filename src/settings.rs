//! Game settings and preferences
//!
//! Read once at startup from an inline JSON block in the host page:
//! `<script type="application/json" id="settings">{ ... }</script>`.
//! Missing fields fall back to their defaults. Nothing is written back.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Start with all audio muted
    pub muted: bool,
    /// Mute when the tab is hidden
    pub mute_on_blur: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Debug ===
    /// `log` level filter name ("error" .. "trace")
    pub log_level: String,
    /// Fixed RNG seed; random per session when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.6,
            muted: false,
            mute_on_blur: true,

            show_fps: false,

            log_level: "info".to_string(),
            seed: None,
        }
    }
}

impl Settings {
    /// DOM id of the settings script element
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "settings";

    /// Parse settings JSON; volumes are clamped to 0..=1
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Effective sound effect gain
    pub fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music gain
    pub fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Parsed log level, `Info` when unrecognised
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Load settings from the host page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        let Some(text) = text else {
            return Self::default();
        };

        match Self::from_json(&text) {
            Ok(settings) => settings,
            Err(e) => {
                // Logger may not be up yet
                web_sys::console::warn_1(&format!("Invalid settings JSON, using defaults: {e}").into());
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
