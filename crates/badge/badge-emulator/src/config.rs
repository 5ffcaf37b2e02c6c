//! Renderer configuration

use std::path::Path;
use std::time::Duration;

use badge_specs::DeviceProfile;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::translate::InkTone;

/// Shortest e-ink refresh animation
pub const MIN_REFRESH: Duration = Duration::from_millis(100);

/// Longest e-ink refresh animation
pub const MAX_REFRESH: Duration = Duration::from_millis(2000);

/// Configuration for display presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Override the profile's display scale / LED pitch
    pub scale: Option<u32>,
    /// Override the profile's e-ink refresh time, in milliseconds
    pub refresh_ms: Option<u64>,
    /// Ordered dithering on monochrome e-ink
    pub dither: bool,
    /// Glow halo beneath bright LEDs
    pub glow: bool,
    /// Presentation rate cap
    pub target_fps: u32,
    /// Never open a host window
    pub headless: bool,
    /// Draw the status bar (name, frame counter, heap bar)
    pub show_status: bool,
    /// E-ink paper and ink tones
    pub ink: InkTone,
}

impl RenderConfig {
    /// Windowed, profile defaults
    pub const DEFAULT: Self = Self {
        scale: None,
        refresh_ms: None,
        dither: true,
        glow: true,
        target_fps: 60,
        headless: false,
        show_status: true,
        ink: InkTone::DEFAULT,
    };

    /// Image-only rendering for tests and CI
    pub const HEADLESS: Self = Self {
        headless: true,
        ..Self::DEFAULT
    };

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// E-ink refresh duration for `profile`, clamped to
    /// [`MIN_REFRESH`]..=[`MAX_REFRESH`]
    pub fn refresh_duration(&self, profile: &DeviceProfile) -> Duration {
        let requested = self
            .refresh_ms
            .map_or_else(|| profile.refresh_duration(), Duration::from_millis);
        requested.clamp(MIN_REFRESH, MAX_REFRESH)
    }

    /// Minimum time between presented frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1)
            .checked_div(self.target_fps.max(1))
            .unwrap_or(Duration::from_millis(16))
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
