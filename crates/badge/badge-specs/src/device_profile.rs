//! Device profile types
//!
//! Defines the display and input characteristics of a simulated device.

use core::time::Duration;
use std::borrow::Cow;

use crate::palette::Palette;

/// Largest width or height accepted by [`DeviceProfile::validate`].
pub const MAX_DIMENSION: u32 = 4096;

/// Display technology of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DisplayClass {
    /// Direct-color TFT/IPS panel (Tufty, Presto)
    #[cfg_attr(feature = "serde", serde(alias = "tft"))]
    Panel,
    /// Grid of individually dimmable LEDs (Blinky)
    LedMatrix,
    /// Bistable e-ink panel with a fixed ink palette (Badger, Inky)
    #[cfg_attr(feature = "serde", serde(rename = "eink", alias = "eink_color"))]
    EInk,
}

impl DisplayClass {
    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            DisplayClass::Panel => "Panel",
            DisplayClass::LedMatrix => "LED Matrix",
            DisplayClass::EInk => "E-Ink",
        }
    }
}

/// A physical button on the device
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ButtonConfig {
    /// Label printed next to the button ("A", "UP", ...)
    pub name: Cow<'static, str>,
    /// Host keyboard key mapped to the button
    pub key: Cow<'static, str>,
    /// GPIO pin; doubles as the stable button identifier in input state
    pub pin: u8,
}

impl ButtonConfig {
    /// Const constructor for catalogue entries
    pub const fn new(name: &'static str, key: &'static str, pin: u8) -> Self {
        Self {
            name: Cow::Borrowed(name),
            key: Cow::Borrowed(key),
            pin,
        }
    }
}

/// Where the display sits inside the host window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum WindowLayout {
    /// Fixed margins, display centered horizontally below a status bar
    TopAligned {
        /// Total horizontal padding in pixels
        margin_x: u32,
        /// Total vertical padding in pixels
        margin_y: u32,
        /// Top edge of the display
        top: u32,
    },
    /// Display centered on both axes
    Centered {
        /// Total horizontal padding in pixels
        margin_x: u32,
        /// Total vertical padding in pixels
        margin_y: u32,
        /// Multiply the margins by the display scale
        scale_margins: bool,
    },
    /// LED grid: `display_scale` is the LED pitch
    LedGrid,
}

impl WindowLayout {
    /// Layout used by most badges: 100×80 padding, 40px status bar
    pub const STANDARD: Self = WindowLayout::TopAligned {
        margin_x: 100,
        margin_y: 80,
        top: 40,
    };
}

/// Axis-aligned rectangle in window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in window pixels
    pub width: u32,
    /// Height in window pixels
    pub height: u32,
}

impl WindowRect {
    /// True when `(px, py)` lies inside the rectangle
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x
            && py >= self.y
            && px < self.x.saturating_add(self.width)
            && py < self.y.saturating_add(self.height)
    }
}

/// Profile validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// Width or height is zero
    #[error("display dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
    },
    /// Width or height exceeds [`MAX_DIMENSION`]
    #[error("display dimension {0} exceeds the {max} pixel limit", max = MAX_DIMENSION)]
    TooLarge(u32),
    /// Display scale (or LED pitch) is zero
    #[error("display scale must be at least 1")]
    ZeroScale,
    /// Two buttons share a pin
    #[error("duplicate button pin {0}")]
    DuplicatePin(u8),
    /// The profile JSON could not be parsed
    #[cfg(feature = "serde")]
    #[error("invalid profile json: {0}")]
    Json(String),
}

/// Complete description of a simulated device
///
/// Constructed once at startup and consumed read-only by the renderer.
/// Catalogue entries are `const`; custom profiles can be loaded from JSON
/// with the `serde` feature.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DeviceProfile {
    /// Device name shown in the status bar (e.g., "Badger 2350")
    pub name: Cow<'static, str>,

    /// One-line description
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Cow<'static, str>,

    /// Display technology
    pub class: DisplayClass,

    /// Width in pixels (or LEDs)
    pub width: u32,

    /// Height in pixels (or LEDs)
    pub height: u32,

    /// Bits per pixel on the real hardware
    pub color_depth: u8,

    /// Color-capable display (RGB panel, RGB LEDs, color e-ink)
    pub is_color: bool,

    /// Number of ink colors (e-ink only; selects the palette)
    #[cfg_attr(feature = "serde", serde(default = "default_eink_colors"))]
    pub eink_colors: u8,

    /// Full refresh time in milliseconds (e-ink only)
    #[cfg_attr(feature = "serde", serde(default))]
    pub eink_refresh_ms: u32,

    /// Window upscaling factor; LED pitch in pixels for LED matrices
    pub display_scale: u32,

    /// Window geometry
    pub layout: WindowLayout,

    /// Front buttons, left to right
    #[cfg_attr(feature = "serde", serde(default))]
    pub buttons: Cow<'static, [ButtonConfig]>,

    /// Touchscreen present
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_touch: bool,

    /// White indicator LED above each button
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_button_leds: bool,

    /// Busy/activity LED
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_busy_led: bool,

    /// Usable application heap in bytes (0 when not tracked)
    #[cfg_attr(feature = "serde", serde(default))]
    pub heap_size: u32,
}

#[cfg(feature = "serde")]
fn default_eink_colors() -> u8 {
    2
}

impl DeviceProfile {
    /// Check the profile describes a drawable display
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.width == 0 || self.height == 0 {
            return Err(ProfileError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_DIMENSION {
            return Err(ProfileError::TooLarge(self.width));
        }
        if self.height > MAX_DIMENSION {
            return Err(ProfileError::TooLarge(self.height));
        }
        if self.display_scale == 0 {
            return Err(ProfileError::ZeroScale);
        }
        for (i, button) in self.buttons.iter().enumerate() {
            if self.buttons.iter().skip(i.saturating_add(1)).any(|b| b.pin == button.pin) {
                return Err(ProfileError::DuplicatePin(button.pin));
            }
        }
        Ok(())
    }

    /// Parse and validate a profile from JSON
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profile: Self =
            serde_json::from_str(json).map_err(|e| ProfileError::Json(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Copy of this profile with a different window scale
    pub fn with_scale(&self, scale: u32) -> Self {
        Self {
            display_scale: scale.max(1),
            ..self.clone()
        }
    }

    /// Pixel count of the display
    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Is this an e-ink device
    pub fn is_eink(&self) -> bool {
        self.class == DisplayClass::EInk
    }

    /// Ink palette selected from the declared color count
    pub fn palette(&self) -> Palette {
        Palette::for_color_count(self.eink_colors)
    }

    /// Declared e-ink refresh time as Duration
    pub fn refresh_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.eink_refresh_ms))
    }

    /// LED disc radius for LED matrices (derived from the pitch)
    pub fn led_radius(&self) -> u32 {
        (self.display_scale / 2).saturating_sub(1).max(2)
    }

    /// Host window size in pixels
    pub fn window_size(&self) -> (u32, u32) {
        let scale = self.display_scale;
        let disp_w = self.width.saturating_mul(scale);
        let disp_h = self.height.saturating_mul(scale);
        match self.layout {
            WindowLayout::TopAligned {
                margin_x, margin_y, ..
            } => (disp_w.saturating_add(margin_x), disp_h.saturating_add(margin_y)),
            WindowLayout::Centered {
                margin_x,
                margin_y,
                scale_margins,
            } => {
                let factor = if scale_margins { scale } else { 1 };
                (
                    disp_w.saturating_add(margin_x.saturating_mul(factor)),
                    disp_h.saturating_add(margin_y.saturating_mul(factor)),
                )
            }
            WindowLayout::LedGrid => (
                disp_w.saturating_add(scale).saturating_add(100),
                disp_h.saturating_add(scale).saturating_add(80),
            ),
        }
    }

    /// Rectangle the display occupies inside the window
    ///
    /// For LED matrices this is the LED grid area including the half-pitch
    /// border around the outer LEDs.
    pub fn display_rect(&self) -> WindowRect {
        let (win_w, win_h) = self.window_size();
        let scale = self.display_scale;
        let disp_w = self.width.saturating_mul(scale);
        let disp_h = self.height.saturating_mul(scale);
        match self.layout {
            WindowLayout::TopAligned { top, .. } => WindowRect {
                x: win_w.saturating_sub(disp_w) / 2,
                y: top,
                width: disp_w,
                height: disp_h,
            },
            WindowLayout::Centered { .. } => WindowRect {
                x: win_w.saturating_sub(disp_w) / 2,
                y: win_h.saturating_sub(disp_h) / 2,
                width: disp_w,
                height: disp_h,
            },
            WindowLayout::LedGrid => WindowRect {
                x: 50,
                y: 40,
                width: disp_w.saturating_add(scale),
                height: disp_h.saturating_add(scale),
            },
        }
    }

    /// Find a button by its host keyboard key (case-insensitive)
    pub fn button_by_key(&self, key: &str) -> Option<&ButtonConfig> {
        self.buttons.iter().find(|b| b.key.eq_ignore_ascii_case(key))
    }

    /// Find a button by GPIO pin
    pub fn button_by_pin(&self, pin: u8) -> Option<&ButtonConfig> {
        self.buttons.iter().find(|b| b.pin == pin)
    }
}
