//! Badgeware RP2350 badges
//!
//! Badger (mono e-ink), Blinky (white LED matrix) and Tufty (IPS TFT).

use std::borrow::Cow;

use crate::{ButtonConfig, DeviceProfile, DisplayClass, WindowLayout};

/// Button row shared by Blinky and Tufty
const BADGEWARE_BUTTONS: &[ButtonConfig] = &[
    ButtonConfig::new("A", "a", 7),
    ButtonConfig::new("B", "s", 8),
    ButtonConfig::new("C", "d", 9),
    ButtonConfig::new("UP", "up", 22),
    ButtonConfig::new("DOWN", "down", 6),
];

/// Badger 2350 (296×128, 1-bit e-ink)
///
/// - Refresh: ~500ms simulated full update
/// - Five front buttons
pub const BADGER_2350: DeviceProfile = DeviceProfile {
    name: Cow::Borrowed("Badger 2350"),
    description: Cow::Borrowed("2.9\" e-ink monochrome badge with buttons"),
    class: DisplayClass::EInk,
    width: 296,
    height: 128,
    color_depth: 1,
    is_color: false,
    eink_colors: 2,
    eink_refresh_ms: 500,
    display_scale: 2,
    layout: WindowLayout::STANDARD,
    buttons: Cow::Borrowed(&[
        ButtonConfig::new("A", "a", 12),
        ButtonConfig::new("B", "s", 13),
        ButtonConfig::new("C", "d", 14),
        ButtonConfig::new("UP", "up", 15),
        ButtonConfig::new("DOWN", "down", 11),
    ]),
    has_touch: false,
    has_button_leds: false,
    has_busy_led: false,
    heap_size: 256 * 1024,
};

/// Blinky 2350 (39×26 white LED matrix, 872 LEDs)
///
/// 8-bit brightness per LED. `display_scale` is the LED pitch.
pub const BLINKY_2350: DeviceProfile = DeviceProfile {
    name: Cow::Borrowed("Blinky 2350"),
    description: Cow::Borrowed("3.6\" white LED matrix badge (872 LEDs)"),
    class: DisplayClass::LedMatrix,
    width: 39,
    height: 26,
    color_depth: 8,
    is_color: false,
    eink_colors: 2,
    eink_refresh_ms: 0,
    display_scale: 12,
    layout: WindowLayout::LedGrid,
    buttons: Cow::Borrowed(BADGEWARE_BUTTONS),
    has_touch: false,
    has_button_leds: false,
    has_busy_led: false,
    heap_size: 256 * 1024,
};

/// Tufty 2350 (320×240, 16-bit IPS TFT)
pub const TUFTY_2350: DeviceProfile = DeviceProfile {
    name: Cow::Borrowed("Tufty 2350"),
    description: Cow::Borrowed("2.8\" IPS TFT color badge with buttons"),
    class: DisplayClass::Panel,
    width: 320,
    height: 240,
    color_depth: 16,
    is_color: true,
    eink_colors: 2,
    eink_refresh_ms: 0,
    display_scale: 2,
    layout: WindowLayout::STANDARD,
    buttons: Cow::Borrowed(BADGEWARE_BUTTONS),
    has_touch: false,
    has_button_leds: false,
    has_busy_led: false,
    heap_size: 256 * 1024,
};
