//! Inky Frame and Inky Impression color e-ink displays
//!
//! Inky Frame boards carry five buttons with indicator LEDs and a busy LED.
//! Inky Impression boards are Raspberry Pi HATs with no buttons and no
//! tracked heap.

use std::borrow::Cow;

use crate::{ButtonConfig, DeviceProfile, DisplayClass, WindowLayout};

const INKY_FRAME_BUTTONS: &[ButtonConfig] = &[
    ButtonConfig::new("A", "a", 0),
    ButtonConfig::new("B", "s", 1),
    ButtonConfig::new("C", "d", 2),
    ButtonConfig::new("D", "f", 3),
    ButtonConfig::new("E", "g", 4),
];

/// HAT window: 30px frame on every side
const IMPRESSION_LAYOUT: WindowLayout = WindowLayout::Centered {
    margin_x: 60,
    margin_y: 60,
    scale_margins: false,
};

/// Inky Frame 7.3" (800×480, Spectra 6)
///
/// - Full refresh: ~20s
pub const INKY_FRAME_7_3: DeviceProfile = DeviceProfile {
    name: Cow::Borrowed("Inky Frame 7.3\""),
    description: Cow::Borrowed("7.3\" e-ink (800x480, 6 colors) with RP2350 Pico 2 W"),
    class: DisplayClass::EInk,
    width: 800,
    height: 480,
    color_depth: 4,
    is_color: true,
    eink_colors: 6,
    eink_refresh_ms: 20_000,
    display_scale: 1,
    layout: WindowLayout::STANDARD,
    buttons: Cow::Borrowed(INKY_FRAME_BUTTONS),
    has_touch: false,
    has_button_leds: true,
    has_busy_led: true,
    heap_size: 256 * 1024,
};

/// Inky Frame 5.8" (600×448, ACeP 7)
///
/// - Full refresh: ~30s
pub const INKY_FRAME_5_8: DeviceProfile = DeviceProfile {
    name: Cow::Borrowed("Inky Frame 5.8\""),
    description: Cow::Borrowed("5.8\" e-ink (600x448, 7 colors) with RP2040"),
    class: DisplayClass::EInk,
    width: 600,
    height: 448,
    color_depth: 4,
    is_color: true,
    eink_colors: 7,
    eink_refresh_ms: 30_000,
    display_scale: 1,
    layout: WindowLayout::STANDARD,
    buttons: Cow::Borrowed(INKY_FRAME_BUTTONS),
    has_touch: false,
    has_button_leds: true,
    has_busy_led: true,
    heap_size: 192 * 1024,
};

/// Inky Frame 4.0" (640×400, ACeP 7)
pub const INKY_FRAME_4_0: DeviceProfile = DeviceProfile {
    name: Cow::Borrowed("Inky Frame 4.0\""),
    description: Cow::Borrowed("4.0\" e-ink (640x400, 7 colors) with RP2040"),
    class: DisplayClass::EInk,
    width: 640,
    height: 400,
    color_depth: 4,
    is_color: true,
    eink_colors: 7,
    eink_refresh_ms: 30_000,
    display_scale: 1,
    layout: WindowLayout::STANDARD,
    buttons: Cow::Borrowed(INKY_FRAME_BUTTONS),
    has_touch: false,
    has_button_leds: true,
    has_busy_led: true,
    heap_size: 192 * 1024,
};

/// Inky Impression 7.3" (800×480, Spectra 6 HAT)
pub const INKY_IMPRESSION_7_3: DeviceProfile = DeviceProfile {
    name: Cow::Borrowed("Inky Impression 7.3\" (Spectra)"),
    description: Cow::Borrowed("7.3\" e-ink (800x480, 6 colors) Raspberry Pi HAT"),
    class: DisplayClass::EInk,
    width: 800,
    height: 480,
    color_depth: 4,
    is_color: true,
    eink_colors: 6,
    eink_refresh_ms: 20_000,
    display_scale: 1,
    layout: IMPRESSION_LAYOUT,
    buttons: Cow::Borrowed(&[]),
    has_touch: false,
    has_button_leds: false,
    has_busy_led: false,
    heap_size: 0,
};

/// Inky Impression 5.7" (600×448, ACeP 7 HAT)
pub const INKY_IMPRESSION_5_7: DeviceProfile = DeviceProfile {
    name: Cow::Borrowed("Inky Impression 5.7\""),
    description: Cow::Borrowed("5.7\" e-ink (600x448, 7 colors) Raspberry Pi HAT"),
    class: DisplayClass::EInk,
    width: 600,
    height: 448,
    color_depth: 4,
    is_color: true,
    eink_colors: 7,
    eink_refresh_ms: 30_000,
    display_scale: 1,
    layout: IMPRESSION_LAYOUT,
    buttons: Cow::Borrowed(&[]),
    has_touch: false,
    has_button_leds: false,
    has_busy_led: false,
    heap_size: 0,
};

/// Inky Impression 4.0" (640×400, ACeP 7 HAT)
pub const INKY_IMPRESSION_4_0: DeviceProfile = DeviceProfile {
    name: Cow::Borrowed("Inky Impression 4.0\""),
    description: Cow::Borrowed("4.0\" e-ink (640x400, 7 colors) Raspberry Pi HAT"),
    class: DisplayClass::EInk,
    width: 640,
    height: 400,
    color_depth: 4,
    is_color: true,
    eink_colors: 7,
    eink_refresh_ms: 30_000,
    display_scale: 1,
    layout: IMPRESSION_LAYOUT,
    buttons: Cow::Borrowed(&[]),
    has_touch: false,
    has_button_leds: false,
    has_busy_led: false,
    heap_size: 0,
};
