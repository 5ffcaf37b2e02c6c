//! Presto touchscreen desktop display

use std::borrow::Cow;

use crate::{DeviceProfile, DisplayClass, WindowLayout};

/// Presto (480×480 IPS touchscreen)
///
/// No physical buttons; margins leave room for the ambient LED ring and
/// grow with the display scale.
pub const PRESTO: DeviceProfile = DeviceProfile {
    name: Cow::Borrowed("Presto"),
    description: Cow::Borrowed("4\" IPS touchscreen desktop companion with WiFi"),
    class: DisplayClass::Panel,
    width: 480,
    height: 480,
    color_depth: 16,
    is_color: true,
    eink_colors: 2,
    eink_refresh_ms: 0,
    display_scale: 1,
    layout: WindowLayout::Centered {
        margin_x: 120,
        margin_y: 100,
        scale_margins: true,
    },
    buttons: Cow::Borrowed(&[]),
    has_touch: true,
    has_button_leds: false,
    has_busy_led: false,
    heap_size: 256 * 1024,
};
