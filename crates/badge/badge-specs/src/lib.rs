//! Badge Device Specifications
//!
//! Declarative descriptions of the small display devices the simulator can
//! stand in for: direct-color TFT panels, brightness-modulated LED matrices and
//! palette-limited e-ink panels.
//!
//! # Features
//!
//! - **Device catalogue** - Built-in profiles for Badger, Blinky, Tufty, Presto,
//!   Inky Frame and Inky Impression devices
//! - **Window geometry** - Each profile knows how large its host window is and
//!   where the display sits inside it
//! - **Palettes** - Fixed reference colors used by color e-ink quantization
//! - **Serde support** - Optional loading of custom profiles from JSON
//!
//! # Example
//!
//! ```
//! use badge_specs::devices::BADGER_2350;
//! use badge_specs::DisplayClass;
//!
//! let profile = BADGER_2350;
//! assert_eq!(profile.class, DisplayClass::EInk);
//! println!("{}: {}×{}", profile.name, profile.width, profile.height);
//! println!("Window: {:?}", profile.window_size());
//! ```
//!
//! # Custom Profiles
//!
//! ```
//! use std::borrow::Cow;
//! use badge_specs::{DeviceProfile, DisplayClass, WindowLayout};
//!
//! const MY_PANEL: DeviceProfile = DeviceProfile {
//!     name: Cow::Borrowed("Bench Panel"),
//!     description: Cow::Borrowed("160x80 test TFT"),
//!     class: DisplayClass::Panel,
//!     width: 160,
//!     height: 80,
//!     color_depth: 16,
//!     is_color: true,
//!     eink_colors: 2,
//!     eink_refresh_ms: 0,
//!     display_scale: 3,
//!     layout: WindowLayout::STANDARD,
//!     buttons: Cow::Borrowed(&[]),
//!     has_touch: false,
//!     has_button_leds: false,
//!     has_busy_led: false,
//!     heap_size: 0,
//! };
//! assert!(MY_PANEL.validate().is_ok());
//! ```

mod device_profile;
pub mod devices;
mod palette;

pub use device_profile::{
    ButtonConfig, DeviceProfile, DisplayClass, ProfileError, WindowLayout, WindowRect,
    MAX_DIMENSION,
};
pub use palette::Palette;
