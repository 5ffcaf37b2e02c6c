//! Shared input state read by the renderer each tick.
//!
//! The input collaborator (keyboard mapping, GPIO simulation, touch) writes
//! through an [`InputHandle`]; the renderer takes a [`InputState`] snapshot
//! per tick and draws button indicators, the touch marker and LEDs from it.
//!
//! - Buttons are keyed by GPIO pin ([`ButtonId`]).
//! - LEDs are keyed by name: `button_<name>_led` for per-button LEDs and
//!   `busy` for the e-ink busy LED (see [`button_led_key`], [`BUSY_LED`]).

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use badge_specs::DeviceProfile;

/// Button identifier: the GPIO pin from the device's button table
pub type ButtonId = u8;

/// LED key of the e-ink busy indicator
pub const BUSY_LED: &str = "busy";

/// LED key of the indicator next to a button
pub fn button_led_key(button_name: &str) -> String {
    format!("button_{}_led", button_name.to_ascii_lowercase())
}

/// Most recent touch contact, in display coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    /// Display x
    pub x: u32,
    /// Display y
    pub y: u32,
    /// Finger currently down
    pub pressed: bool,
}

/// Snapshot of all simulated inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    /// Pressed state per button
    pub buttons: BTreeMap<ButtonId, bool>,
    /// Last touch contact
    pub touch: Option<TouchPoint>,
    /// On/off state per LED
    pub leds: BTreeMap<String, bool>,
}

impl InputState {
    /// Button currently held
    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.buttons.get(&id).copied().unwrap_or(false)
    }

    /// LED currently lit
    pub fn led(&self, key: &str) -> bool {
        self.leds.get(key).copied().unwrap_or(false)
    }
}

/// Shared, clonable writer/reader of [`InputState`]
#[derive(Debug, Clone, Default)]
pub struct InputHandle {
    state: Arc<RwLock<InputState>>,
}

impl InputHandle {
    /// Fresh handle with nothing pressed
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self, f: impl FnOnce(&mut InputState)) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> InputState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record a button press or release
    pub fn set_button(&self, id: ButtonId, pressed: bool) {
        self.write(|s| {
            s.buttons.insert(id, pressed);
        });
    }

    /// Record a touch contact (`None` clears it)
    pub fn set_touch(&self, touch: Option<TouchPoint>) {
        self.write(|s| s.touch = touch);
    }

    /// Switch an LED on or off
    pub fn set_led(&self, key: &str, on: bool) {
        self.write(|s| {
            s.leds.insert(key.to_owned(), on);
        });
    }

    /// Map a host key to the profile's button and record it
    ///
    /// Returns the button's pin, or `None` when no button uses `key`.
    pub fn press_key(&self, profile: &DeviceProfile, key: &str, pressed: bool) -> Option<ButtonId> {
        let pin = profile.button_by_key(key)?.pin;
        self.set_button(pin, pressed);
        tracing::trace!(key, pin, pressed, "button");
        Some(pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use badge_specs::devices;

    #[test]
    fn test_button_led_key() {
        assert_eq!(button_led_key("A"), "button_a_led");
        assert_eq!(button_led_key("UP"), "button_up_led");
    }

    #[test]
    fn test_press_key_maps_through_profile() {
        let input = InputHandle::new();
        let profile = devices::BADGER_2350;
        assert_eq!(input.press_key(&profile, "S", true), Some(13));
        assert!(input.snapshot().is_pressed(13));
        assert_eq!(input.press_key(&profile, "s", false), Some(13));
        assert!(!input.snapshot().is_pressed(13));
        assert_eq!(input.press_key(&profile, "q", true), None);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let input = InputHandle::new();
        input.set_led(BUSY_LED, true);
        let before = input.snapshot();
        input.set_led(BUSY_LED, false);
        assert!(before.led(BUSY_LED));
        assert!(!input.snapshot().led(BUSY_LED));
    }

    #[test]
    fn test_touch() {
        let input = InputHandle::new();
        let point = TouchPoint {
            x: 10,
            y: 20,
            pressed: true,
        };
        input.set_touch(Some(point));
        assert_eq!(input.snapshot().touch, Some(point));
        input.set_touch(None);
        assert_eq!(input.snapshot().touch, None);
    }

    #[test]
    fn test_clones_share_state() {
        let input = InputHandle::new();
        let writer = input.clone();
        std::thread::spawn(move || writer.set_button(4, true))
            .join()
            .unwrap();
        assert!(input.snapshot().is_pressed(4));
    }
}
