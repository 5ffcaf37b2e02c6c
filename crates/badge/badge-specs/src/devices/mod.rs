//! Built-in device catalogue
//!
//! Profiles for the supported boards plus name lookup with the short aliases
//! accepted on the command line (`"badger"`, `"inky_frame_58"`, ...).

pub mod badgeware;
pub mod inky;
pub mod presto;

pub use badgeware::*;
pub use inky::*;
pub use presto::*;

use crate::DeviceProfile;

/// Every built-in profile, in catalogue order
pub const ALL: &[&DeviceProfile] = &[
    &BADGER_2350,
    &BLINKY_2350,
    &TUFTY_2350,
    &PRESTO,
    &INKY_FRAME_7_3,
    &INKY_FRAME_5_8,
    &INKY_FRAME_4_0,
    &INKY_IMPRESSION_7_3,
    &INKY_IMPRESSION_5_7,
    &INKY_IMPRESSION_4_0,
];

/// Alias table: lowercase name → profile
const ALIASES: &[(&str, &DeviceProfile)] = &[
    ("badger", &BADGER_2350),
    ("badger2040", &BADGER_2350),
    ("badger2350", &BADGER_2350),
    ("blinky", &BLINKY_2350),
    ("blinky2350", &BLINKY_2350),
    ("tufty", &TUFTY_2350),
    ("tufty2350", &TUFTY_2350),
    ("presto", &PRESTO),
    ("inky_frame", &INKY_FRAME_7_3),
    ("inky_frame_7", &INKY_FRAME_7_3),
    ("inky_frame_73", &INKY_FRAME_7_3),
    ("inky_frame_5", &INKY_FRAME_5_8),
    ("inky_frame_58", &INKY_FRAME_5_8),
    ("inky_frame_4", &INKY_FRAME_4_0),
    ("inky_frame_40", &INKY_FRAME_4_0),
    ("impression", &INKY_IMPRESSION_5_7),
    ("impression_73", &INKY_IMPRESSION_7_3),
    ("impression_57", &INKY_IMPRESSION_5_7),
    ("impression_40", &INKY_IMPRESSION_4_0),
    ("inky_impression", &INKY_IMPRESSION_5_7),
    ("inky_impression_73", &INKY_IMPRESSION_7_3),
    ("inky_impression_57", &INKY_IMPRESSION_5_7),
    ("inky_impression_40", &INKY_IMPRESSION_4_0),
];

/// Look up a built-in profile by alias (case-insensitive)
pub fn by_name(name: &str) -> Option<&'static DeviceProfile> {
    ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map(|(_, profile)| *profile)
}

/// All accepted aliases, in table order
pub fn names() -> impl Iterator<Item = &'static str> {
    ALIASES.iter().map(|(alias, _)| *alias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DisplayClass;

    #[test]
    fn test_all_profiles_validate() {
        for profile in ALL {
            assert!(profile.validate().is_ok(), "{} invalid", profile.name);
        }
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("badger"), Some(&BADGER_2350));
        assert_eq!(by_name("BLINKY"), Some(&BLINKY_2350));
        assert_eq!(by_name("inky_frame_58"), Some(&INKY_FRAME_5_8));
        assert_eq!(by_name("impression"), Some(&INKY_IMPRESSION_5_7));
        assert!(by_name("gameboy").is_none());
    }

    #[test]
    fn test_every_alias_resolves() {
        for alias in names() {
            assert!(by_name(alias).is_some(), "{alias}");
        }
    }

    #[test]
    fn test_eink_profiles_declare_refresh() {
        for profile in ALL.iter().filter(|p| p.class == DisplayClass::EInk) {
            assert!(profile.eink_refresh_ms > 0, "{}", profile.name);
        }
    }

    #[test]
    fn test_inky_frame_window() {
        assert_eq!(INKY_FRAME_7_3.window_size(), (900, 560));
        assert_eq!(INKY_IMPRESSION_7_3.window_size(), (860, 540));
        let rect = INKY_IMPRESSION_7_3.display_rect();
        assert_eq!((rect.x, rect.y), (30, 30));
    }

    #[test]
    fn test_frame_palettes() {
        assert_eq!(INKY_FRAME_7_3.palette().len(), 6);
        assert_eq!(INKY_FRAME_4_0.palette().len(), 7);
        assert_eq!(BADGER_2350.palette().len(), 2);
    }
}
