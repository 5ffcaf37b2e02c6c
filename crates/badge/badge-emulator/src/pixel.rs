//! Tagged pixel values and per-class raw decoding
//!
//! Application code hands the emulator dense `u32` grids. Each display class
//! reads those integers differently, so the raw value is decoded into a
//! [`Pixel`] once, when the frame is built, and never re-interpreted later:
//!
//! - Panels (and color LED matrices) store packed `0xRRGGBB`
//! - Monochrome LED matrices store a brightness in the low byte
//! - E-ink mixes pen indices (0-15), raw grayscale (16-255) and packed RGB
//!   (anything larger) depending on the call site

use badge_specs::{DeviceProfile, DisplayClass};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

/// One framebuffer cell
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Pixel {
    /// Small scalar: brightness, grayscale level or pen index
    Indexed(u8),
    /// 24-bit color
    Rgb(u8, u8, u8),
}

impl Pixel {
    /// Black in packed-RGB form
    pub const BLACK: Pixel = Pixel::Rgb(0, 0, 0);

    /// Decode packed `0xRRGGBB` (upper byte ignored)
    pub const fn from_packed(raw: u32) -> Self {
        let (r, g, b) = unpack_rgb(raw);
        Pixel::Rgb(r, g, b)
    }

    /// Packed external form, as application code would have written it
    pub const fn to_raw(self) -> u32 {
        match self {
            Pixel::Indexed(v) => v as u32,
            Pixel::Rgb(r, g, b) => pack_rgb(r, g, b),
        }
    }

    /// Direct interpretation: scalar broadcast to all channels, RGB unchanged
    pub const fn to_rgb888(self) -> Rgb888 {
        match self {
            Pixel::Indexed(v) => Rgb888::new(v, v, v),
            Pixel::Rgb(r, g, b) => Rgb888::new(r, g, b),
        }
    }
}

impl Default for Pixel {
    fn default() -> Self {
        Pixel::Indexed(0)
    }
}

impl From<Rgb888> for Pixel {
    fn from(color: Rgb888) -> Self {
        Pixel::Rgb(color.r(), color.g(), color.b())
    }
}

/// How raw integers are decoded for a display class
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelFormat {
    /// Every value is packed RGB
    Packed,
    /// Low byte is a brightness level
    Brightness,
    /// `≤ 255` is a pen index or grayscale level, larger values are packed RGB
    PenOrRgb,
}

impl PixelFormat {
    /// Format implied by a device profile
    pub fn for_profile(profile: &DeviceProfile) -> Self {
        match profile.class {
            DisplayClass::Panel => PixelFormat::Packed,
            DisplayClass::LedMatrix if profile.is_color => PixelFormat::Packed,
            DisplayClass::LedMatrix => PixelFormat::Brightness,
            DisplayClass::EInk => PixelFormat::PenOrRgb,
        }
    }

    /// Decode one raw value
    pub const fn decode(self, raw: u32) -> Pixel {
        match self {
            PixelFormat::Packed => Pixel::from_packed(raw),
            PixelFormat::Brightness => Pixel::Indexed((raw & 0xFF) as u8),
            PixelFormat::PenOrRgb => {
                if raw > 0xFF {
                    Pixel::from_packed(raw)
                } else {
                    Pixel::Indexed(raw as u8)
                }
            }
        }
    }
}

/// Split packed `0xRRGGBB` into channels
pub const fn unpack_rgb(raw: u32) -> (u8, u8, u8) {
    (
        ((raw >> 16) & 0xFF) as u8,
        ((raw >> 8) & 0xFF) as u8,
        (raw & 0xFF) as u8,
    )
}

/// Pack channels into `0xRRGGBB`
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// ITU-R BT.601 luma, truncated: `⌊0.299R + 0.587G + 0.114B⌋`
///
/// Computed in integer thousandths so the result is exact.
pub const fn luma(r: u8, g: u8, b: u8) -> u8 {
    // SAFETY: 299 + 587 + 114 = 1000, so the sum is at most 255_000 and the
    // quotient at most 255.
    #[allow(clippy::arithmetic_side_effects)]
    let y = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
    y as u8
}

/// Luma of an [`Rgb888`]
pub fn luma_of(color: Rgb888) -> u8 {
    luma(color.r(), color.g(), color.b())
}

/// ARGB (`0xFFRRGGBB`) word for softbuffer-style surfaces
pub fn to_argb(color: Rgb888) -> u32 {
    0xFF00_0000 | pack_rgb(color.r(), color.g(), color.b())
}

/// Inverse of [`to_argb`] (alpha ignored)
pub const fn from_argb(word: u32) -> Rgb888 {
    let (r, g, b) = unpack_rgb(word);
    Rgb888::new(r, g, b)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;

    #[test]
    fn test_pen_or_rgb_decoding() {
        let f = PixelFormat::PenOrRgb;
        assert_eq!(f.decode(0), Pixel::Indexed(0));
        assert_eq!(f.decode(15), Pixel::Indexed(15));
        assert_eq!(f.decode(16), Pixel::Indexed(16));
        assert_eq!(f.decode(255), Pixel::Indexed(255));
        assert_eq!(f.decode(256), Pixel::Rgb(0, 1, 0));
        assert_eq!(f.decode(0xFF8000), Pixel::Rgb(255, 128, 0));
    }

    #[test]
    fn test_brightness_decoding_uses_low_byte() {
        let f = PixelFormat::Brightness;
        assert_eq!(f.decode(200), Pixel::Indexed(200));
        assert_eq!(f.decode(0x1234C8), Pixel::Indexed(0xC8));
    }

    #[test]
    fn test_packed_decoding() {
        assert_eq!(PixelFormat::Packed.decode(0x00FF00), Pixel::Rgb(0, 255, 0));
        assert_eq!(PixelFormat::Packed.decode(5), Pixel::Rgb(0, 0, 5));
        assert_eq!(PixelFormat::Packed.decode(0xAA102030), Pixel::Rgb(0x10, 0x20, 0x30));
    }

    #[test]
    fn test_to_raw() {
        assert_eq!(Pixel::Indexed(7).to_raw(), 7);
        assert_eq!(Pixel::Rgb(0x12, 0x34, 0x56).to_raw(), 0x123456);
        assert_eq!(PixelFormat::PenOrRgb.decode(0x123456).to_raw(), 0x123456);
    }

    #[test]
    fn test_luma() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        // 0.299 * 255 = 76.245
        assert_eq!(luma(255, 0, 0), 76);
        // 0.587 * 255 = 149.685
        assert_eq!(luma(0, 255, 0), 149);
        // 0.114 * 255 = 29.07
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn test_luma_keeps_grays() {
        for v in 0..=255u8 {
            assert_eq!(luma(v, v, v), v, "gray {v}");
        }
    }

    #[test]
    fn test_argb_roundtrip() {
        let c = Rgb888::new(1, 2, 3);
        assert_eq!(to_argb(c), 0xFF010203);
        assert_eq!(from_argb(to_argb(c)), c);
    }

    #[test]
    fn test_format_for_profile() {
        let mut profile = badge_specs::devices::BLINKY_2350;
        assert_eq!(PixelFormat::for_profile(&profile), PixelFormat::Brightness);
        profile.is_color = true;
        assert_eq!(PixelFormat::for_profile(&profile), PixelFormat::Packed);
        assert_eq!(
            PixelFormat::for_profile(&badge_specs::devices::BADGER_2350),
            PixelFormat::PenOrRgb
        );
        assert_eq!(
            PixelFormat::for_profile(&badge_specs::devices::TUFTY_2350),
            PixelFormat::Packed
        );
    }
}
