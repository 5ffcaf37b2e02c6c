//! Plain-text luminance rendering for headless diagnostics

use std::fmt::Write as _;

use embedded_graphics::pixelcolor::Rgb888;

use crate::display_image::DisplayImage;
use crate::pixel::luma_of;

/// Ten-step brightness ramp, darkest first
pub const ASCII_RAMP: &[u8; 10] = b" .:-=+*#%@";

/// Placeholder returned before the first frame
pub const NO_BUFFER: &str = "(no buffer)";

/// Ramp character for a color
// SAFETY: luma is at most 255, so the product is at most 2550.
#[allow(clippy::arithmetic_side_effects)]
pub fn ramp_char(color: Rgb888) -> char {
    let idx = (usize::from(luma_of(color)) * ASCII_RAMP.len() / 256).min(9);
    ASCII_RAMP.get(idx).copied().map_or(' ', char::from)
}

/// Downsampled ASCII art, at most about `max_width` columns
///
/// Wider images are sampled every `width / max_width + 1` pixels on both
/// axes so the aspect ratio survives.
pub fn image_to_ascii(image: &DisplayImage, max_width: u32) -> String {
    let width = image.width();
    let step = if width > max_width {
        (width / max_width.max(1)).saturating_add(1)
    } else {
        1
    };
    let step = usize::try_from(step).unwrap_or(usize::MAX);

    image
        .rows()
        .step_by(step)
        .map(|row| row.iter().step_by(step).map(|&c| ramp_char(c)).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full-resolution text dump with a metadata header
///
/// ```text
/// === Frame 3 ===
/// Size: 4x2
/// Device: Badger 2350
///
/// @@
/// @@
/// ```
pub fn frame_text(frame: u64, device: &str, image: &DisplayImage) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Frame {frame} ===");
    let _ = writeln!(out, "Size: {}x{}", image.width(), image.height());
    let _ = writeln!(out, "Device: {device}");
    out.push('\n');
    for row in image.rows() {
        out.extend(row.iter().map(|&c| ramp_char(c)));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;

    #[test]
    fn test_ramp_char_extremes() {
        assert_eq!(ramp_char(Rgb888::BLACK), ' ');
        assert_eq!(ramp_char(Rgb888::WHITE), '@');
        // luma 128 → 1280 / 256 = 5
        assert_eq!(ramp_char(Rgb888::new(128, 128, 128)), '+');
        // Ink white luma 244 → 9
        assert_eq!(ramp_char(Rgb888::new(245, 245, 240)), '@');
    }

    #[test]
    fn test_small_image_full_resolution() {
        let mut image = DisplayImage::filled(3, 2, Rgb888::BLACK);
        image.set(1, 1, Rgb888::WHITE);
        assert_eq!(image_to_ascii(&image, 80), "   \n @ ");
    }

    #[test]
    fn test_wide_image_downsampled() {
        let image = DisplayImage::filled(296, 128, Rgb888::WHITE);
        let text = image_to_ascii(&image, 80);
        // step = 296 / 80 + 1 = 4
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 32);
        assert!(lines.iter().all(|l| l.len() == 74));
    }

    #[test]
    fn test_frame_text_header() {
        let image = DisplayImage::filled(2, 1, Rgb888::WHITE);
        assert_eq!(
            frame_text(3, "Badger 2350", &image),
            "=== Frame 3 ===\nSize: 2x1\nDevice: Badger 2350\n\n@@\n"
        );
    }
}
