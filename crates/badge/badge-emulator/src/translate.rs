//! Color translation per display class
//!
//! Turns decoded [`Pixel`]s into the colors the physical display would show:
//!
//! | Class | Strategy |
//! |-------|----------|
//! | Panel | direct pass-through |
//! | LED matrix | brightness broadcast plus optional glow halo |
//! | Mono e-ink | luma threshold with 2×2 ordered dithering |
//! | Color e-ink | nearest palette entry plus warm paper offset |

use badge_specs::{DeviceProfile, DisplayClass, Palette};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;
use crate::display_image::DisplayImage;
use crate::framebuffer::FrameBuffer;
use crate::pixel::{luma, Pixel};

/// Highest value treated as a pen index on e-ink devices
pub const MAX_PEN_INDEX: u8 = 15;

/// Channel level above which an LED is bright enough to glow
pub const GLOW_THRESHOLD: u8 = 50;

/// Upper bound on glow opacity
pub const GLOW_MAX_ALPHA: u8 = 150;

/// Extra radius of the glow halo beyond the LED disc
pub const GLOW_EXTRA_RADIUS: u32 = 2;

/// Paper and ink tone constants for e-ink translation
///
/// The defaults reproduce the look of the reference panels. They are
/// empirical and can be overridden in [`RenderConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InkTone {
    /// Mono "white" (slightly warm paper)
    pub white: [u8; 3],
    /// Mono "black"
    pub black: [u8; 3],
    /// Dither threshold center
    pub dither_base: u8,
    /// Dither threshold swing per axis
    pub dither_amplitude: u8,
    /// Warm shift subtracted from color matches (R, G, B)
    pub warm_offset: [u8; 3],
}

impl InkTone {
    /// Reference tone
    pub const DEFAULT: Self = Self {
        white: [245, 245, 240],
        black: [30, 30, 35],
        dither_base: 128,
        dither_amplitude: 16,
        warm_offset: [10, 10, 5],
    };

    /// Ink white as a color
    pub const fn white(&self) -> Rgb888 {
        Rgb888::new(self.white[0], self.white[1], self.white[2])
    }

    /// Ink black as a color
    pub const fn black(&self) -> Rgb888 {
        Rgb888::new(self.black[0], self.black[1], self.black[2])
    }

    /// Ordered-dither threshold for a position
    ///
    /// `base + ((x % 2) * 2a - a) + ((y % 2) * 2a - a)`, so the 2×2 tile is
    /// `[base - 2a, base; base, base + 2a]`.
    pub fn dither_threshold(&self, x: u32, y: u32) -> i32 {
        let a = i32::from(self.dither_amplitude);
        let step = |v: u32| if v % 2 == 1 { a } else { -a };
        i32::from(self.dither_base)
            .saturating_add(step(x))
            .saturating_add(step(y))
    }

    /// Mono ink decision: white when luma exceeds the threshold
    pub fn is_white(&self, y_luma: u8, x: u32, y: u32, dither: bool) -> bool {
        let threshold = if dither {
            self.dither_threshold(x, y)
        } else {
            i32::from(self.dither_base)
        };
        i32::from(y_luma) > threshold
    }

    /// Apply the warm offset to a palette match
    ///
    /// A channel is only reduced when it exceeds its offset; otherwise it is
    /// kept as is.
    pub fn warm(&self, color: [u8; 3]) -> Rgb888 {
        let shift = |c: u8, off: u8| if c > off { c.saturating_sub(off) } else { c };
        Rgb888::new(
            shift(color[0], self.warm_offset[0]),
            shift(color[1], self.warm_offset[1]),
            shift(color[2], self.warm_offset[2]),
        )
    }
}

impl Default for InkTone {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Pen index `0..=15` → gray `0..=255` (`v * 255 / 15`)
pub const fn pen_to_gray(v: u8) -> u8 {
    // SAFETY: callers pass v <= 15; u16 holds 15 * 255.
    #[allow(clippy::arithmetic_side_effects)]
    let gray = (v as u16 * 255) / MAX_PEN_INDEX as u16;
    if gray > 255 {
        255
    } else {
        gray as u8
    }
}

/// Squared Euclidean RGB distance
pub fn distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&p, &q)| {
            let d = u32::from(p.abs_diff(q));
            d.saturating_mul(d)
        })
        .fold(0u32, u32::saturating_add)
}

/// Index of the nearest palette entry; the earliest entry wins ties
pub fn nearest_index(color: [u8; 3], palette: &Palette) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, &candidate) in palette.colors.iter().enumerate() {
        let dist = distance_sq(color, candidate);
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((i, dist));
        }
    }
    best.map(|(i, _)| i)
}

/// Nearest palette color; an empty palette falls back to black/white
pub fn nearest_color(color: [u8; 3], palette: &Palette) -> [u8; 3] {
    let palette = if palette.is_empty() {
        &Palette::BLACK_WHITE
    } else {
        palette
    };
    nearest_index(color, palette)
        .and_then(|i| palette.colors.get(i))
        .copied()
        .unwrap_or([0, 0, 0])
}

/// Soft halo drawn beneath a bright LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glow {
    /// Halo radius in window pixels
    pub radius: u32,
    /// Halo opacity, `0..=GLOW_MAX_ALPHA`
    pub alpha: u8,
}

/// Rendering of one LED matrix cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedCell {
    /// Solid disc color
    pub color: Rgb888,
    /// Disc radius
    pub radius: u32,
    /// Halo, when the LED is bright enough and glow is enabled
    pub glow: Option<Glow>,
}

/// Describe how an LED of `color` is drawn
pub fn led_cell(color: Rgb888, led_radius: u32, glow_enabled: bool) -> LedCell {
    let (r, g, b) = (color.r(), color.g(), color.b());
    let bright = r > GLOW_THRESHOLD || g > GLOW_THRESHOLD || b > GLOW_THRESHOLD;
    let glow = (glow_enabled && bright).then(|| {
        let avg = (u32::from(r) + u32::from(g) + u32::from(b)) / 3;
        Glow {
            radius: led_radius.saturating_add(GLOW_EXTRA_RADIUS),
            alpha: u8::try_from(avg.min(u32::from(GLOW_MAX_ALPHA))).unwrap_or(GLOW_MAX_ALPHA),
        }
    });
    LedCell {
        color,
        radius: led_radius,
        glow,
    }
}

/// Per-class pixel → color mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorTranslator {
    /// TFT/IPS panel: colors shown as written
    Direct,
    /// LED matrix: brightness broadcast (mono) or RGB pass-through (color)
    Brightness {
        /// RGB LEDs
        is_color: bool,
    },
    /// E-ink: palette quantization (color) or dithered threshold (mono)
    EInk {
        /// Color panel
        is_color: bool,
        /// Ordered dithering for mono panels
        dither: bool,
        /// Reference inks for color panels
        palette: Palette,
        /// Paper/ink tone constants
        tone: InkTone,
    },
}

impl ColorTranslator {
    /// Translator for a device under a render configuration
    pub fn for_profile(profile: &DeviceProfile, config: &RenderConfig) -> Self {
        match profile.class {
            DisplayClass::Panel => ColorTranslator::Direct,
            DisplayClass::LedMatrix => ColorTranslator::Brightness {
                is_color: profile.is_color,
            },
            DisplayClass::EInk => ColorTranslator::EInk {
                is_color: profile.is_color,
                dither: config.dither,
                palette: profile.palette(),
                tone: config.ink,
            },
        }
    }

    /// Final color of `pixel` at `(x, y)`
    pub fn translate(&self, pixel: Pixel, x: u32, y: u32) -> Rgb888 {
        match *self {
            ColorTranslator::Direct => pixel.to_rgb888(),
            ColorTranslator::Brightness { is_color } => match pixel {
                Pixel::Indexed(v) => Rgb888::new(v, v, v),
                Pixel::Rgb(r, g, b) if is_color => Rgb888::new(r, g, b),
                Pixel::Rgb(r, g, b) => {
                    let v = luma(r, g, b);
                    Rgb888::new(v, v, v)
                }
            },
            ColorTranslator::EInk {
                is_color,
                dither,
                palette,
                tone,
            } => {
                let [r, g, b] = eink_source(pixel);
                if is_color {
                    tone.warm(nearest_color([r, g, b], &palette))
                } else if tone.is_white(luma(r, g, b), x, y, dither) {
                    tone.white()
                } else {
                    tone.black()
                }
            }
        }
    }

    /// Translate a whole frame
    pub fn translate_frame(&self, frame: &FrameBuffer) -> DisplayImage {
        let width = frame.width();
        let mut pixels = Vec::with_capacity(frame.pixels().len());
        for (y, row) in (0u32..).zip(frame.rows()) {
            for (x, &pixel) in (0u32..).zip(row.iter()) {
                pixels.push(self.translate(pixel, x, y));
            }
        }
        DisplayImage::from_pixels(width, frame.height(), pixels).unwrap_or_else(|| {
            DisplayImage::filled(width, frame.height(), Rgb888::BLACK)
        })
    }
}

/// E-ink source color: pens expand to gray, 16-255 is gray, RGB as is
fn eink_source(pixel: Pixel) -> [u8; 3] {
    match pixel {
        Pixel::Indexed(v) if v <= MAX_PEN_INDEX => {
            let g = pen_to_gray(v);
            [g, g, g]
        }
        Pixel::Indexed(v) => [v, v, v],
        Pixel::Rgb(r, g, b) => [r, g, b],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PixelFormat;

    const INK_WHITE: Rgb888 = Rgb888::new(245, 245, 240);
    const INK_BLACK: Rgb888 = Rgb888::new(30, 30, 35);

    fn mono_eink(dither: bool) -> ColorTranslator {
        ColorTranslator::EInk {
            is_color: false,
            dither,
            palette: Palette::BLACK_WHITE,
            tone: InkTone::DEFAULT,
        }
    }

    fn color_eink(palette: Palette) -> ColorTranslator {
        ColorTranslator::EInk {
            is_color: true,
            dither: true,
            palette,
            tone: InkTone::DEFAULT,
        }
    }

    #[test]
    fn test_direct_panel() {
        let t = ColorTranslator::Direct;
        assert_eq!(t.translate(Pixel::Rgb(1, 2, 3), 0, 0), Rgb888::new(1, 2, 3));
        assert_eq!(t.translate(Pixel::Indexed(9), 0, 0), Rgb888::new(9, 9, 9));
    }

    #[test]
    fn test_mono_led_broadcasts_brightness() {
        let t = ColorTranslator::Brightness { is_color: false };
        assert_eq!(t.translate(Pixel::Indexed(200), 3, 4), Rgb888::new(200, 200, 200));
        assert_eq!(t.translate(Pixel::Rgb(255, 255, 255), 0, 0), Rgb888::WHITE);
    }

    #[test]
    fn test_color_led_passes_rgb() {
        let t = ColorTranslator::Brightness { is_color: true };
        assert_eq!(t.translate(Pixel::Rgb(255, 0, 10), 0, 0), Rgb888::new(255, 0, 10));
    }

    #[test]
    fn test_pen_to_gray() {
        assert_eq!(pen_to_gray(0), 0);
        assert_eq!(pen_to_gray(7), 119);
        assert_eq!(pen_to_gray(8), 136);
        assert_eq!(pen_to_gray(15), 255);
    }

    #[test]
    fn test_dither_tile() {
        let tone = InkTone::DEFAULT;
        assert_eq!(tone.dither_threshold(0, 0), 96);
        assert_eq!(tone.dither_threshold(1, 0), 128);
        assert_eq!(tone.dither_threshold(0, 1), 128);
        assert_eq!(tone.dither_threshold(1, 1), 160);
        assert_eq!(tone.dither_threshold(2, 2), 96);
    }

    #[test]
    fn test_mono_eink_pens() {
        let t = mono_eink(true);
        assert_eq!(t.translate(Pixel::Indexed(0), 0, 0), INK_BLACK);
        assert_eq!(t.translate(Pixel::Indexed(15), 1, 1), INK_WHITE);
    }

    #[test]
    fn test_mono_eink_dithers_mid_gray() {
        // Raw gray 120: above 96, not above 128 or 160
        let t = mono_eink(true);
        let px = Pixel::Indexed(120);
        assert_eq!(t.translate(px, 0, 0), INK_WHITE);
        assert_eq!(t.translate(px, 1, 0), INK_BLACK);
        assert_eq!(t.translate(px, 0, 1), INK_BLACK);
        assert_eq!(t.translate(px, 1, 1), INK_BLACK);
    }

    #[test]
    fn test_mono_eink_without_dither() {
        let t = mono_eink(false);
        assert_eq!(t.translate(Pixel::Indexed(128), 0, 0), INK_BLACK);
        assert_eq!(t.translate(Pixel::Indexed(129), 0, 0), INK_WHITE);
        // Pen 8 → 136 in every position
        assert_eq!(t.translate(Pixel::Indexed(8), 1, 1), INK_WHITE);
    }

    #[test]
    fn test_mono_eink_packed_rgb() {
        let t = mono_eink(false);
        let px = PixelFormat::PenOrRgb.decode(0xFFFFFF);
        assert_eq!(t.translate(px, 0, 0), INK_WHITE);
        let red = PixelFormat::PenOrRgb.decode(0xFF0000);
        // luma 76
        assert_eq!(t.translate(red, 0, 0), INK_BLACK);
    }

    #[test]
    fn test_nearest_color_exact_matches() {
        for palette in [Palette::SPECTRA_6, Palette::ACEP_7] {
            for &c in palette.colors {
                assert_eq!(nearest_color(c, &palette), c);
            }
        }
    }

    #[test]
    fn test_nearest_color_tie_prefers_earliest() {
        let palette = Palette {
            name: "tie",
            colors: &[[0, 0, 10], [0, 0, 30]],
        };
        assert_eq!(nearest_index([0, 0, 20], &palette), Some(0));
        let reversed = Palette {
            name: "tie",
            colors: &[[0, 0, 30], [0, 0, 10]],
        };
        assert_eq!(nearest_index([0, 0, 20], &reversed), Some(0));
        assert_eq!(nearest_index([0, 0, 12], &reversed), Some(1));
    }

    #[test]
    fn test_nearest_color_empty_palette_falls_back() {
        let empty = Palette {
            name: "empty",
            colors: &[],
        };
        assert_eq!(nearest_index([1, 2, 3], &empty), None);
        assert_eq!(nearest_color([250, 250, 250], &empty), [255, 255, 255]);
        assert_eq!(nearest_color([5, 5, 5], &empty), [0, 0, 0]);
    }

    #[test]
    fn test_color_eink_warm_offset() {
        let t = color_eink(Palette::SPECTRA_6);
        // Red (255,0,0) → (245,0,0): G and B are not above their offsets
        assert_eq!(
            t.translate(Pixel::Rgb(250, 10, 10), 0, 0),
            Rgb888::new(245, 0, 0)
        );
        // White → (245,245,250)
        assert_eq!(
            t.translate(Pixel::Indexed(15), 0, 0),
            Rgb888::new(245, 245, 250)
        );
        // Green (0,128,0) → (0,118,0)
        assert_eq!(
            t.translate(Pixel::Rgb(0, 120, 0), 0, 0),
            Rgb888::new(0, 118, 0)
        );
    }

    #[test]
    fn test_warm_keeps_small_channels() {
        let tone = InkTone::DEFAULT;
        assert_eq!(tone.warm([10, 10, 5]), Rgb888::new(10, 10, 5));
        assert_eq!(tone.warm([11, 11, 6]), Rgb888::new(1, 1, 1));
    }

    #[test]
    fn test_acep_orange() {
        let t = color_eink(Palette::ACEP_7);
        assert_eq!(
            t.translate(Pixel::Rgb(250, 120, 10), 0, 0),
            Rgb888::new(245, 118, 0)
        );
    }

    #[test]
    fn test_led_cell_glow() {
        let cell = led_cell(Rgb888::new(200, 200, 200), 5, true);
        assert_eq!(cell.radius, 5);
        assert_eq!(cell.glow, Some(Glow { radius: 7, alpha: 150 }));

        let dim = led_cell(Rgb888::new(60, 0, 0), 5, true);
        assert_eq!(dim.glow, Some(Glow { radius: 7, alpha: 20 }));

        assert_eq!(led_cell(Rgb888::new(50, 50, 50), 5, true).glow, None);
        assert_eq!(led_cell(Rgb888::new(200, 200, 200), 5, false).glow, None);
    }

    #[test]
    fn test_translate_frame() {
        let frame = FrameBuffer::from_raw(2, 1, &[0, 15], PixelFormat::PenOrRgb).unwrap();
        let img = mono_eink(true).translate_frame(&frame);
        assert_eq!(img.get(0, 0), Some(INK_BLACK));
        assert_eq!(img.get(1, 0), Some(INK_WHITE));
    }
}
