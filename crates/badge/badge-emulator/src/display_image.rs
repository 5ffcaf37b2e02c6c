//! Translated display content
//!
//! [`DisplayImage`] holds what the physical panel shows after color
//! translation, at native resolution and before any window scaling.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use image::{Rgb, RgbImage};

/// Native-resolution grid of final display colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayImage {
    pixels: Vec<Rgb888>,
    width: u32,
    height: u32,
}

impl DisplayImage {
    /// Uniform image
    pub fn filled(width: u32, height: u32, color: Rgb888) -> Self {
        let size = (width as usize).saturating_mul(height as usize);
        Self {
            pixels: vec![color; size],
            width,
            height,
        }
    }

    /// Build from row-major colors; `None` when the length is wrong
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb888>) -> Option<Self> {
        (pixels.len() == (width as usize).saturating_mul(height as usize)).then_some(Self {
            pixels,
            width,
            height,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    // SAFETY: bounds checked first; the index is below the buffer length.
    #[allow(clippy::arithmetic_side_effects)]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Color at `(x, y)`
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb888> {
        self.index(x, y).and_then(|i| self.pixels.get(i)).copied()
    }

    /// Overwrite `(x, y)` (ignored out of range)
    pub fn set(&mut self, x: u32, y: u32, color: Rgb888) {
        if let Some(slot) = self.index(x, y).and_then(|i| self.pixels.get_mut(i)) {
            *slot = color;
        }
    }

    /// All colors, row-major
    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb888]> {
        self.pixels.chunks(self.width.max(1) as usize)
    }

    /// Fill with one color
    pub fn fill(&mut self, color: Rgb888) {
        self.pixels.fill(color);
    }

    /// Copy with every channel inverted (`255 - c`)
    pub fn inverted(&self) -> Self {
        Self {
            pixels: self
                .pixels
                .iter()
                .map(|c| Rgb888::new(!c.r(), !c.g(), !c.b()))
                .collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// True when every pixel equals `color`
    pub fn is_uniform(&self, color: Rgb888) -> bool {
        self.pixels.iter().all(|&c| c == color)
    }

    /// Convert to an `image` buffer for export
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut img = RgbImage::new(self.width, self.height);
        for (dst, src) in img.pixels_mut().zip(self.pixels.iter()) {
            *dst = Rgb([src.r(), src.g(), src.b()]);
        }
        img
    }
}
