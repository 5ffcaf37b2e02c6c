//! Application-side framebuffer
//!
//! A fixed-size, row-major grid of [`Pixel`]. Out-of-range writes are
//! clipped; the dimensions never change after construction.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use crate::error::{EmulatorError, Result};
use crate::pixel::{Pixel, PixelFormat};

/// Raw frame produced by application drawing calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<Pixel>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    /// Create a frame filled with `Pixel::Indexed(0)`
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Pixel::default())
    }

    /// Create a frame filled with `pixel`
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        let size = (width as usize).saturating_mul(height as usize);
        Self {
            pixels: vec![pixel; size],
            width,
            height,
        }
    }

    /// Decode a dense row-major `u32` grid
    ///
    /// Fails with [`EmulatorError::BufferLength`] when `raw` does not hold
    /// exactly `width × height` values.
    pub fn from_raw(width: u32, height: u32, raw: &[u32], format: PixelFormat) -> Result<Self> {
        let expected = (width as usize).saturating_mul(height as usize);
        if raw.len() != expected {
            return Err(EmulatorError::BufferLength {
                expected,
                actual: raw.len(),
            });
        }
        Ok(Self {
            pixels: raw.iter().map(|&v| format.decode(v)).collect(),
            width,
            height,
        })
    }

    /// Wrap already-decoded pixels
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self> {
        let expected = (width as usize).saturating_mul(height as usize);
        if pixels.len() != expected {
            return Err(EmulatorError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
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

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True for a zero-area frame
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    // SAFETY: x < width and y < height, so the index is below
    // width * height, which is the (non-overflowing) buffer length.
    #[allow(clippy::arithmetic_side_effects)]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Set pixel at coordinates (ignored when out of range)
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        if let Some(slot) = self.index(x, y).and_then(|i| self.pixels.get_mut(i)) {
            *slot = pixel;
        }
    }

    /// Get pixel at coordinates
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        self.index(x, y).and_then(|i| self.pixels.get(i)).copied()
    }

    /// Fill the whole frame
    pub fn fill(&mut self, pixel: Pixel) {
        self.pixels.fill(pixel);
    }

    /// All pixels, row-major
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        self.pixels.chunks(self.width.max(1) as usize)
    }

    /// Re-encode as the packed external `u32` form
    pub fn to_raw(&self) -> Vec<u32> {
        self.pixels.iter().map(|p| p.to_raw()).collect()
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = embedded_graphics::Pixel<Self::Color>>,
    {
        for embedded_graphics::Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.set_pixel(x, y, Pixel::from(color));
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> core::result::Result<(), Self::Error> {
        self.fill(Pixel::from(color));
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
