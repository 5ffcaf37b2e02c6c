//! Window-sized ARGB surface the renderer composes into
//!
//! Pixels are stored as `0xAARRGGBB`, the layout softbuffer presents, so a
//! composed canvas is copied into the window buffer without conversion.
//! Drawing is clipped to the canvas; embedded-graphics primitives and text
//! render through the [`DrawTarget`] impl.

use std::convert::Infallible;

use embedded_graphics::{
    geometry::{OriginDimensions, Point, Size},
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::{Rgb888, RgbColor},
    prelude::*,
    primitives::{Circle, PointsIter, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use image::{Rgb, RgbImage};

use crate::display_image::DisplayImage;
use crate::pixel::{from_argb, to_argb};

/// Glyph width of the overlay font
pub const CHAR_WIDTH: u32 = 6;

/// Composed window contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    buf: Vec<u32>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Canvas of `width × height` filled with `background`
    pub fn new(width: u32, height: u32, background: Rgb888) -> Self {
        let size = (width as usize).saturating_mul(height as usize);
        Self {
            buf: vec![to_argb(background); size],
            width,
            height,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// ARGB words, row-major
    pub fn pixels(&self) -> &[u32] {
        &self.buf
    }

    // SAFETY: bounds checked first; the index is below the buffer length.
    #[allow(clippy::arithmetic_side_effects)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Color at `(x, y)`
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        let (x, y) = (i32::try_from(x).ok()?, i32::try_from(y).ok()?);
        self.index(x, y)
            .and_then(|i| self.buf.get(i))
            .map(|&word| from_argb(word))
    }

    /// Opaque write (clipped)
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb888) {
        if let Some(slot) = self.index(x, y).and_then(|i| self.buf.get_mut(i)) {
            *slot = to_argb(color);
        }
    }

    /// Blend `color` over the existing pixel with opacity `alpha`
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb888, alpha: u8) {
        let Some(slot) = self.index(x, y).and_then(|i| self.buf.get_mut(i)) else {
            return;
        };
        let dst = from_argb(*slot);
        let a = u16::from(alpha);
        let inv = 255u16.saturating_sub(a);
        let mix = |s: u8, d: u8| {
            let v = (u16::from(s).saturating_mul(a))
                .saturating_add(u16::from(d).saturating_mul(inv))
                / 255;
            u8::try_from(v).unwrap_or(u8::MAX)
        };
        *slot = to_argb(Rgb888::new(
            mix(color.r(), dst.r()),
            mix(color.g(), dst.g()),
            mix(color.b(), dst.b()),
        ));
    }

    /// Opaque filled rectangle
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgb888) {
        Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self)
            .ok();
    }

    /// One-pixel rectangle outline
    pub fn stroke_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgb888) {
        Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(self)
            .ok();
    }

    fn circle(center: Point, radius: u32) -> Circle {
        Circle::with_center(center, radius.saturating_mul(2).saturating_add(1))
    }

    /// Opaque filled disc
    pub fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb888) {
        Self::circle(center, radius)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self)
            .ok();
    }

    /// One-pixel circle outline
    pub fn stroke_circle(&mut self, center: Point, radius: u32, color: Rgb888) {
        Self::circle(center, radius)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(self)
            .ok();
    }

    /// Translucent filled disc
    pub fn blend_circle(&mut self, center: Point, radius: u32, color: Rgb888, alpha: u8) {
        for p in Self::circle(center, radius).points() {
            self.blend_pixel(p.x, p.y, color, alpha);
        }
    }

    /// Text with its top-left corner at `(x, y)`
    pub fn text(&mut self, x: i32, y: i32, text: &str, color: Rgb888) {
        let style = MonoTextStyle::new(&FONT_6X10, color);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(self)
            .ok();
    }

    /// Text centered on `(x, y)`
    pub fn text_centered(&mut self, x: i32, y: i32, text: &str, color: Rgb888) {
        let style = MonoTextStyle::new(&FONT_6X10, color);
        let layout = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(text, Point::new(x, y), style, layout)
            .draw(self)
            .ok();
    }

    /// Copy `image` with its top-left at `(x, y)`, each pixel as a
    /// `scale × scale` block
    pub fn blit_scaled(&mut self, image: &DisplayImage, x: i32, y: i32, scale: u32) {
        let scale = scale.max(1);
        let step = i32::try_from(scale).unwrap_or(i32::MAX);
        for (row, cy) in image.rows().zip((0i32..).map(|r| r.saturating_mul(step))) {
            for (&color, cx) in row.iter().zip((0i32..).map(|c| c.saturating_mul(step))) {
                let ox = x.saturating_add(cx);
                let oy = y.saturating_add(cy);
                if scale == 1 {
                    self.set_pixel(ox, oy, color);
                } else {
                    self.fill_rect(ox, oy, scale, scale, color);
                }
            }
        }
    }

    /// Convert to an `image` buffer for export
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut img = RgbImage::new(self.width, self.height);
        for (dst, &word) in img.pixels_mut().zip(self.buf.iter()) {
            let c = from_argb(word);
            *dst = Rgb([c.r(), c.g(), c.b()]);
        }
        img
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            self.set_pixel(p.x, p.y, c);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(to_argb(color));
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;

    #[test]
    fn test_new_fills_background() {
        let canvas = Canvas::new(4, 3, Rgb888::new(20, 20, 25));
        assert_eq!(canvas.pixels().len(), 12);
        assert!(canvas.pixels().iter().all(|&w| w == 0xFF141419));
    }

    #[test]
    fn test_blend_pixel() {
        let mut canvas = Canvas::new(1, 1, Rgb888::BLACK);
        canvas.blend_pixel(0, 0, Rgb888::new(200, 100, 0), 150);
        // 200 * 150 / 255 = 117, 100 * 150 / 255 = 58
        assert_eq!(canvas.get_pixel(0, 0), Some(Rgb888::new(117, 58, 0)));
    }

    #[test]
    fn test_clipping() {
        let mut canvas = Canvas::new(4, 4, Rgb888::BLACK);
        canvas.fill_rect(-2, -2, 4, 4, Rgb888::WHITE);
        assert_eq!(canvas.get_pixel(1, 1), Some(Rgb888::WHITE));
        assert_eq!(canvas.get_pixel(2, 2), Some(Rgb888::BLACK));
        canvas.set_pixel(4, 0, Rgb888::RED);
        canvas.blend_pixel(-1, 0, Rgb888::RED, 255);
        assert_eq!(canvas.get_pixel(4, 0), None);
    }

    #[test]
    fn test_fill_circle_radius() {
        let mut canvas = Canvas::new(21, 21, Rgb888::BLACK);
        canvas.fill_circle(Point::new(10, 10), 5, Rgb888::WHITE);
        assert_eq!(canvas.get_pixel(10, 10), Some(Rgb888::WHITE));
        assert_eq!(canvas.get_pixel(10, 5), Some(Rgb888::WHITE));
        assert_eq!(canvas.get_pixel(10, 15), Some(Rgb888::WHITE));
        assert_eq!(canvas.get_pixel(10, 3), Some(Rgb888::BLACK));
        assert_eq!(canvas.get_pixel(0, 0), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_blit_scaled() {
        let mut image = DisplayImage::filled(2, 1, Rgb888::RED);
        image.set(1, 0, Rgb888::BLUE);
        let mut canvas = Canvas::new(10, 10, Rgb888::BLACK);
        canvas.blit_scaled(&image, 2, 3, 3);
        assert_eq!(canvas.get_pixel(2, 3), Some(Rgb888::RED));
        assert_eq!(canvas.get_pixel(4, 5), Some(Rgb888::RED));
        assert_eq!(canvas.get_pixel(5, 3), Some(Rgb888::BLUE));
        assert_eq!(canvas.get_pixel(7, 5), Some(Rgb888::BLUE));
        assert_eq!(canvas.get_pixel(8, 3), Some(Rgb888::BLACK));
        assert_eq!(canvas.get_pixel(2, 6), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_text_draws_glyphs() {
        let mut canvas = Canvas::new(40, 12, Rgb888::BLACK);
        canvas.text(0, 0, "Hi", Rgb888::WHITE);
        assert!(canvas
            .pixels()
            .iter()
            .any(|&w| w == to_argb(Rgb888::WHITE)));
    }

    #[test]
    fn test_to_rgb_image() {
        let mut canvas = Canvas::new(2, 2, Rgb888::BLACK);
        canvas.set_pixel(1, 1, Rgb888::new(9, 8, 7));
        let img = canvas.to_rgb_image();
        assert_eq!(img.get_pixel(1, 1), &Rgb([9, 8, 7]));
    }
}
