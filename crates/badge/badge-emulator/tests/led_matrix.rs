//! LED matrix composition tests

// Integration test file: timing and pixel-position math is clearer unchecked,
// and a panic is the failure signal.
#![allow(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::indexing_slicing,
    clippy::unwrap_used,
)]

use std::time::Instant;

use badge_emulator::overlay::Theme;
use badge_emulator::{FrameBuffer, Pixel, RenderConfig, Renderer};
use badge_specs::devices;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

/// Canvas position of LED `(x, y)`'s center
fn led_center(renderer: &Renderer, x: u32, y: u32) -> (u32, u32) {
    let grid = renderer.profile().display_rect();
    let pitch = renderer.profile().display_scale;
    (
        grid.x + x * pitch + pitch / 2,
        grid.y + y * pitch + pitch / 2,
    )
}

fn blend(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = u16::from(alpha);
    ((u16::from(src) * a + u16::from(dst) * (255 - a)) / 255) as u8
}

fn render_single_led(config: RenderConfig, level: u8) -> Renderer {
    let mut renderer = Renderer::new(devices::BLINKY_2350, config).unwrap();
    let mut frame = FrameBuffer::new(39, 26);
    frame.set_pixel(0, 0, Pixel::Indexed(level));
    renderer.publisher().publish(&frame).unwrap();
    assert!(renderer.tick(Instant::now()));
    renderer
}

#[test]
fn test_led_is_disc_of_brightness() {
    let renderer = render_single_led(RenderConfig::HEADLESS, 200);
    let (cx, cy) = led_center(&renderer, 0, 0);
    let lit = Rgb888::new(200, 200, 200);
    assert_eq!(renderer.canvas().get_pixel(cx, cy), Some(lit));
    assert_eq!(renderer.canvas().get_pixel(cx + 3, cy), Some(lit));

    // Dark neighbor is drawn but unlit
    let (nx, ny) = led_center(&renderer, 1, 0);
    assert_eq!(renderer.canvas().get_pixel(nx, ny), Some(Rgb888::BLACK));
}

#[test]
fn test_bright_led_glows() {
    let renderer = render_single_led(RenderConfig::HEADLESS, 200);
    let (cx, cy) = led_center(&renderer, 0, 0);
    let backing = Theme::LED_MATRIX.frame;

    // Outside the disc (radius 5) but inside the halo (radius 7)
    let halo = renderer.canvas().get_pixel(cx + 6, cy).unwrap();
    assert_eq!(
        halo,
        Rgb888::new(
            blend(200, backing.r(), 150),
            blend(200, backing.g(), 150),
            blend(200, backing.b(), 150),
        )
    );
    // Above the halo, on the grid border
    assert_eq!(renderer.canvas().get_pixel(cx, cy - 8), Some(backing));
}

#[test]
fn test_dim_led_has_no_glow() {
    let renderer = render_single_led(RenderConfig::HEADLESS, 50);
    let (cx, cy) = led_center(&renderer, 0, 0);
    assert_eq!(
        renderer.canvas().get_pixel(cx + 6, cy),
        Some(Theme::LED_MATRIX.frame)
    );
}

#[test]
fn test_glow_disabled() {
    let config = RenderConfig {
        glow: false,
        ..RenderConfig::HEADLESS
    };
    let renderer = render_single_led(config, 255);
    let (cx, cy) = led_center(&renderer, 0, 0);
    assert_eq!(
        renderer.canvas().get_pixel(cx + 6, cy),
        Some(Theme::LED_MATRIX.frame)
    );
}

#[test]
fn test_brightness_reads_low_byte() {
    let mut renderer = Renderer::headless(devices::BLINKY_2350).unwrap();
    let mut raw = vec![0u32; 39 * 26];
    raw[0] = 0xABCD_0080;
    let frame = FrameBuffer::from_raw(39, 26, &raw, renderer.pixel_format()).unwrap();
    renderer.publisher().publish(&frame).unwrap();
    renderer.tick(Instant::now());
    assert_eq!(
        renderer.display_image().unwrap().get(0, 0),
        Some(Rgb888::new(0x80, 0x80, 0x80))
    );
}
