//! Window chrome drawn around the display
//!
//! Status bar, heap bar, button indicators and LEDs. Positions are in window
//! pixels and follow the device window layout:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ Device name                   Frame: 12  │  y = 10
//! │ [heap bar]                               │  y = 28
//! │          ┌──────────────────┐            │
//! │          │     display      │            │
//! │          └──────────────────┘            │
//! │  (o) (o)                                 │  button LEDs
//! │ [ A ][ B ][ C ]                   BUSY ● │  win_h - 30
//! └──────────────────────────────────────────┘
//! ```

use badge_specs::{ButtonConfig, DeviceProfile, DisplayClass, WindowRect};
use embedded_graphics::geometry::Point;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use crate::canvas::Canvas;
use crate::input::{button_led_key, InputState, TouchPoint, BUSY_LED};

// ─────────────────────────────────────────────────────────────────────────────
// Layout constants
// ─────────────────────────────────────────────────────────────────────────────

const STATUS_X: i32 = 10;
const STATUS_Y: i32 = 10;
const COUNTER_FROM_RIGHT: i32 = 120;

const HEAP_BAR_X: i32 = 10;
const HEAP_BAR_Y: i32 = 28;
const HEAP_BAR_W: u32 = 150;
const HEAP_BAR_H: u32 = 10;

const BUTTON_X0: u32 = 10;
const BUTTON_STEP: u32 = 50;
const BUTTON_W: u32 = 40;
const BUTTON_H: u32 = 20;
const BUTTON_FROM_BOTTOM: u32 = 30;

const BUTTON_LED_RADIUS: u32 = 4;
const BUTTON_LED_FROM_BOTTOM: i32 = 38;
const BUSY_LED_RADIUS: u32 = 6;
const TOUCH_RADIUS: u32 = 6;

const LED_ON: Rgb888 = Rgb888::new(255, 255, 200);
const BUSY_ON: Rgb888 = Rgb888::new(255, 180, 50);
const LED_OFF: Rgb888 = Rgb888::new(60, 60, 55);
const BUSY_LABEL: Rgb888 = Rgb888::new(120, 120, 120);

const HEAP_TRACK: Rgb888 = Rgb888::new(50, 50, 55);
const HEAP_BORDER: Rgb888 = Rgb888::new(80, 80, 85);
const HEAP_LABEL: Rgb888 = Rgb888::new(180, 180, 180);

const TOUCH_DOWN: Rgb888 = Rgb888::new(255, 80, 80);
const TOUCH_UP: Rgb888 = Rgb888::new(150, 150, 150);

/// Outline drawn around each LED disc
pub const LED_OUTLINE: Rgb888 = Rgb888::new(40, 40, 45);

// ─────────────────────────────────────────────────────────────────────────────
// Themes
// ─────────────────────────────────────────────────────────────────────────────

/// Per-class window colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Window background
    pub window: Rgb888,
    /// Border, bezel or LED grid backing around the display
    pub frame: Rgb888,
    /// How far the frame extends past the display on each side
    pub frame_margin: u32,
    /// Device name
    pub name: Rgb888,
    /// Frame counter
    pub counter: Rgb888,
    /// `REFRESHING` indicator
    pub refreshing: Rgb888,
    /// Held button
    pub button_pressed: Rgb888,
    /// Released button
    pub button_idle: Rgb888,
}

impl Theme {
    /// TFT/IPS panel
    pub const PANEL: Self = Self {
        window: Rgb888::new(30, 30, 30),
        frame: Rgb888::new(60, 60, 60),
        frame_margin: 2,
        name: Rgb888::new(200, 200, 200),
        counter: Rgb888::new(150, 150, 150),
        refreshing: Rgb888::new(150, 150, 150),
        button_pressed: Rgb888::new(100, 200, 100),
        button_idle: Rgb888::new(80, 80, 80),
    };

    /// LED matrix
    pub const LED_MATRIX: Self = Self {
        window: Rgb888::new(20, 20, 25),
        frame: Rgb888::new(15, 15, 18),
        frame_margin: 5,
        name: Rgb888::new(200, 200, 200),
        counter: Rgb888::new(150, 150, 150),
        refreshing: Rgb888::new(150, 150, 150),
        button_pressed: Rgb888::new(100, 200, 100),
        button_idle: Rgb888::new(60, 60, 65),
    };

    /// E-ink (paper-colored window, dark bezel)
    pub const EINK: Self = Self {
        window: Rgb888::new(200, 195, 185),
        frame: Rgb888::new(60, 60, 65),
        frame_margin: 8,
        name: Rgb888::new(60, 60, 60),
        counter: Rgb888::new(100, 100, 100),
        refreshing: Rgb888::new(200, 100, 100),
        button_pressed: Rgb888::new(80, 150, 80),
        button_idle: Rgb888::new(100, 100, 100),
    };

    /// Theme for a display class
    pub const fn for_class(class: DisplayClass) -> Self {
        match class {
            DisplayClass::Panel => Self::PANEL,
            DisplayClass::LedMatrix => Self::LED_MATRIX,
            DisplayClass::EInk => Self::EINK,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resource usage
// ─────────────────────────────────────────────────────────────────────────────

/// Heap usage reported by the application layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceUsage {
    /// Bytes in use
    pub used: u64,
    /// Bytes available in total
    pub total: u64,
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
impl ResourceUsage {
    /// `used / total`, clamped to `0.0..=1.0`; zero when `total` is zero
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.used as f64 / self.total as f64).clamp(0.0, 1.0)
        }
    }

    /// Bar color: green → yellow → red
    pub fn bar_color(&self) -> Rgb888 {
        let ratio = self.ratio();
        if ratio < 0.5 {
            Rgb888::new((ratio * 2.0 * 255.0) as u8, 200, 0)
        } else {
            Rgb888::new(255, ((1.0 - ratio) * 2.0 * 200.0) as u8, 0)
        }
    }

    /// `Heap: 96/256KB`
    pub fn label(&self) -> String {
        format!(
            "Heap: {:.0}/{:.0}KB",
            self.used as f64 / 1024.0,
            self.total as f64 / 1024.0
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Drawing
// ─────────────────────────────────────────────────────────────────────────────

fn px(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Filled frame (border / bezel / grid backing) behind the display area
pub fn draw_frame(canvas: &mut Canvas, rect: WindowRect, theme: &Theme) {
    let m = theme.frame_margin;
    canvas.fill_rect(
        px(rect.x).saturating_sub(px(m)),
        px(rect.y).saturating_sub(px(m)),
        rect.width.saturating_add(m.saturating_mul(2)),
        rect.height.saturating_add(m.saturating_mul(2)),
        theme.frame,
    );
}

/// What the right-hand side of the status bar shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    /// Frames rendered so far
    Frame(u64),
    /// An e-ink refresh is running
    Refreshing,
}

/// Device name, frame counter / refresh indicator and heap bar
pub fn draw_status_bar(
    canvas: &mut Canvas,
    theme: &Theme,
    name: &str,
    indicator: StatusIndicator,
    usage: Option<ResourceUsage>,
) {
    canvas.text(STATUS_X, STATUS_Y, name, theme.name);

    let right = px(canvas.width()).saturating_sub(COUNTER_FROM_RIGHT);
    match indicator {
        StatusIndicator::Frame(n) => {
            canvas.text(right, STATUS_Y, &format!("Frame: {n}"), theme.counter);
        }
        StatusIndicator::Refreshing => {
            canvas.text(right, STATUS_Y, "REFRESHING", theme.refreshing);
        }
    }

    if let Some(usage) = usage {
        draw_memory_bar(canvas, HEAP_BAR_X, HEAP_BAR_Y, HEAP_BAR_W, usage);
    }
}

/// Heap usage bar with its label underneath
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn draw_memory_bar(canvas: &mut Canvas, x: i32, y: i32, width: u32, usage: ResourceUsage) {
    canvas.fill_rect(x, y, width, HEAP_BAR_H, HEAP_TRACK);
    let fill = ((f64::from(width) * usage.ratio()) as u32).max(1);
    canvas.fill_rect(x, y, fill, HEAP_BAR_H, usage.bar_color());
    canvas.stroke_rect(x, y, width, HEAP_BAR_H, HEAP_BORDER);
    canvas.text(
        x,
        y.saturating_add(px(HEAP_BAR_H)).saturating_add(1),
        &usage.label(),
        HEAP_LABEL,
    );
}

/// Window rectangle of each button indicator, in table order
pub fn button_rects(profile: &DeviceProfile) -> impl Iterator<Item = (&ButtonConfig, WindowRect)> {
    let (_, win_h) = profile.window_size();
    let y = win_h.saturating_sub(BUTTON_FROM_BOTTOM);
    profile.buttons.iter().zip(0u32..).map(move |(button, i)| {
        let x = BUTTON_X0.saturating_add(i.saturating_mul(BUTTON_STEP));
        (
            button,
            WindowRect {
                x,
                y,
                width: BUTTON_W,
                height: BUTTON_H,
            },
        )
    })
}

/// Button whose indicator covers window point `(x, y)`
pub fn button_at(profile: &DeviceProfile, x: u32, y: u32) -> Option<&ButtonConfig> {
    button_rects(profile)
        .find(|(_, rect)| rect.contains(x, y))
        .map(|(button, _)| button)
}

/// Button indicators, plus per-button LEDs on devices that have them
pub fn draw_buttons(canvas: &mut Canvas, profile: &DeviceProfile, theme: &Theme, input: &InputState) {
    let led_y = px(canvas.height()).saturating_sub(BUTTON_LED_FROM_BOTTOM);
    for (button, rect) in button_rects(profile) {
        let color = if input.is_pressed(button.pin) {
            theme.button_pressed
        } else {
            theme.button_idle
        };
        canvas.fill_rect(px(rect.x), px(rect.y), rect.width, rect.height, color);

        let cx = px(rect.x).saturating_add(px(BUTTON_W / 2));
        let cy = px(rect.y).saturating_add(px(BUTTON_H / 2));
        canvas.text_centered(cx, cy, &button.name, Rgb888::WHITE);

        if profile.has_button_leds {
            let lit = input.led(&button_led_key(&button.name));
            let led = if lit { LED_ON } else { LED_OFF };
            canvas.fill_circle(Point::new(cx, led_y), BUTTON_LED_RADIUS, led);
        }
    }
}

/// Busy LED in the bottom-right corner
pub fn draw_busy_led(canvas: &mut Canvas, input: &InputState) {
    let w = px(canvas.width());
    let h = px(canvas.height());
    let color = if input.led(BUSY_LED) { BUSY_ON } else { LED_OFF };
    canvas.fill_circle(
        Point::new(w.saturating_sub(20), h.saturating_sub(20)),
        BUSY_LED_RADIUS,
        color,
    );
    canvas.text(w.saturating_sub(42), h.saturating_sub(34), "BUSY", BUSY_LABEL);
}

/// Ring at the last touch contact, mapped into the display area
pub fn draw_touch(canvas: &mut Canvas, rect: WindowRect, scale: u32, touch: TouchPoint) {
    let x = rect.x.saturating_add(touch.x.saturating_mul(scale));
    let y = rect.y.saturating_add(touch.y.saturating_mul(scale));
    let color = if touch.pressed { TOUCH_DOWN } else { TOUCH_UP };
    canvas.stroke_circle(Point::new(px(x), px(y)), TOUCH_RADIUS, color);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects, clippy::indexing_slicing)]

    use super::*;
    use badge_specs::devices;

    #[test]
    fn test_bar_color_ramp() {
        let low = ResourceUsage { used: 0, total: 100 };
        assert_eq!(low.bar_color(), Rgb888::new(0, 200, 0));
        let quarter = ResourceUsage { used: 25, total: 100 };
        assert_eq!(quarter.bar_color(), Rgb888::new(127, 200, 0));
        let full = ResourceUsage { used: 100, total: 100 };
        assert_eq!(full.bar_color(), Rgb888::new(255, 0, 0));
        let three_quarters = ResourceUsage { used: 75, total: 100 };
        assert_eq!(three_quarters.bar_color(), Rgb888::new(255, 100, 0));
    }

    #[test]
    fn test_ratio_with_zero_total() {
        let usage = ResourceUsage { used: 10, total: 0 };
        assert_eq!(usage.ratio(), 0.0);
    }

    #[test]
    fn test_heap_label() {
        let usage = ResourceUsage {
            used: 96 * 1024,
            total: 256 * 1024,
        };
        assert_eq!(usage.label(), "Heap: 96/256KB");
    }

    #[test]
    fn test_memory_bar_minimum_fill() {
        let mut canvas = Canvas::new(200, 60, Rgb888::BLACK);
        let usage = ResourceUsage { used: 0, total: 1000 };
        draw_memory_bar(&mut canvas, 10, 28, 150, usage);
        // One-pixel fill sits under the border; interior shows the track
        assert_eq!(canvas.get_pixel(10, 33), Some(HEAP_BORDER));
        assert_eq!(canvas.get_pixel(12, 33), Some(HEAP_TRACK));
    }

    #[test]
    fn test_memory_bar_fill() {
        let mut canvas = Canvas::new(200, 60, Rgb888::BLACK);
        let usage = ResourceUsage { used: 50, total: 100 };
        draw_memory_bar(&mut canvas, 10, 28, 150, usage);
        assert_eq!(canvas.get_pixel(50, 33), Some(usage.bar_color()));
        assert_eq!(canvas.get_pixel(100, 33), Some(HEAP_TRACK));
    }

    #[test]
    fn test_button_rects_and_hit_testing() {
        let profile = devices::BADGER_2350;
        let (_, win_h) = profile.window_size();
        let rects: Vec<_> = button_rects(&profile).map(|(_, r)| r).collect();
        assert_eq!(rects.len(), 5);
        assert_eq!(rects[0], WindowRect { x: 10, y: win_h - 30, width: 40, height: 20 });
        assert_eq!(rects[2].x, 110);

        assert_eq!(button_at(&profile, 15, win_h - 25).map(|b| b.pin), Some(12));
        assert_eq!(button_at(&profile, 65, win_h - 11).map(|b| b.pin), Some(13));
        assert_eq!(button_at(&profile, 55, win_h - 25), None);
        assert_eq!(button_at(&profile, 15, win_h - 10), None);
    }

    #[test]
    fn test_pressed_button_color() {
        let profile = devices::BADGER_2350;
        let (w, h) = profile.window_size();
        let mut canvas = Canvas::new(w, h, Theme::EINK.window);
        let mut input = InputState::default();
        input.buttons.insert(13, true);
        draw_buttons(&mut canvas, &profile, &Theme::EINK, &input);
        assert_eq!(canvas.get_pixel(11, h - 29), Some(Theme::EINK.button_idle));
        assert_eq!(canvas.get_pixel(61, h - 29), Some(Theme::EINK.button_pressed));
    }

    #[test]
    fn test_button_and_busy_leds() {
        let profile = devices::INKY_FRAME_4_0;
        let (w, h) = profile.window_size();
        let mut canvas = Canvas::new(w, h, Theme::EINK.window);
        let mut input = InputState::default();
        input.leds.insert(button_led_key("A"), true);
        input.leds.insert(BUSY_LED.to_owned(), true);
        draw_buttons(&mut canvas, &profile, &Theme::EINK, &input);
        draw_busy_led(&mut canvas, &input);
        assert_eq!(canvas.get_pixel(30, h - 38), Some(LED_ON));
        assert_eq!(canvas.get_pixel(80, h - 38), Some(LED_OFF));
        assert_eq!(canvas.get_pixel(w - 20, h - 20), Some(BUSY_ON));
    }

    #[test]
    fn test_frame_margin() {
        let mut canvas = Canvas::new(100, 100, Theme::PANEL.window);
        let rect = WindowRect { x: 10, y: 10, width: 20, height: 20 };
        draw_frame(&mut canvas, rect, &Theme::PANEL);
        assert_eq!(canvas.get_pixel(8, 8), Some(Theme::PANEL.frame));
        assert_eq!(canvas.get_pixel(7, 8), Some(Theme::PANEL.window));
        assert_eq!(canvas.get_pixel(31, 31), Some(Theme::PANEL.frame));
        assert_eq!(canvas.get_pixel(32, 31), Some(Theme::PANEL.window));
    }

    #[test]
    fn test_touch_marker() {
        let mut canvas = Canvas::new(100, 100, Rgb888::BLACK);
        let rect = WindowRect { x: 10, y: 10, width: 80, height: 80 };
        let touch = TouchPoint { x: 20, y: 20, pressed: true };
        draw_touch(&mut canvas, rect, 2, touch);
        assert_eq!(canvas.get_pixel(50, 44), Some(TOUCH_DOWN));
        assert_eq!(canvas.get_pixel(50, 50), Some(Rgb888::BLACK));
    }
}
