//! Badge Display Testing Utilities
//!
//! Headless harness for testing badge UIs against the simulated display
//! pipeline: a [`TestRenderer`] with a manual clock, pixel and phase
//! assertions, input simulation and golden screenshot comparison.
//!
//! # Quick start
//!
//! ```
//! use badge_testing::TestRenderer;
//! use badge_specs::devices::TUFTY_2350;
//! use embedded_graphics::{pixelcolor::Rgb888, prelude::*, primitives::{PrimitiveStyle, Rectangle}};
//!
//! let mut t = TestRenderer::new(TUFTY_2350).unwrap();
//!
//! let mut frame = t.blank_frame();
//! Rectangle::new(Point::new(10, 10), Size::new(40, 20))
//!     .into_styled(PrimitiveStyle::with_fill(Rgb888::RED))
//!     .draw(&mut frame)
//!     .unwrap();
//! t.publish(&frame).unwrap();
//! t.tick();
//!
//! t.assert_shown_pixel(20, 15, Rgb888::RED).unwrap();
//! t.assert_shown_pixel(0, 0, Rgb888::BLACK).unwrap();
//! ```
//!
//! # E-ink timing
//!
//! The clock only moves when told to, so refresh phases are deterministic:
//!
//! ```
//! # use badge_testing::TestRenderer;
//! # use badge_emulator::RefreshPhase;
//! # use badge_specs::devices::BADGER_2350;
//! let mut t = TestRenderer::new(BADGER_2350).unwrap();
//! t.publish_raw(&vec![0; 296 * 128]).unwrap();
//! t.tick();
//! t.assert_phase(RefreshPhase::Invert).unwrap();
//! t.settle();
//! t.assert_phase(RefreshPhase::Idle).unwrap();
//! ```
//!
//! # Golden screenshot testing
//!
//! ```no_run
//! # use badge_testing::TestRenderer;
//! # let t = TestRenderer::new(badge_specs::devices::TUFTY_2350).unwrap();
//! // First run: set UPDATE_GOLDEN=1 to create/update the reference file.
//! t.assert_matches_golden("tests/golden/home.png", 0).unwrap();
//! ```

#![warn(clippy::all)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![allow(clippy::module_name_repetitions)]

use std::path::Path;
use std::time::{Duration, Instant};

use badge_emulator::{EmulatorError, HostEvent, RenderConfig};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

pub use badge_emulator::{FrameBuffer, RefreshPhase, Renderer};
pub use badge_specs::DeviceProfile;

/// Install a `tracing` subscriber for test output
///
/// Honors `RUST_LOG` (e.g. `RUST_LOG=badge_emulator=debug`). Safe to call
/// from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// TestRenderer
// ─────────────────────────────────────────────────────────────────────────────

/// Headless renderer driven by a manual clock
///
/// Derefs to [`Renderer`] for everything not wrapped here.
pub struct TestRenderer {
    inner: Renderer,
    start: Instant,
    elapsed: Duration,
}

impl TestRenderer {
    /// Headless renderer for `profile` with default settings
    pub fn new(profile: DeviceProfile) -> Result<Self, EmulatorError> {
        Self::with_config(profile, RenderConfig::HEADLESS)
    }

    /// Headless renderer with a custom configuration
    ///
    /// `config.headless` is forced on.
    pub fn with_config(profile: DeviceProfile, config: RenderConfig) -> Result<Self, EmulatorError> {
        let config = RenderConfig {
            headless: true,
            ..config
        };
        Ok(Self {
            inner: Renderer::new(profile, config)?,
            start: Instant::now(),
            elapsed: Duration::ZERO,
        })
    }

    // ── Clock ────────────────────────────────────────────────────────────────

    /// Current simulated instant
    pub fn now(&self) -> Instant {
        self.start.checked_add(self.elapsed).unwrap_or(self.start)
    }

    /// Simulated time since construction
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Run one redraw step at the current simulated instant
    pub fn tick(&mut self) -> bool {
        let now = self.now();
        self.inner.tick(now)
    }

    /// Move the clock forward by `ms` and tick
    pub fn advance(&mut self, ms: u64) -> bool {
        self.elapsed = self.elapsed.saturating_add(Duration::from_millis(ms));
        self.tick()
    }

    /// Advance past the end of any e-ink refresh and tick
    pub fn settle(&mut self) -> bool {
        let refresh = self.inner.config().refresh_duration(self.inner.profile());
        self.elapsed = self.elapsed.saturating_add(refresh);
        self.tick()
    }

    // ── Frames ───────────────────────────────────────────────────────────────

    /// Device-sized frame for drawing with embedded-graphics
    pub fn blank_frame(&self) -> FrameBuffer {
        let (w, h) = self.inner.channel().dimensions();
        FrameBuffer::new(w, h)
    }

    /// Publish a frame as the application thread would
    pub fn publish(&self, frame: &FrameBuffer) -> Result<(), EmulatorError> {
        self.inner.publisher().publish(frame)
    }

    /// Decode and publish a raw `u32` grid using the device's pixel format
    pub fn publish_raw(&self, raw: &[u32]) -> Result<(), EmulatorError> {
        let (w, h) = self.inner.channel().dimensions();
        let frame = FrameBuffer::from_raw(w, h, raw, self.inner.pixel_format())?;
        self.publish(&frame)
    }

    // ── Input simulation ─────────────────────────────────────────────────────

    /// Press and hold a host key
    pub fn press_key(&mut self, key: &str) {
        self.inner.handle_event(HostEvent::Key {
            name: key.to_owned(),
            pressed: true,
        });
    }

    /// Release a host key
    pub fn release_key(&mut self, key: &str) {
        self.inner.handle_event(HostEvent::Key {
            name: key.to_owned(),
            pressed: false,
        });
    }

    /// Mouse click (press + release) at a window position
    pub fn click(&mut self, x: u32, y: u32) {
        self.inner.handle_event(HostEvent::Pointer { x, y, pressed: true });
        self.inner.handle_event(HostEvent::Pointer {
            x,
            y,
            pressed: false,
        });
    }

    // ── Assertions ───────────────────────────────────────────────────────────

    /// Assert that the panel shows `expected` at display pixel `(x, y)`
    pub fn assert_shown_pixel(&self, x: u32, y: u32, expected: Rgb888) -> Result<(), String> {
        let actual = self
            .inner
            .shown_image()
            .get(x, y)
            .ok_or_else(|| format!("Pixel ({x}, {y}) is out of bounds"))?;
        if actual == expected {
            Ok(())
        } else {
            Err(format!(
                "assert_shown_pixel({x}, {y}): expected {}, got {}",
                rgb(expected),
                rgb(actual)
            ))
        }
    }

    /// Assert that every display pixel inside `rect` shows `color`
    pub fn assert_region_uniform(&self, rect: Rectangle, color: Rgb888) -> Result<(), String> {
        for point in rect.points() {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                return Err(format!("{rect:?} extends past the display origin"));
            };
            self.assert_shown_pixel(x, y, color)
                .map_err(|e| format!("assert_region_uniform failed in {rect:?}: {e}"))?;
        }
        Ok(())
    }

    /// Count display pixels inside `rect` showing `color`
    pub fn pixel_count_of_color(&self, rect: Rectangle, color: Rgb888) -> usize {
        let shown = self.inner.shown_image();
        rect.points()
            .filter_map(|p| Some((u32::try_from(p.x).ok()?, u32::try_from(p.y).ok()?)))
            .filter(|&(x, y)| shown.get(x, y) == Some(color))
            .count()
    }

    /// Assert that the composed window shows `expected` at `(x, y)`
    pub fn assert_canvas_pixel(&self, x: u32, y: u32, expected: Rgb888) -> Result<(), String> {
        let actual = self
            .inner
            .canvas()
            .get_pixel(x, y)
            .ok_or_else(|| format!("Window pixel ({x}, {y}) is out of bounds"))?;
        if actual == expected {
            Ok(())
        } else {
            Err(format!(
                "assert_canvas_pixel({x}, {y}): expected {}, got {}",
                rgb(expected),
                rgb(actual)
            ))
        }
    }

    /// Assert the refresh phase seen at the last tick
    pub fn assert_phase(&self, expected: RefreshPhase) -> Result<(), String> {
        let actual = self.inner.refresh_phase();
        if actual == expected {
            Ok(())
        } else {
            Err(format!(
                "assert_phase: expected {}, got {} at {:?}",
                expected.name(),
                actual.name(),
                self.elapsed
            ))
        }
    }

    /// Assert the button on `pin` is currently held
    pub fn assert_button_pressed(&self, pin: u8) -> Result<(), String> {
        if self.inner.input().snapshot().is_pressed(pin) {
            Ok(())
        } else {
            Err(format!("Button on pin {pin} is not pressed"))
        }
    }

    // ── Screenshot utilities ─────────────────────────────────────────────────

    /// Save the composed window as the golden reference PNG
    ///
    /// Parent directories are created automatically.
    pub fn save_golden(&self, path: impl AsRef<Path>) -> Result<(), EmulatorError> {
        let p = path.as_ref();
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.inner.save_canvas(p)
    }

    /// Assert the composed window matches a golden reference PNG
    ///
    /// `threshold` is the largest per-channel difference still considered
    /// equal. Set `UPDATE_GOLDEN=1` to rewrite the golden file instead.
    pub fn assert_matches_golden(
        &self,
        golden_path: impl AsRef<Path>,
        threshold: u8,
    ) -> Result<(), String> {
        let golden_path = golden_path.as_ref();

        if std::env::var("UPDATE_GOLDEN").is_ok() {
            return self.save_golden(golden_path).map_err(|e| {
                format!(
                    "Failed to save golden '{p}': {e}",
                    p = golden_path.display()
                )
            });
        }

        let golden = image::open(golden_path)
            .map_err(|e| {
                format!(
                    "Failed to open golden '{}': {e}\nRun with UPDATE_GOLDEN=1 to create it.",
                    golden_path.display()
                )
            })?
            .to_rgb8();
        let current = self.inner.canvas().to_rgb_image();

        if current.dimensions() != golden.dimensions() {
            let (cw, ch) = current.dimensions();
            let (gw, gh) = golden.dimensions();
            return Err(format!(
                "Dimension mismatch: window is {cw}×{ch}, golden is {gw}×{gh}"
            ));
        }

        let diff_pixels = current
            .pixels()
            .zip(golden.pixels())
            .filter(|(cp, gp)| {
                cp.0.iter()
                    .zip(gp.0.iter())
                    .any(|(&a, &b)| a.abs_diff(b) > threshold)
            })
            .count();

        if diff_pixels > 0 {
            Err(format!(
                "{diff_pixels} pixels differ from golden '{}' (threshold={threshold})",
                golden_path.display()
            ))
        } else {
            Ok(())
        }
    }

    // ── Renderer access ──────────────────────────────────────────────────────

    pub fn renderer(&self) -> &Renderer {
        &self.inner
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.inner
    }
}

impl std::ops::Deref for TestRenderer {
    type Target = Renderer;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::ops::DerefMut for TestRenderer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

fn rgb(c: Rgb888) -> String {
    format!("rgb({}, {}, {})", c.r(), c.g(), c.b())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
