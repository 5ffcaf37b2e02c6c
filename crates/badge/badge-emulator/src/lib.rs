//! Badge Display Emulator
//!
//! Desktop rendering pipeline for simulated badge displays. Application code
//! draws into a [`FrameBuffer`] and publishes it; the redraw thread turns the
//! newest frame into what the physical display would show and composes it
//! into a host window (or an image, headless).
//!
//! # Pipeline
//!
//! ```text
//! app thread                    │ redraw thread
//! ──────────────────────────────┼──────────────────────────────────────────
//! FrameBuffer ─► FramePublisher ┼► FrameChannel ─► ColorTranslator
//!                               │      ─► RefreshAnimator (e-ink)
//!                               │      ─► Canvas + overlays ─► Presenter
//! ```
//!
//! - Panels show colors as written
//! - LED matrices broadcast brightness and draw a glow halo under bright LEDs
//! - E-ink quantizes to the panel's palette (with ordered dithering on
//!   monochrome panels) and replays a timed full-refresh animation
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use badge_emulator::{FrameBuffer, PixelFormat, RefreshPhase, Renderer};
//! use badge_specs::devices;
//!
//! let mut renderer = Renderer::headless(devices::BADGER_2350).unwrap();
//! let publisher = renderer.publisher();
//!
//! // Pen 15 is white on e-ink
//! let raw = vec![15; 296 * 128];
//! let frame = FrameBuffer::from_raw(296, 128, &raw, PixelFormat::PenOrRgb).unwrap();
//! publisher.publish(&frame).unwrap();
//!
//! let t0 = Instant::now();
//! renderer.tick(t0);
//! assert_eq!(renderer.refresh_phase(), RefreshPhase::Invert);
//!
//! renderer.tick(t0 + Duration::from_secs(1));
//! assert!(!renderer.is_refreshing());
//! println!("{}", renderer.ascii(40));
//! ```

pub mod ascii;
pub mod canvas;
mod channel;
pub mod config;
mod display_image;
mod error;
mod framebuffer;
pub mod input;
pub mod overlay;
pub mod pixel;
mod presenter;
pub mod redraw;
pub mod refresh;
mod renderer;
pub mod translate;

#[cfg(not(feature = "headless"))]
pub mod window;

pub use canvas::Canvas;
pub use channel::{FrameChannel, FramePublisher};
pub use config::RenderConfig;
pub use display_image::DisplayImage;
pub use error::{EmulatorError, Result};
pub use framebuffer::FrameBuffer;
pub use input::{ButtonId, InputHandle, InputState, TouchPoint};
pub use overlay::ResourceUsage;
pub use pixel::{Pixel, PixelFormat};
pub use presenter::{HostEvent, Presenter};
pub use redraw::{run_redraw, FramePacer, RedrawLoop};
pub use refresh::{RefreshAnimator, RefreshPhase};
pub use renderer::Renderer;
pub use translate::{ColorTranslator, InkTone};

/// Re-export of the device profile crate
pub use badge_specs;
