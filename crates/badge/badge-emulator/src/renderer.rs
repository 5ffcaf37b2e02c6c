//! Per-device rendering orchestration
//!
//! A [`Renderer`] owns the consumer side of a [`FrameChannel`], the device's
//! [`ColorTranslator`], the e-ink [`RefreshAnimator`] where the device has
//! one, and the composed window [`Canvas`]. The redraw thread calls
//! [`Renderer::tick`] at its own cadence; the application thread only ever
//! touches the [`FramePublisher`] and the [`InputHandle`].
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use badge_emulator::{FrameBuffer, PixelFormat, Renderer};
//! use badge_specs::devices;
//!
//! let mut renderer = Renderer::headless(devices::TUFTY_2350).unwrap();
//! let publisher = renderer.publisher();
//!
//! let raw = vec![0xFF0000; 320 * 240];
//! let frame = FrameBuffer::from_raw(320, 240, &raw, PixelFormat::Packed).unwrap();
//! publisher.publish(&frame).unwrap();
//!
//! assert!(renderer.tick(Instant::now()));
//! assert_eq!(renderer.frame_count(), 1);
//! ```

use std::path::Path;
use std::time::Instant;

use badge_specs::{DeviceProfile, DisplayClass, WindowRect};
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::Point;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use tracing::{debug, info, warn};

use crate::ascii::{frame_text, image_to_ascii, NO_BUFFER};
use crate::canvas::Canvas;
use crate::channel::{FrameChannel, FramePublisher};
use crate::config::RenderConfig;
use crate::display_image::DisplayImage;
use crate::error::Result;
use crate::input::{ButtonId, InputHandle, InputState, TouchPoint};
use crate::overlay::{self, ResourceUsage, StatusIndicator, Theme, LED_OUTLINE};
use crate::pixel::PixelFormat;
use crate::presenter::{HostEvent, Presenter};
use crate::refresh::{RefreshAnimator, RefreshPhase};
use crate::translate::{led_cell, ColorTranslator};

/// Display pipeline for one simulated device
pub struct Renderer {
    profile: DeviceProfile,
    config: RenderConfig,
    theme: Theme,
    format: PixelFormat,
    translator: ColorTranslator,
    channel: FrameChannel,
    input: InputHandle,
    animator: Option<RefreshAnimator>,
    /// Latest translated frame (the refresh target on e-ink)
    display: Option<DisplayImage>,
    /// What the panel shows right now
    shown: DisplayImage,
    canvas: Canvas,
    composed: bool,
    last_input: InputState,
    usage: Option<ResourceUsage>,
    usage_changed: bool,
    frame_count: u64,
    phase: RefreshPhase,
    pointer_button: Option<ButtonId>,
    presenter: Option<Box<dyn Presenter>>,
    closed: bool,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("device", &self.profile.name)
            .field("class", &self.profile.class)
            .field("frame_count", &self.frame_count)
            .field("phase", &self.phase)
            .field("windowed", &self.presenter.is_some())
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Build a renderer for `profile`
    ///
    /// The profile is validated and the configured scale override applied.
    /// Unless the configuration asks for headless rendering, a host window is
    /// opened; when that fails the renderer logs a warning and continues
    /// image-only.
    pub fn new(profile: DeviceProfile, config: RenderConfig) -> Result<Self> {
        profile.validate()?;
        let profile = match config.scale {
            Some(scale) => profile.with_scale(scale),
            None => profile,
        };

        let theme = Theme::for_class(profile.class);
        let translator = ColorTranslator::for_profile(&profile, &config);
        let animator = profile.is_eink().then(|| {
            RefreshAnimator::new(
                profile.width,
                profile.height,
                config.refresh_duration(&profile),
                config.ink,
            )
        });
        let shown = match &animator {
            Some(animator) => animator.target().clone(),
            None => DisplayImage::filled(profile.width, profile.height, Rgb888::BLACK),
        };
        let (win_w, win_h) = profile.window_size();

        let mut renderer = Self {
            format: PixelFormat::for_profile(&profile),
            channel: FrameChannel::for_profile(&profile),
            input: InputHandle::new(),
            canvas: Canvas::new(win_w, win_h, theme.window),
            usage: None,
            usage_changed: false,
            composed: false,
            last_input: InputState::default(),
            frame_count: 0,
            phase: RefreshPhase::Idle,
            pointer_button: None,
            presenter: None,
            closed: false,
            display: None,
            profile,
            config,
            theme,
            translator,
            animator,
            shown,
        };

        info!(
            device = %renderer.profile.name,
            class = renderer.profile.class.name(),
            width = renderer.profile.width,
            height = renderer.profile.height,
            scale = renderer.profile.display_scale,
            "renderer created"
        );

        if !renderer.config.headless {
            renderer.open_window();
        }
        Ok(renderer)
    }

    /// Image-only renderer with otherwise default settings
    pub fn headless(profile: DeviceProfile) -> Result<Self> {
        Self::new(profile, RenderConfig::HEADLESS)
    }

    #[cfg(not(feature = "headless"))]
    fn open_window(&mut self) {
        match crate::window::WindowPresenter::open(&self.profile) {
            Ok(window) => self.presenter = Some(Box::new(window)),
            Err(err) => warn!(error = %err, "host window unavailable, rendering headless"),
        }
    }

    #[cfg(feature = "headless")]
    fn open_window(&mut self) {
        warn!("built without window support, rendering headless");
    }

    /// Replace the host presenter (tests, alternative front ends)
    pub fn set_presenter(&mut self, presenter: Box<dyn Presenter>) {
        self.presenter = Some(presenter);
        self.composed = false;
    }

    /// True when a host window is attached
    pub fn is_windowed(&self) -> bool {
        self.presenter.is_some()
    }

    /// Device profile in effect (after any scale override)
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Configuration in effect
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Raw-value decoding for this device
    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Producer handle for the application thread
    pub fn publisher(&self) -> FramePublisher {
        self.channel.publisher()
    }

    /// The frame channel (consumer side)
    pub fn channel(&self) -> &FrameChannel {
        &self.channel
    }

    /// Shared input state written by the input collaborator
    pub fn input(&self) -> &InputHandle {
        &self.input
    }

    /// Share an existing input handle instead of the renderer's own
    pub fn with_input(mut self, input: InputHandle) -> Self {
        self.input = input;
        self
    }

    /// Report heap usage for the status bar (`None` hides the bar)
    pub fn set_resource_usage(&mut self, usage: Option<ResourceUsage>) {
        if self.usage != usage {
            self.usage = usage;
            self.usage_changed = true;
        }
    }

    /// Run one redraw step at `now`
    ///
    /// Takes the newest published frame, if any, advances the refresh
    /// animation and recomposes the canvas when anything visible changed.
    /// Returns true when the canvas was recomposed.
    pub fn tick(&mut self, now: Instant) -> bool {
        for event in self.poll_host_events() {
            self.handle_event(event);
        }

        let mut changed = !self.composed;

        if let Some(frame) = self.channel.take_latest() {
            if frame.is_empty() {
                debug!("empty frame ignored");
            } else {
                let image = self.translator.translate_frame(&frame);
                self.frame_count = self.frame_count.saturating_add(1);
                if let Some(animator) = self.animator.as_mut() {
                    animator.start(image.clone(), now);
                }
                self.display = Some(image);
                changed = true;
            }
        }

        if let Some(animator) = self.animator.as_mut() {
            let phase = animator.phase(now);
            if phase != RefreshPhase::Idle || animator.finish_if_done(now) {
                changed = true;
            }
            if phase != self.phase {
                debug!(phase = phase.name(), "refresh phase");
            }
            self.phase = phase;
        }

        let input = self.input.snapshot();
        if input != self.last_input {
            self.last_input = input;
            changed = true;
        }
        if self.usage_changed {
            self.usage_changed = false;
            changed = true;
        }

        if changed {
            self.update_shown(now);
            self.compose();
            self.present();
        }
        changed
    }

    fn update_shown(&mut self, now: Instant) {
        match (&self.animator, &self.display) {
            (Some(animator), _) => self.shown = animator.render(now),
            (None, Some(display)) => self.shown.clone_from(display),
            (None, None) => {}
        }
    }

    fn compose(&mut self) {
        self.canvas.clear(self.theme.window).ok();

        let rect = self.profile.display_rect();
        overlay::draw_frame(&mut self.canvas, rect, &self.theme);
        match self.profile.class {
            DisplayClass::LedMatrix => self.draw_leds(rect),
            DisplayClass::Panel | DisplayClass::EInk => self.canvas.blit_scaled(
                &self.shown,
                px(rect.x),
                px(rect.y),
                self.profile.display_scale,
            ),
        }

        if self.config.show_status {
            let indicator = if self.phase == RefreshPhase::Idle {
                StatusIndicator::Frame(self.frame_count)
            } else {
                StatusIndicator::Refreshing
            };
            overlay::draw_status_bar(
                &mut self.canvas,
                &self.theme,
                &self.profile.name,
                indicator,
                self.usage,
            );
        }

        overlay::draw_buttons(&mut self.canvas, &self.profile, &self.theme, &self.last_input);
        if self.profile.is_eink() && self.profile.has_busy_led {
            overlay::draw_busy_led(&mut self.canvas, &self.last_input);
        }
        if self.profile.has_touch {
            if let Some(touch) = self.last_input.touch {
                overlay::draw_touch(&mut self.canvas, rect, self.profile.display_scale, touch);
            }
        }
        self.composed = true;
    }

    fn draw_leds(&mut self, grid: WindowRect) {
        let pitch = self.profile.display_scale;
        let radius = self.profile.led_radius();
        let half = pitch / 2;
        for (y, row) in (0u32..).zip(self.shown.rows()) {
            for (x, &color) in (0u32..).zip(row.iter()) {
                let cx = grid.x.saturating_add(x.saturating_mul(pitch)).saturating_add(half);
                let cy = grid.y.saturating_add(y.saturating_mul(pitch)).saturating_add(half);
                let center = Point::new(px(cx), px(cy));
                let cell = led_cell(color, radius, self.config.glow);
                if let Some(glow) = cell.glow {
                    self.canvas.blend_circle(center, glow.radius, color, glow.alpha);
                }
                self.canvas.fill_circle(center, cell.radius, cell.color);
                self.canvas.stroke_circle(center, cell.radius, LED_OUTLINE);
            }
        }
    }

    fn present(&mut self) {
        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };
        if let Err(err) = presenter.present(&self.canvas) {
            warn!(error = %err, "presentation failed, continuing headless");
            self.presenter = None;
        }
    }

    fn poll_host_events(&mut self) -> Vec<HostEvent> {
        self.presenter
            .as_mut()
            .map(|p| p.poll_events())
            .unwrap_or_default()
    }

    /// Apply a host input event
    ///
    /// Keys map through the button table, pointer presses on a button
    /// indicator press that button, and pointer presses on the display of a
    /// touch device become touches. Motion with the button held drags the
    /// touch.
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Key { name, pressed } => {
                self.input.press_key(&self.profile, &name, pressed);
            }
            HostEvent::Pointer { x, y, pressed } => self.handle_pointer(x, y, pressed),
            HostEvent::PointerMoved { x, y } => self.handle_drag(x, y),
            HostEvent::CloseRequested => {
                info!("window closed");
                self.closed = true;
            }
        }
    }

    fn handle_pointer(&mut self, x: u32, y: u32, pressed: bool) {
        if !pressed {
            if let Some(pin) = self.pointer_button.take() {
                self.input.set_button(pin, false);
                return;
            }
            // A touch ends wherever the pointer is released
            if let Some(touch) = self.input.snapshot().touch.filter(|t| t.pressed) {
                self.input.set_touch(Some(TouchPoint {
                    pressed: false,
                    ..touch
                }));
                return;
            }
        }
        if let Some(button) = overlay::button_at(&self.profile, x, y) {
            let pin = button.pin;
            self.input.set_button(pin, pressed);
            self.pointer_button = pressed.then_some(pin);
            return;
        }
        if let Some((tx, ty)) = self.touch_point_at(x, y) {
            self.input.set_touch(Some(TouchPoint {
                x: tx,
                y: ty,
                pressed,
            }));
        }
    }

    fn handle_drag(&mut self, x: u32, y: u32) {
        let Some(touch) = self.input.snapshot().touch.filter(|t| t.pressed) else {
            return;
        };
        if let Some((tx, ty)) = self.touch_point_at(x, y) {
            self.input.set_touch(Some(TouchPoint {
                x: tx,
                y: ty,
                ..touch
            }));
        }
    }

    /// Display coordinates of window point `(x, y)` on a touch device
    fn touch_point_at(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        if !self.profile.has_touch {
            return None;
        }
        let rect = self.profile.display_rect();
        if !rect.contains(x, y) {
            return None;
        }
        let scale = self.profile.display_scale;
        let to_display = |v: u32, origin: u32| v.saturating_sub(origin).checked_div(scale).unwrap_or(0);
        Some((to_display(x, rect.x), to_display(y, rect.y)))
    }

    /// Button indicator under window point `(x, y)`, by host key
    pub fn button_at(&self, x: u32, y: u32) -> Option<&str> {
        overlay::button_at(&self.profile, x, y).map(|b| b.key.as_ref())
    }

    /// The window was closed by the user
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Frames taken from the channel so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// An e-ink refresh was running at the last tick
    pub fn is_refreshing(&self) -> bool {
        self.phase != RefreshPhase::Idle
    }

    /// Refresh phase at the last tick (`Idle` for non-e-ink devices)
    pub fn refresh_phase(&self) -> RefreshPhase {
        self.phase
    }

    /// Latest translated frame, `None` before the first frame
    pub fn display_image(&self) -> Option<&DisplayImage> {
        self.display.as_ref()
    }

    /// Panel content as of the last recomposition (mid-refresh on e-ink)
    pub fn shown_image(&self) -> &DisplayImage {
        &self.shown
    }

    /// Composed window contents
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Save the latest translated frame as an image
    ///
    /// Returns `Ok(false)` when no frame has been rendered yet. The format is
    /// chosen from the file extension.
    pub fn screenshot(&self, path: impl AsRef<Path>) -> Result<bool> {
        let Some(display) = &self.display else {
            return Ok(false);
        };
        let path = path.as_ref();
        display.to_rgb_image().save(path)?;
        info!(path = %path.display(), "screenshot saved");
        Ok(true)
    }

    /// Save the composed window (display plus chrome) as an image
    pub fn save_canvas(&self, path: impl AsRef<Path>) -> Result<()> {
        self.canvas.to_rgb_image().save(path.as_ref())?;
        Ok(())
    }

    /// ASCII rendering of the latest frame, about `max_width` columns wide
    pub fn ascii(&self, max_width: u32) -> String {
        self.display
            .as_ref()
            .map_or_else(|| NO_BUFFER.to_owned(), |d| image_to_ascii(d, max_width))
    }

    /// Full-resolution text dump of the latest frame with a header
    pub fn ascii_frame(&self) -> Option<String> {
        self.display
            .as_ref()
            .map(|d| frame_text(self.frame_count, &self.profile.name, d))
    }
}

fn px(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
