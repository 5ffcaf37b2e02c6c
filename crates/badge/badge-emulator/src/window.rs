//! Host window presenter (winit + softbuffer)
//!
//! All platform-specific code lives here. The window is created once at the
//! device's window size and never resized; each presented [`Canvas`] is
//! copied straight into the softbuffer surface, which shares its
//! `0xAARRGGBB` layout.
//!
//! The event loop is never run; it is pumped without blocking on every
//! [`Presenter::poll_events`] call so the redraw loop keeps its own cadence.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use badge_specs::DeviceProfile;
use softbuffer::{Context, Surface};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as WinitWindow, WindowAttributes, WindowId};

use crate::canvas::Canvas;
use crate::error::{EmulatorError, Result};
use crate::presenter::{HostEvent, Presenter};

type WindowSurface = Surface<Arc<WinitWindow>, Arc<WinitWindow>>;

/// Host key name for a physical key, matching the button table's `key`
pub fn key_name(code: KeyCode) -> Option<&'static str> {
    let name = match code {
        KeyCode::KeyA => "a",
        KeyCode::KeyB => "b",
        KeyCode::KeyC => "c",
        KeyCode::KeyD => "d",
        KeyCode::KeyE => "e",
        KeyCode::KeyF => "f",
        KeyCode::KeyG => "g",
        KeyCode::KeyH => "h",
        KeyCode::KeyI => "i",
        KeyCode::KeyJ => "j",
        KeyCode::KeyK => "k",
        KeyCode::KeyL => "l",
        KeyCode::KeyM => "m",
        KeyCode::KeyN => "n",
        KeyCode::KeyO => "o",
        KeyCode::KeyP => "p",
        KeyCode::KeyQ => "q",
        KeyCode::KeyR => "r",
        KeyCode::KeyS => "s",
        KeyCode::KeyT => "t",
        KeyCode::KeyU => "u",
        KeyCode::KeyV => "v",
        KeyCode::KeyW => "w",
        KeyCode::KeyX => "x",
        KeyCode::KeyY => "y",
        KeyCode::KeyZ => "z",
        KeyCode::ArrowUp => "up",
        KeyCode::ArrowDown => "down",
        KeyCode::ArrowLeft => "left",
        KeyCode::ArrowRight => "right",
        KeyCode::Space => "space",
        KeyCode::Enter => "return",
        KeyCode::Escape => "escape",
        _ => return None,
    };
    Some(name)
}

/// Collects window events between pumps
#[derive(Debug, Default)]
struct EventCollector {
    events: Vec<HostEvent>,
    cursor: PhysicalPosition<f64>,
    left_held: bool,
}

impl EventCollector {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn cursor(&self) -> (u32, u32) {
        (self.cursor.x.max(0.0) as u32, self.cursor.y.max(0.0) as u32)
    }

    fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = position;
        if self.left_held {
            let (x, y) = self.cursor();
            self.events.push(HostEvent::PointerMoved { x, y });
        }
    }

    fn left_button(&mut self, state: ElementState) {
        let (x, y) = self.cursor();
        self.left_held = state == ElementState::Pressed;
        self.events.push(HostEvent::Pointer {
            x,
            y,
            pressed: self.left_held,
        });
    }
}

impl ApplicationHandler for EventCollector {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        // Window is created before events are pumped
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.events.push(HostEvent::CloseRequested),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(name) = key_name(code) {
                        self.events.push(HostEvent::Key {
                            name: name.to_owned(),
                            pressed: event.state == ElementState::Pressed,
                        });
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.left_button(state),
            _ => {}
        }
    }
}

/// Window-backed [`Presenter`]
pub struct WindowPresenter {
    event_loop: EventLoop<()>,
    window: Arc<WinitWindow>,
    surface: WindowSurface,
    collector: EventCollector,
    width: u32,
    height: u32,
}

impl WindowPresenter {
    /// Open a window sized for `profile`
    ///
    /// Fails with [`EmulatorError::Window`] when no display is available or
    /// an event loop already exists in this process.
    pub fn open(profile: &DeviceProfile) -> Result<Self> {
        let window_err = |e: &dyn std::fmt::Display| EmulatorError::Window(e.to_string());

        let mut event_loop = EventLoop::new().map_err(|e| window_err(&e))?;
        let (width, height) = profile.window_size();

        let window_attributes = WindowAttributes::default()
            .with_title(format!("Badge Simulator - {}", profile.name))
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(false);

        // Create the window from resumed() with a single short pump
        struct WindowCreator {
            window_attributes: Option<WindowAttributes>,
            created: Option<std::result::Result<(Arc<WinitWindow>, WindowSurface), String>>,
        }

        impl ApplicationHandler for WindowCreator {
            fn resumed(&mut self, event_loop: &ActiveEventLoop) {
                let Some(window_attributes) = self.window_attributes.take() else {
                    return;
                };
                let created = event_loop
                    .create_window(window_attributes)
                    .map_err(|e| format!("failed to create window: {e}"))
                    .and_then(|window| {
                        let window = Arc::new(window);
                        let context = Context::new(window.clone())
                            .map_err(|e| format!("failed to create context: {e}"))?;
                        let surface = Surface::new(&context, window.clone())
                            .map_err(|e| format!("failed to create surface: {e}"))?;
                        Ok((window, surface))
                    });
                self.created = Some(created);
            }

            fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
        }

        let mut creator = WindowCreator {
            window_attributes: Some(window_attributes),
            created: None,
        };
        let status = event_loop.pump_app_events(Some(Duration::from_millis(1)), &mut creator);

        let (window, mut surface) = match (status, creator.created) {
            (_, Some(created)) => created.map_err(EmulatorError::Window)?,
            (PumpStatus::Exit(code), None) => {
                return Err(EmulatorError::Window(format!(
                    "event loop exited with code {code} before the window was created"
                )))
            }
            (PumpStatus::Continue, None) => {
                return Err(EmulatorError::Window("window was not created".into()))
            }
        };

        let (w, h) = NonZeroU32::new(width)
            .zip(NonZeroU32::new(height))
            .ok_or_else(|| EmulatorError::Window(format!("zero window size {width}x{height}")))?;
        surface.resize(w, h).map_err(|e| window_err(&e))?;

        tracing::info!(width, height, device = %profile.name, "window opened");

        Ok(Self {
            event_loop,
            window,
            surface,
            collector: EventCollector::default(),
            width,
            height,
        })
    }
}

impl Presenter for WindowPresenter {
    fn present(&mut self, canvas: &Canvas) -> Result<()> {
        if (canvas.width(), canvas.height()) != (self.width, self.height) {
            return Err(EmulatorError::Window(format!(
                "canvas is {}x{}, window is {}x{}",
                canvas.width(),
                canvas.height(),
                self.width,
                self.height
            )));
        }
        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| EmulatorError::Window(e.to_string()))?;
        for (dst, &src) in buffer.iter_mut().zip(canvas.pixels()) {
            *dst = src;
        }
        buffer
            .present()
            .map_err(|e| EmulatorError::Window(e.to_string()))?;
        self.window.request_redraw();
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<HostEvent> {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.collector);
        let mut events = std::mem::take(&mut self.collector.events);
        if let PumpStatus::Exit(_) = status {
            events.push(HostEvent::CloseRequested);
        }
        events
    }
}
