//! Host presentation seam
//!
//! The renderer composes into a [`Canvas`] and hands it to a [`Presenter`].
//! The winit/softbuffer window is one implementation; headless rendering has
//! none. Input gathered by the presenter comes back as [`HostEvent`]s.

use crate::canvas::Canvas;
use crate::error::Result;

/// Input or lifecycle event from the host window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Keyboard key, by its lower-case host name (`"a"`, `"up"`, ...)
    Key {
        /// Key name
        name: String,
        /// Pressed (true) or released (false)
        pressed: bool,
    },
    /// Mouse button at a window position
    Pointer {
        /// Window x
        x: u32,
        /// Window y
        y: u32,
        /// Button went down (true) or up (false)
        pressed: bool,
    },
    /// Pointer moved while the left button is held
    PointerMoved {
        /// Window x
        x: u32,
        /// Window y
        y: u32,
    },
    /// The user closed the window
    CloseRequested,
}

/// Something that can show a composed canvas
pub trait Presenter {
    /// Show `canvas`; an error means the surface is gone for good
    fn present(&mut self, canvas: &Canvas) -> Result<()>;

    /// Drain pending host events without blocking
    fn poll_events(&mut self) -> Vec<HostEvent>;
}
