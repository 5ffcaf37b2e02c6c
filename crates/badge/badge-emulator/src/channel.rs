//! Latest-wins frame handoff between the application and redraw threads
//!
//! - [`FramePublisher`]: producer, cloned into the application thread.
//! - [`FrameChannel`]: consumer, owned by the redraw thread's renderer.
//!
//! A single slot holds at most one published frame. Publishing copies the
//! producer's buffer outside the lock and swaps it into the slot under a
//! short critical section; an unconsumed frame is replaced, never queued.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use badge_specs::DeviceProfile;

use crate::error::{EmulatorError, Result};
use crate::framebuffer::FrameBuffer;

#[derive(Debug, Default)]
struct Slot {
    frame: Option<FrameBuffer>,
    published: u64,
    dropped: u64,
}

#[derive(Debug)]
struct Shared {
    width: u32,
    height: u32,
    slot: Mutex<Slot>,
}

impl Shared {
    /// Lock the slot, recovering from a producer that panicked mid-call.
    ///
    /// The slot is only ever assigned whole frames, so a poisoned guard still
    /// protects consistent data.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, frame: &FrameBuffer) -> Result<()> {
        if frame.dimensions() != (self.width, self.height) {
            return Err(EmulatorError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: frame.width(),
                actual_height: frame.height(),
            });
        }

        let copy = frame.clone();
        let displaced = {
            let mut slot = self.lock();
            let displaced = slot.frame.replace(copy);
            slot.published = slot.published.saturating_add(1);
            if displaced.is_some() {
                slot.dropped = slot.dropped.saturating_add(1);
            }
            displaced
        };
        // Freed after the lock is released
        drop(displaced);

        tracing::trace!(width = self.width, height = self.height, "frame published");
        Ok(())
    }
}

/// Consumer side of the frame handoff
#[derive(Debug)]
pub struct FrameChannel {
    shared: Arc<Shared>,
}

impl FrameChannel {
    /// Create a channel for frames of exactly `width × height`
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            shared: Arc::new(Shared {
                width,
                height,
                slot: Mutex::new(Slot::default()),
            }),
        }
    }

    /// Create a channel sized to a device
    pub fn for_profile(profile: &DeviceProfile) -> Self {
        Self::new(profile.width, profile.height)
    }

    /// Declared frame size
    pub fn dimensions(&self) -> (u32, u32) {
        (self.shared.width, self.shared.height)
    }

    /// Producer handle for the application thread
    pub fn publisher(&self) -> FramePublisher {
        FramePublisher {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Publish from the consumer's own thread (tests, single-threaded hosts)
    pub fn publish(&self, frame: &FrameBuffer) -> Result<()> {
        self.shared.publish(frame)
    }

    /// Take the newest frame if one arrived since the last take
    pub fn take_latest(&self) -> Option<FrameBuffer> {
        let frame = self.shared.lock().frame.take();
        if frame.is_some() {
            tracing::trace!("frame taken");
        }
        frame
    }

    /// A frame is waiting to be taken
    pub fn is_dirty(&self) -> bool {
        self.shared.lock().frame.is_some()
    }

    /// Frames accepted by `publish` so far
    pub fn published_count(&self) -> u64 {
        self.shared.lock().published
    }

    /// Frames replaced before the consumer took them
    pub fn dropped_count(&self) -> u64 {
        self.shared.lock().dropped
    }
}

/// Producer side of the frame handoff
///
/// Cheap to clone and `Send`; each clone publishes into the same slot.
#[derive(Debug, Clone)]
pub struct FramePublisher {
    shared: Arc<Shared>,
}

impl FramePublisher {
    /// Copy `frame` into the channel, replacing any unconsumed frame
    ///
    /// Returns [`EmulatorError::DimensionMismatch`] without touching the slot
    /// when the frame is not the device size.
    pub fn publish(&self, frame: &FrameBuffer) -> Result<()> {
        self.shared.publish(frame)
    }

    /// Declared frame size
    pub fn dimensions(&self) -> (u32, u32) {
        (self.shared.width, self.shared.height)
    }
}
