//! Error types for the rendering pipeline

use badge_specs::ProfileError;

/// Errors surfaced by the emulator
#[derive(Debug, thiserror::Error)]
pub enum EmulatorError {
    /// A frame was published whose size differs from the device
    #[error(
        "frame is {actual_width}x{actual_height}, device expects {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        /// Device width
        expected_width: u32,
        /// Device height
        expected_height: u32,
        /// Published frame width
        actual_width: u32,
        /// Published frame height
        actual_height: u32,
    },

    /// A raw pixel slice does not hold `width × height` values
    #[error("raw buffer holds {actual} pixels, expected {expected}")]
    BufferLength {
        /// `width × height`
        expected: usize,
        /// Slice length
        actual: usize,
    },

    /// The device profile failed validation
    #[error("invalid device profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    /// The host window or its surface could not be created or presented
    #[error("window unavailable: {0}")]
    Window(String),

    /// Screenshot encoding failed
    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem access failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = core::result::Result<T, EmulatorError>;
