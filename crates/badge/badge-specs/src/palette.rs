//! Fixed reference palettes for color e-ink quantization

/// Ordered list of reference colors a panel can physically show.
///
/// Declaration order matters: quantization breaks distance ties in favour of
/// the earlier entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Marketing name of the ink set
    pub name: &'static str,
    /// RGB triples, in declaration order
    pub colors: &'static [[u8; 3]],
}

impl Palette {
    /// Plain black and white (mono e-ink, and the fallback for unknown counts)
    pub const BLACK_WHITE: Self = Self {
        name: "Black/White",
        colors: &[[0, 0, 0], [255, 255, 255]],
    };

    /// Spectra 6 (Inky Frame 7.3", Inky Impression 7.3")
    pub const SPECTRA_6: Self = Self {
        name: "Spectra 6",
        colors: &[
            [0, 0, 0],       // Black
            [255, 255, 255], // White
            [0, 128, 0],     // Green
            [0, 0, 255],     // Blue
            [255, 0, 0],     // Red
            [255, 255, 0],   // Yellow
        ],
    };

    /// ACeP 7 (Inky Frame 4.0" / 5.8", Inky Impression 4.0" / 5.7")
    pub const ACEP_7: Self = Self {
        name: "ACeP 7",
        colors: &[
            [0, 0, 0],       // Black
            [255, 255, 255], // White
            [0, 128, 0],     // Green
            [0, 0, 255],     // Blue
            [255, 0, 0],     // Red
            [255, 255, 0],   // Yellow
            [255, 128, 0],   // Orange
        ],
    };

    /// Select the palette for a declared ink color count.
    ///
    /// Counts without a known ink set fall back to [`Palette::BLACK_WHITE`].
    pub const fn for_color_count(count: u8) -> Self {
        match count {
            6 => Self::SPECTRA_6,
            7 => Self::ACEP_7,
            _ => Self::BLACK_WHITE,
        }
    }

    /// Number of reference colors
    pub const fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when the palette declares no colors (never the case for built-ins)
    pub const fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::BLACK_WHITE
    }
}
