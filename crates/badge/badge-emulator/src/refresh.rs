//! E-ink full refresh animation
//!
//! A physical e-ink panel does not switch images instantly. A full refresh
//! flashes the inverse of the old content, drives the panel to black, then
//! reveals the new image top to bottom:
//!
//! ```text
//! 0            0.15·D        0.30·D                       D
//! ├── Invert ───┼─── Blank ───┼──────── Reveal ────────────┤ Idle
//! ```
//!
//! The animator is a pure function of the start instant and `now`, so tests
//! drive it with synthetic instants.

use std::time::{Duration, Instant};

use crate::display_image::DisplayImage;
use crate::translate::InkTone;

/// Invert phase ends at this percentage of the duration
const INVERT_END_PCT: u128 = 15;

/// Blank phase ends (and reveal starts) at this percentage
const BLANK_END_PCT: u128 = 30;

/// Share of the duration spent revealing
const REVEAL_PCT: u128 = 70;

/// Refresh animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshPhase {
    /// Old content with every channel inverted
    Invert,
    /// Uniform ink black
    Blank,
    /// New content appearing row by row
    Reveal,
    /// Not animating; the target image is shown
    Idle,
}

impl RefreshPhase {
    /// Short label for logs and overlays
    pub fn name(&self) -> &'static str {
        match self {
            RefreshPhase::Invert => "invert",
            RefreshPhase::Blank => "blank",
            RefreshPhase::Reveal => "reveal",
            RefreshPhase::Idle => "idle",
        }
    }
}

/// Timed invert → blank → reveal state machine
#[derive(Debug, Clone)]
pub struct RefreshAnimator {
    duration: Duration,
    tone: InkTone,
    previous: DisplayImage,
    target: DisplayImage,
    started_at: Option<Instant>,
}

impl RefreshAnimator {
    /// Idle animator whose current image is blank paper
    pub fn new(width: u32, height: u32, duration: Duration, tone: InkTone) -> Self {
        let paper = DisplayImage::filled(width, height, tone.white());
        Self {
            duration,
            tone,
            previous: paper.clone(),
            target: paper,
            started_at: None,
        }
    }

    /// Begin a refresh towards `image`
    ///
    /// The current target becomes the outgoing image, including when a
    /// refresh is already in flight.
    pub fn start(&mut self, image: DisplayImage, now: Instant) {
        let restarted = self.is_animating(now);
        self.previous = std::mem::replace(&mut self.target, image);
        self.started_at = Some(now);
        tracing::debug!(
            duration_ms = u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX),
            restarted,
            "e-ink refresh started"
        );
    }

    /// Refresh duration `D`
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Image the running (or last) refresh converges to
    pub fn target(&self) -> &DisplayImage {
        &self.target
    }

    /// Image the running (or last) refresh started from
    pub fn previous(&self) -> &DisplayImage {
        &self.previous
    }

    fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .filter(|elapsed| *elapsed < self.duration)
    }

    /// Phase at `now`
    pub fn phase(&self, now: Instant) -> RefreshPhase {
        let Some(elapsed) = self.elapsed(now) else {
            return RefreshPhase::Idle;
        };
        let pct_scaled = elapsed.as_nanos().saturating_mul(100);
        let d = self.duration.as_nanos();
        if pct_scaled < d.saturating_mul(INVERT_END_PCT) {
            RefreshPhase::Invert
        } else if pct_scaled < d.saturating_mul(BLANK_END_PCT) {
            RefreshPhase::Blank
        } else {
            RefreshPhase::Reveal
        }
    }

    /// True while a refresh is in progress at `now`
    pub fn is_animating(&self, now: Instant) -> bool {
        self.phase(now) != RefreshPhase::Idle
    }

    /// Number of target rows visible at `now`
    ///
    /// Zero before the reveal phase, `⌊f·H⌋` during it (with `f` the elapsed
    /// fraction of the reveal phase) and `H` once idle. Non-decreasing in
    /// `now`.
    pub fn revealed_rows(&self, now: Instant) -> u32 {
        let height = self.target.height();
        match self.phase(now) {
            RefreshPhase::Idle => height,
            RefreshPhase::Invert | RefreshPhase::Blank => 0,
            RefreshPhase::Reveal => {
                let Some(elapsed) = self.elapsed(now) else {
                    return height;
                };
                let d = self.duration.as_nanos();
                let into_reveal = elapsed
                    .as_nanos()
                    .saturating_mul(100)
                    .saturating_sub(d.saturating_mul(BLANK_END_PCT));
                let span = d.saturating_mul(REVEAL_PCT);
                let rows = into_reveal
                    .saturating_mul(u128::from(height))
                    .checked_div(span)
                    .unwrap_or(u128::from(height));
                u32::try_from(rows).map_or(height, |r| r.min(height))
            }
        }
    }

    /// Display content at `now`
    pub fn render(&self, now: Instant) -> DisplayImage {
        match self.phase(now) {
            RefreshPhase::Idle => self.target.clone(),
            RefreshPhase::Invert => self.previous.inverted(),
            RefreshPhase::Blank => DisplayImage::filled(
                self.target.width(),
                self.target.height(),
                self.tone.black(),
            ),
            RefreshPhase::Reveal => {
                let rows = self.revealed_rows(now);
                let mut image = DisplayImage::filled(
                    self.target.width(),
                    self.target.height(),
                    self.tone.white(),
                );
                for (y, row) in (0..rows).zip(self.target.rows()) {
                    for (x, &color) in (0u32..).zip(row.iter()) {
                        image.set(x, y, color);
                    }
                }
                image
            }
        }
    }

    /// Drop the running animation once it has completed
    ///
    /// Returns true exactly once per refresh, on the first call at or after
    /// `start + D`.
    pub fn finish_if_done(&mut self, now: Instant) -> bool {
        if self.started_at.is_some() && !self.is_animating(now) {
            self.started_at = None;
            tracing::debug!("e-ink refresh finished");
            true
        } else {
            false
        }
    }
}
