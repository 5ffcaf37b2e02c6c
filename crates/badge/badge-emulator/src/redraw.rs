//! Redraw cadence
//!
//! The redraw thread ticks the [`Renderer`] at a fixed rate regardless of how
//! often the application publishes. Two drivers are provided:
//!
//! - [`RedrawLoop`]: blocking loop paced with `std::thread::sleep`, for a
//!   dedicated OS thread (or the main thread that owns the window).
//! - [`run_redraw`]: async task on `tokio::time::interval`, for hosts that
//!   already run a single-threaded executor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::renderer::Renderer;

/// Fixed-interval frame scheduler
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    next: Option<Instant>,
}

impl FramePacer {
    /// Pacer with a fixed interval between frames
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    /// Pacer for a frame rate (`0` is treated as 1 fps)
    pub fn from_fps(fps: u32) -> Self {
        let interval = Duration::from_secs(1)
            .checked_div(fps.max(1))
            .unwrap_or(Duration::from_secs(1));
        Self::new(interval)
    }

    /// Interval between frames
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left until the next frame is due (zero when due now)
    pub fn delay(&self, now: Instant) -> Duration {
        self.next
            .map_or(Duration::ZERO, |next| next.saturating_duration_since(now))
    }

    /// Record a frame at `now` and schedule the next one
    ///
    /// A host that falls behind skips missed slots instead of bursting.
    pub fn mark(&mut self, now: Instant) {
        let scheduled = self
            .next
            .and_then(|next| next.checked_add(self.interval))
            .filter(|next| *next > now);
        self.next = scheduled.or_else(|| now.checked_add(self.interval));
    }
}

/// Blocking redraw driver
#[derive(Debug, Clone)]
pub struct RedrawLoop {
    pacer: FramePacer,
    ticks: u64,
}

impl RedrawLoop {
    /// Loop paced at the renderer's configured frame rate
    pub fn for_renderer(renderer: &Renderer) -> Self {
        Self::new(FramePacer::new(renderer.config().frame_interval()))
    }

    /// Loop with an explicit pacer
    pub fn new(pacer: FramePacer) -> Self {
        Self { pacer, ticks: 0 }
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Sleep until the next frame is due, then tick once
    ///
    /// Returns whether the canvas was recomposed.
    pub fn step(&mut self, renderer: &mut Renderer) -> bool {
        let delay = self.pacer.delay(Instant::now());
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        let now = Instant::now();
        self.pacer.mark(now);
        self.ticks = self.ticks.saturating_add(1);
        renderer.tick(now)
    }

    /// Tick until `stop` is set or the window is closed
    pub fn run_until(&mut self, renderer: &mut Renderer, stop: &AtomicBool) -> u64 {
        let start = self.ticks;
        while !stop.load(Ordering::Acquire) && !renderer.is_closed() {
            self.step(renderer);
        }
        self.ticks.saturating_sub(start)
    }

    /// Tick for `duration` of wall-clock time (or until the window closes)
    pub fn run_for(&mut self, renderer: &mut Renderer, duration: Duration) -> u64 {
        let start = self.ticks;
        let deadline = Instant::now().checked_add(duration);
        while deadline.is_some_and(|d| Instant::now() < d) && !renderer.is_closed() {
            self.step(renderer);
        }
        self.ticks.saturating_sub(start)
    }
}

/// Drive `renderer` from an async task until `shutdown` turns true
///
/// Ticks on a `tokio::time::interval` at the configured frame rate, skipping
/// missed ticks. Also stops when the sender is dropped or the window closes.
/// Returns the number of ticks run.
pub async fn run_redraw(renderer: &mut Renderer, mut shutdown: watch::Receiver<bool>) -> u64 {
    let mut interval = tokio::time::interval(renderer.config().frame_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticks = 0u64;

    tracing::debug!(
        interval_us = u64::try_from(interval.period().as_micros()).unwrap_or(u64::MAX),
        "redraw task started"
    );

    loop {
        if *shutdown.borrow() || renderer.is_closed() {
            break;
        }
        tokio::select! {
            instant = interval.tick() => {
                renderer.tick(instant.into_std());
                ticks = ticks.saturating_add(1);
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    tracing::debug!(ticks, "redraw task stopped");
    ticks
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;

    #[test]
    fn test_pacer_first_frame_is_due() {
        let pacer = FramePacer::from_fps(60);
        assert_eq!(pacer.delay(Instant::now()), Duration::ZERO);
        assert_eq!(pacer.interval(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn test_pacer_schedules_next() {
        let mut pacer = FramePacer::new(Duration::from_millis(10));
        let t0 = Instant::now();
        pacer.mark(t0);
        assert_eq!(pacer.delay(t0), Duration::from_millis(10));
        assert_eq!(pacer.delay(t0 + Duration::from_millis(4)), Duration::from_millis(6));
        assert_eq!(pacer.delay(t0 + Duration::from_millis(12)), Duration::ZERO);

        // On time: keeps the fixed grid
        pacer.mark(t0 + Duration::from_millis(10));
        assert_eq!(pacer.delay(t0 + Duration::from_millis(10)), Duration::from_millis(10));
    }

    #[test]
    fn test_pacer_skips_missed_slots() {
        let mut pacer = FramePacer::new(Duration::from_millis(10));
        let t0 = Instant::now();
        pacer.mark(t0);
        let late = t0 + Duration::from_millis(55);
        pacer.mark(late);
        assert_eq!(pacer.delay(late), Duration::from_millis(10));
    }

    #[test]
    fn test_zero_fps() {
        assert_eq!(FramePacer::from_fps(0).interval(), Duration::from_secs(1));
    }
}
