//! Cross-thread frame handoff and redraw driver tests

// Integration test file: panics are the failure signal.
#![allow(clippy::arithmetic_side_effects, clippy::unwrap_used, clippy::panic)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use badge_emulator::{
    run_redraw, FrameBuffer, FrameChannel, FramePacer, Pixel, RedrawLoop, RenderConfig, Renderer,
};
use badge_specs::devices;
use embedded_graphics::pixelcolor::Rgb888;
use tokio::sync::watch;

const FRAMES: u8 = 200;

#[test]
fn test_consumer_never_sees_torn_frames() {
    let channel = FrameChannel::new(64, 32);
    let publisher = channel.publisher();

    let producer = std::thread::spawn(move || {
        for level in 1..=FRAMES {
            let frame = FrameBuffer::filled(64, 32, Pixel::Indexed(level));
            publisher.publish(&frame).unwrap();
        }
    });

    let mut last_seen = 0u8;
    let mut taken = 0u32;
    while !producer.is_finished() || channel.is_dirty() {
        if let Some(frame) = channel.take_latest() {
            let first = frame.get_pixel(0, 0).unwrap();
            assert!(frame.pixels().iter().all(|&p| p == first), "torn frame");
            let Pixel::Indexed(level) = first else {
                panic!("unexpected pixel {first:?}");
            };
            assert!(level > last_seen, "frame {level} after {last_seen}");
            last_seen = level;
            taken += 1;
        }
    }
    producer.join().unwrap();

    assert_eq!(last_seen, FRAMES);
    assert_eq!(channel.published_count(), u64::from(FRAMES));
    assert_eq!(
        channel.dropped_count() + u64::from(taken),
        u64::from(FRAMES)
    );
}

#[test]
fn test_publisher_rejects_wrong_size() {
    let renderer = Renderer::headless(devices::TUFTY_2350).unwrap();
    let err = renderer
        .publisher()
        .publish(&FrameBuffer::new(10, 10))
        .unwrap_err();
    assert!(err.to_string().contains("320x240"));
    assert!(!renderer.channel().is_dirty());
}

#[test]
fn test_app_thread_publishes_while_redraw_loop_runs() {
    let mut renderer = Renderer::headless(devices::TUFTY_2350).unwrap();
    let publisher = renderer.publisher();
    let stop = Arc::new(AtomicBool::new(false));

    let app = {
        let stop = Arc::clone(&stop);
        std::thread::spawn(move || {
            let frame = FrameBuffer::filled(320, 240, Pixel::Rgb(0, 128, 255));
            for _ in 0..5 {
                publisher.publish(&frame).unwrap();
                std::thread::sleep(Duration::from_millis(5));
            }
            std::thread::sleep(Duration::from_millis(20));
            stop.store(true, Ordering::Release);
        })
    };

    let mut redraw = RedrawLoop::new(FramePacer::new(Duration::from_millis(2)));
    let ticks = redraw.run_until(&mut renderer, &stop);
    app.join().unwrap();

    assert!(ticks > 0);
    assert!(renderer.frame_count() >= 1);
    assert_eq!(
        renderer.display_image().unwrap().get(319, 239),
        Some(Rgb888::new(0, 128, 255))
    );
}

#[test]
fn test_run_for_stops_on_time() {
    let mut renderer = Renderer::headless(devices::BLINKY_2350).unwrap();
    let mut redraw = RedrawLoop::for_renderer(&renderer);
    let start = Instant::now();
    let ticks = redraw.run_for(&mut renderer, Duration::from_millis(50));
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert!(ticks >= 1);
    assert_eq!(redraw.ticks(), ticks);
}

#[tokio::test(start_paused = true)]
async fn test_async_redraw_until_shutdown() {
    let config = RenderConfig {
        target_fps: 50,
        ..RenderConfig::HEADLESS
    };
    let mut renderer = Renderer::new(devices::BADGER_2350, config).unwrap();
    let publisher = renderer.publisher();
    let (shutdown, rx) = watch::channel(false);

    let app = async move {
        let frame = FrameBuffer::filled(296, 128, Pixel::Indexed(0));
        publisher.publish(&frame).unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;
        shutdown.send(true).unwrap();
    };
    let (ticks, ()) = tokio::join!(run_redraw(&mut renderer, rx), app);

    // 20ms period over 600ms, first tick immediate
    assert!((30..=32).contains(&ticks), "{ticks} ticks");
    assert_eq!(renderer.frame_count(), 1);
    assert!(!renderer.is_refreshing());
}

#[tokio::test(start_paused = true)]
async fn test_async_redraw_stops_when_sender_dropped() {
    let mut renderer = Renderer::headless(devices::TUFTY_2350).unwrap();
    let (shutdown, rx) = watch::channel(false);
    let app = async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(shutdown);
    };
    let (ticks, ()) = tokio::join!(run_redraw(&mut renderer, rx), app);
    assert!(ticks >= 1);
}
