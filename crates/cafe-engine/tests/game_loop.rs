use std::cell::{Cell, RefCell};
use std::time::Duration;

use cafe_engine::audio::{AudioSystem, NullAudio, PlayOptions};
use cafe_engine::coords::{lerp, Vec2};
use cafe_engine::core::{LoopConfig, LoopDriver, LoopPhase};
use cafe_engine::input::{InputEvent, InputMap, Key, KeyState};
use cafe_engine::paint::Color;
use cafe_engine::render::{NullRenderer, Renderer};
use cafe_engine::window::{HeadlessEvent, HeadlessPlatform, Platform, WindowConfig};

const STEP: Duration = Duration::from_millis(20);

fn key(key: Key, state: KeyState) -> HeadlessEvent {
    HeadlessEvent::Input(InputEvent::Key {
        key,
        state,
        repeat: false,
    })
}

#[test]
fn simulation_is_independent_of_frame_rate() {
    // Same 600 ms of wall time, split into different frame sizes.
    let mut positions = Vec::new();

    for frame_ms in [5u64, 20, 30, 60] {
        let frames = (600 / frame_ms) as usize;
        let mut platform = HeadlessPlatform::new()
            .with_frame_delta(Duration::from_millis(frame_ms))
            .close_when_exhausted();
        platform.push_idle(frames);
        let mut window = platform.create_window(&WindowConfig::default()).unwrap();

        let x = Cell::new(0.0f32);
        let config = LoopConfig::default().tick_rate(50);
        let mut driver = LoopDriver::new(&mut platform, &mut window, config).on_update(|ctx| {
            x.set(x.get() + 100.0 * ctx.dt_secs());
            Ok(())
        });
        driver.run().unwrap();

        assert_eq!(driver.ticks_run(), 30, "{frame_ms} ms frames");
        positions.push(x.get());
    }

    for p in &positions {
        assert!((p - positions[0]).abs() < 1e-3, "{positions:?}");
    }
}

#[test]
fn rendered_position_interpolates_between_ticks() {
    let mut platform = HeadlessPlatform::new()
        .with_frame_delta(Duration::from_millis(10))
        .close_when_exhausted();
    platform.push_idle(4);
    let mut window = platform.create_window(&WindowConfig::default()).unwrap();

    let previous = Cell::new(0.0f32);
    let current = Cell::new(0.0f32);
    let drawn = RefCell::new(Vec::new());

    let config = LoopConfig::default().tick_rate(50);
    let mut driver = LoopDriver::new(&mut platform, &mut window, config)
        .on_update(|_| {
            previous.set(current.get());
            current.set(current.get() + 10.0);
            Ok(())
        })
        .on_render(|ctx| {
            drawn
                .borrow_mut()
                .push(lerp(previous.get(), current.get(), ctx.alpha));
            Ok(())
        });
    driver.run().unwrap();
    drop(driver);

    // Frames land at 10, 20, 30, 40 ms with a 20 ms step; the drawn position
    // trails the simulation by at most one tick.
    let drawn = drawn.into_inner();
    assert_eq!(drawn.len(), 4);
    assert!((drawn[0] - 0.0).abs() < 1e-4);
    assert!((drawn[1] - 0.0).abs() < 1e-4);
    assert!((drawn[2] - 5.0).abs() < 1e-3);
    assert!((drawn[3] - 10.0).abs() < 1e-4);
}

#[test]
fn input_map_actions_follow_tick_edges() {
    let mut platform = HeadlessPlatform::new()
        .with_frame_delta(STEP)
        .close_when_exhausted();
    platform.push_batch([key(Key::Space, KeyState::Pressed)]);
    platform.push_idle(1);
    platform.push_batch([key(Key::Space, KeyState::Released)]);
    platform.push_batch([key(Key::Escape, KeyState::Pressed)]);
    platform.push_idle(10);
    let mut window = platform.create_window(&WindowConfig::default()).unwrap();

    let mut map = InputMap::new();
    map.add_standard_movement();

    let confirms = Cell::new(0);
    let releases = Cell::new(0);
    let config = LoopConfig::default().tick_rate(50);
    let mut driver = LoopDriver::new(&mut platform, &mut window, config).on_update(|ctx| {
        let latch = ctx.input();
        if map.is_action_pressed(latch, "confirm") {
            confirms.set(confirms.get() + 1);
        }
        if map.is_action_released(latch, "confirm") {
            releases.set(releases.get() + 1);
        }
        if map.is_action_pressed(latch, "cancel") {
            ctx.stop();
        }
        Ok(())
    });
    driver.run().unwrap();

    assert_eq!(confirms.get(), 1);
    assert_eq!(releases.get(), 1);
    assert_eq!(driver.ticks_run(), 4);
    assert_eq!(driver.phase(), LoopPhase::Stopped);
}

#[test]
fn collaborators_are_driven_from_callbacks() {
    let mut platform = HeadlessPlatform::new()
        .with_frame_delta(STEP)
        .close_when_exhausted();
    platform.push_idle(3);
    let mut window = platform.create_window(&WindowConfig::default()).unwrap();

    let renderer = RefCell::new(NullRenderer::new());
    let audio = RefCell::new(NullAudio::new());
    audio.borrow_mut().initialize().unwrap();
    let sfx = audio.borrow_mut().load_sound("step.wav").unwrap();

    let config = LoopConfig::default().tick_rate(50);
    let mut driver = LoopDriver::new(&mut platform, &mut window, config)
        .on_update(|ctx| {
            let mut audio = audio.borrow_mut();
            audio.update();
            if ctx.tick_index == 0 {
                audio.play_sound(sfx, PlayOptions::default().looping(true));
            }
            Ok(())
        })
        .on_render(|ctx| {
            let mut r = renderer.borrow_mut();
            r.begin_frame()?;
            r.clear();
            r.draw_quad(
                Vec2::new(ctx.alpha, 0.0),
                Vec2::new(8.0, 8.0),
                Color::from_srgb_u8(255, 128, 0, 255),
            );
            r.end_frame()
        });
    driver.run().unwrap();
    drop(driver);

    let renderer = renderer.into_inner();
    assert_eq!(renderer.frames(), 3);
    assert_eq!(renderer.clears(), 3);
    assert_eq!(renderer.quads_last_frame(), 1);
    assert!(!renderer.is_in_frame());
    assert_eq!(audio.borrow().active_channels(), 1);
}

#[test]
fn stall_does_not_cause_a_catch_up_burst() {
    let mut platform = HeadlessPlatform::new()
        .with_frame_delta(STEP)
        .close_when_exhausted();
    platform.push_idle(1);
    platform.push_batch([HeadlessEvent::Advance(Duration::from_secs(5))]);
    platform.push_idle(1);
    let mut window = platform.create_window(&WindowConfig::default()).unwrap();

    let per_frame = RefCell::new(Vec::new());
    let ticks = Cell::new(0u32);
    let config = LoopConfig::default().tick_rate(50).max_steps_per_frame(5);
    let mut driver = LoopDriver::new(&mut platform, &mut window, config)
        .on_update(|_| {
            ticks.set(ticks.get() + 1);
            Ok(())
        })
        .on_render(|_| {
            per_frame.borrow_mut().push(ticks.replace(0));
            Ok(())
        });
    driver.run().unwrap();

    assert_eq!(*per_frame.borrow(), vec![1, 5, 1]);
}
