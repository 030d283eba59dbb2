//! A loop driven one frame at a time by an outside host, the way a browser
//! animation-frame callback drives it, with input arriving through an inbox.

use std::cell::RefCell;
use std::time::Duration;

use anyhow::Result;

use cafe_engine::core::{LoopConfig, LoopDriver, LoopPhase};
use cafe_engine::input::{InputEvent, InputLatch, Key, KeyState};
use cafe_engine::time::{Clock, ManualClock};
use cafe_engine::window::{EventInbox, Platform, Window, WindowConfig};

const STEP: Duration = Duration::from_millis(20);

/// Platform whose events are pushed by a host instead of polled from an OS.
struct InboxPlatform {
    clock: ManualClock,
    inbox: EventInbox,
    sleeps: usize,
}

struct CanvasWindow {
    open: bool,
    input: InputLatch,
}

impl Platform for InboxPlatform {
    type Window = CanvasWindow;
    type Clock = ManualClock;

    fn name(&self) -> &'static str {
        "inbox"
    }

    fn create_window(&mut self, _config: &WindowConfig) -> Result<CanvasWindow> {
        Ok(CanvasWindow {
            open: true,
            input: InputLatch::default(),
        })
    }

    fn poll_events(&mut self, window: &mut CanvasWindow) {
        self.inbox.drain_into(window);
    }

    fn clock(&self) -> &ManualClock {
        &self.clock
    }

    fn sleep(&mut self, _duration: Duration) {
        self.sleeps += 1;
    }
}

impl Window for CanvasWindow {
    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn size(&self) -> (u32, u32) {
        (800, 600)
    }

    fn scale_factor(&self) -> f64 {
        1.0
    }

    fn set_title(&mut self, _title: &str) {}

    fn input(&self) -> &InputLatch {
        &self.input
    }

    fn input_mut(&mut self) -> &mut InputLatch {
        &mut self.input
    }
}

fn key(key: Key, state: KeyState) -> InputEvent {
    InputEvent::Key {
        key,
        state,
        repeat: false,
    }
}

#[test]
fn host_frames_deliver_inbox_input_with_single_tick_edges() {
    let clock = ManualClock::new();
    let inbox = EventInbox::new();
    let mut platform = InboxPlatform {
        clock: clock.clone(),
        inbox: inbox.clone(),
        sleeps: 0,
    };
    let mut window = platform.create_window(&WindowConfig::default()).unwrap();

    let seen = RefCell::new(Vec::new());
    let config = LoopConfig::default().tick_rate(50);
    let mut driver = LoopDriver::new(&mut platform, &mut window, config).on_update(|ctx| {
        let input = ctx.input();
        seen.borrow_mut()
            .push((input.is_pressed(Key::Space), input.is_down(Key::Space)));
        Ok(())
    });

    driver.begin().unwrap();

    // Events pushed between frames land on the next frame's first tick.
    inbox.push(key(Key::Space, KeyState::Pressed));
    clock.advance(STEP);
    assert!(driver.run_frame().unwrap());

    clock.advance(STEP);
    assert!(driver.run_frame().unwrap());

    inbox.push(key(Key::Space, KeyState::Released));
    inbox.request_close();
    clock.advance(STEP);
    assert!(!driver.run_frame().unwrap());

    driver.end();
    assert_eq!(driver.phase(), LoopPhase::Stopped);
    assert_eq!(*seen.borrow(), vec![(true, true), (false, true)]);
    assert!(!driver.run_frame().unwrap());
}

#[test]
fn host_frames_with_a_frame_cap_only_hand_the_wait_to_the_platform() {
    let clock = ManualClock::new();
    let mut platform = InboxPlatform {
        clock: clock.clone(),
        inbox: EventInbox::new(),
        sleeps: 0,
    };
    let mut window = platform.create_window(&WindowConfig::default()).unwrap();

    let config = LoopConfig::default().tick_rate(50).frame_rate_cap(Some(30));
    let mut driver = LoopDriver::new(&mut platform, &mut window, config);
    driver.begin().unwrap();
    for _ in 0..3 {
        clock.advance(STEP);
        assert!(driver.run_frame().unwrap());
    }
    assert_eq!(driver.ticks_run(), 3);
    driver.end();
    drop(driver);

    // A browser platform ignores these; the clock never moved on its own.
    assert_eq!(platform.sleeps, 3);
    assert_eq!(clock.now(), STEP * 3);
}
