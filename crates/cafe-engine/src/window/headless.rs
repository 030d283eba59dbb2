use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;

use crate::input::{InputEvent, InputLatch};
use crate::time::ManualClock;

use super::{Platform, Window, WindowConfig};

/// One scripted occurrence delivered by [`HeadlessPlatform::poll_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessEvent {
    Input(InputEvent),
    /// Moves the platform clock forward.
    Advance(Duration),
    CloseRequested,
}

/// Platform without a display.
///
/// Each `poll_events` call advances the clock by `frame_delta`, then delivers
/// the next scripted batch. Time only moves when the script (or `sleep`) moves it,
/// which makes loop behavior fully deterministic.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    clock: ManualClock,
    batches: VecDeque<Vec<HeadlessEvent>>,
    frame_delta: Duration,
    close_when_exhausted: bool,
    polls: u64,
    slept: Duration,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock advance applied at every poll.
    pub fn with_frame_delta(mut self, frame_delta: Duration) -> Self {
        self.frame_delta = frame_delta;
        self
    }

    /// Requests window close once every scripted batch has been delivered.
    pub fn close_when_exhausted(mut self) -> Self {
        self.close_when_exhausted = true;
        self
    }

    /// Appends a batch delivered by one future poll.
    pub fn push_batch(&mut self, batch: impl IntoIterator<Item = HeadlessEvent>) {
        self.batches.push_back(batch.into_iter().collect());
    }

    /// Appends `count` empty polls.
    pub fn push_idle(&mut self, count: usize) {
        for _ in 0..count {
            self.batches.push_back(Vec::new());
        }
    }

    /// Shared handle to the platform clock.
    pub fn manual_clock(&self) -> ManualClock {
        self.clock.clone()
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Total time passed to `sleep`.
    pub fn slept(&self) -> Duration {
        self.slept
    }
}

impl Platform for HeadlessPlatform {
    type Window = HeadlessWindow;
    type Clock = ManualClock;

    fn name(&self) -> &'static str {
        "headless"
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<HeadlessWindow> {
        log::debug!("headless window \"{}\" {}x{}", config.title, config.width, config.height);
        Ok(HeadlessWindow {
            title: config.title.clone(),
            size: (config.width, config.height),
            open: true,
            input: InputLatch::default(),
        })
    }

    fn poll_events(&mut self, window: &mut HeadlessWindow) {
        self.polls += 1;
        self.clock.advance(self.frame_delta);

        let Some(batch) = self.batches.pop_front() else {
            if self.close_when_exhausted {
                window.close();
            }
            return;
        };

        for ev in batch {
            match ev {
                HeadlessEvent::Input(input) => window.input.apply_event(input),
                HeadlessEvent::Advance(by) => self.clock.advance(by),
                HeadlessEvent::CloseRequested => window.close(),
            }
        }
    }

    fn clock(&self) -> &ManualClock {
        &self.clock
    }

    fn sleep(&mut self, duration: Duration) {
        self.slept += duration;
        self.clock.advance(duration);
    }
}

/// Window without a surface.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    title: String,
    size: (u32, u32),
    open: bool,
    input: InputLatch,
}

impl HeadlessWindow {
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Window for HeadlessWindow {
    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn scale_factor(&self) -> f64 {
        1.0
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn input(&self) -> &InputLatch {
        &self.input
    }

    fn input_mut(&mut self) -> &mut InputLatch {
        &mut self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyState};

    fn key_down(key: Key) -> HeadlessEvent {
        HeadlessEvent::Input(InputEvent::Key {
            key,
            state: KeyState::Pressed,
            repeat: false,
        })
    }

    #[test]
    fn batches_are_delivered_one_per_poll() {
        let mut platform = HeadlessPlatform::new().with_frame_delta(Duration::from_millis(10));
        let mut window = platform
            .create_window(&WindowConfig::default())
            .expect("headless window");

        platform.push_batch([key_down(Key::A)]);
        platform.push_batch([HeadlessEvent::Advance(Duration::from_millis(5)), key_down(Key::B)]);

        platform.poll_events(&mut window);
        assert!(window.is_key_down(Key::A));
        assert!(!window.is_key_down(Key::B));
        assert_eq!(platform.now(), Duration::from_millis(10));

        platform.poll_events(&mut window);
        assert!(window.is_key_down(Key::B));
        assert_eq!(platform.now(), Duration::from_millis(25));
    }

    #[test]
    fn exhausted_script_can_close_the_window() {
        let mut platform = HeadlessPlatform::new().close_when_exhausted();
        let mut window = platform
            .create_window(&WindowConfig::default())
            .expect("headless window");
        platform.push_idle(1);

        platform.poll_events(&mut window);
        assert!(window.is_open());
        platform.poll_events(&mut window);
        assert!(!window.is_open());
    }

    #[test]
    fn sleep_advances_the_manual_clock() {
        let mut platform = HeadlessPlatform::new();
        platform.sleep(Duration::from_millis(3));
        assert_eq!(platform.now(), Duration::from_millis(3));
        assert_eq!(platform.slept(), Duration::from_millis(3));
    }
}
