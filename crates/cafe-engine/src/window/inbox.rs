use std::cell::RefCell;
use std::rc::Rc;

use crate::input::InputEvent;

use super::Window;

#[derive(Debug, Default)]
struct Pending {
    events: Vec<InputEvent>,
    close_requested: bool,
}

/// Queue between a callback-driven event source and a polled window.
///
/// Hosts that push native events (browser handlers) write into one clone; the
/// platform drains another into the window at poll time. Events reach the
/// latch in arrival order.
#[derive(Debug, Clone, Default)]
pub struct EventInbox {
    pending: Rc<RefCell<Pending>>,
}

impl EventInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: InputEvent) {
        self.pending.borrow_mut().events.push(event);
    }

    /// Sticky until drained.
    pub fn request_close(&self) {
        self.pending.borrow_mut().close_requested = true;
    }

    pub fn is_close_requested(&self) -> bool {
        self.pending.borrow().close_requested
    }

    /// Queued input events.
    pub fn len(&self) -> usize {
        self.pending.borrow().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies queued input to `window` and closes it if requested.
    ///
    /// Returns the number of input events delivered.
    pub fn drain_into(&self, window: &mut dyn Window) -> usize {
        let Pending {
            events,
            close_requested,
        } = std::mem::take(&mut *self.pending.borrow_mut());

        let delivered = events.len();
        let input = window.input_mut();
        for event in events {
            input.apply_event(event);
        }
        if close_requested {
            window.close();
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyState};
    use crate::window::{HeadlessPlatform, HeadlessWindow, Platform, WindowConfig};

    fn window() -> HeadlessWindow {
        HeadlessPlatform::new()
            .create_window(&WindowConfig::default())
            .unwrap()
    }

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            repeat: false,
        }
    }

    #[test]
    fn queued_events_reach_the_latch_in_order() {
        let source = EventInbox::new();
        let sink = source.clone();
        let mut window = window();

        source.push(key(Key::A, KeyState::Pressed));
        source.push(key(Key::A, KeyState::Released));
        source.push(key(Key::B, KeyState::Pressed));
        assert_eq!(sink.len(), 3);

        assert_eq!(sink.drain_into(&mut window), 3);
        assert!(!window.is_key_down(Key::A));
        assert!(window.is_key_down(Key::B));
        assert!(source.is_empty());
        assert!(window.is_open());
    }

    #[test]
    fn close_request_is_delivered_once() {
        let inbox = EventInbox::new();
        let mut window = window();

        inbox.request_close();
        assert!(inbox.is_close_requested());
        assert_eq!(inbox.drain_into(&mut window), 0);
        assert!(!window.is_open());
        assert!(!inbox.is_close_requested());
    }

    #[test]
    fn typed_text_is_forwarded() {
        let inbox = EventInbox::new();
        let mut window = window();

        inbox.push(InputEvent::Text("hi".into()));
        inbox.drain_into(&mut window);
        assert_eq!(window.input().text(), "hi");
    }
}
