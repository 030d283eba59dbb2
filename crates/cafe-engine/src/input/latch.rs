use std::collections::HashSet;
use std::hash::Hash;

use crate::coords::Vec2;

use super::types::{InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, MouseWheelDelta};

/// "Down now" vs "down at the last commit" for one kind of input.
#[derive(Debug, Clone)]
struct EdgeSet<T> {
    now: HashSet<T>,
    previous: HashSet<T>,
}

impl<T> Default for EdgeSet<T> {
    fn default() -> Self {
        Self {
            now: HashSet::new(),
            previous: HashSet::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> EdgeSet<T> {
    fn set(&mut self, id: T, down: bool) {
        if down {
            self.now.insert(id);
        } else {
            self.now.remove(&id);
        }
    }

    fn down(&self, id: T) -> bool {
        self.now.contains(&id)
    }

    fn pressed(&self, id: T) -> bool {
        self.now.contains(&id) && !self.previous.contains(&id)
    }

    fn released(&self, id: T) -> bool {
        !self.now.contains(&id) && self.previous.contains(&id)
    }

    fn commit(&mut self) {
        self.previous.clone_from(&self.now);
    }

    fn release_all(&mut self) {
        self.now.clear();
    }
}

/// Edge-detecting input state for a single window.
///
/// Raw platform events mutate only the "down now" half. [`commit_frame`](Self::commit_frame)
/// copies it into the "down previous" half; the game loop calls it once after each
/// update tick, so a press or release is reported by [`is_pressed`](Self::is_pressed) /
/// [`is_released`](Self::is_released) for exactly one tick.
///
/// A press and release that both land between two commits leave no trace.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    keys: EdgeSet<Key>,
    buttons: EdgeSet<MouseButton>,

    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<Vec2>,

    wheel: Vec2,
    text: String,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as held. Untracked keys are ignored.
    pub fn apply_down(&mut self, key: Key) {
        if key.is_tracked() {
            self.keys.set(key, true);
        }
    }

    /// Marks `key` as released. Untracked keys are ignored.
    pub fn apply_up(&mut self, key: Key) {
        if key.is_tracked() {
            self.keys.set(key, false);
        }
    }

    pub fn apply_button_down(&mut self, button: MouseButton) {
        self.buttons.set(button, true);
    }

    pub fn apply_button_up(&mut self, button: MouseButton) {
        self.buttons.set(button, false);
    }

    /// Applies a platform-agnostic input event.
    pub fn apply_event(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = m,

            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Avoids stuck keys/buttons when focus changes mid-press.
                    self.keys.release_all();
                    self.buttons.release_all();
                }
            }

            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some(Vec2::new(x, y)),

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => self.apply_down(key),
                KeyState::Released => self.apply_up(key),
            },

            InputEvent::PointerButton { button, state } => match state {
                MouseButtonState::Pressed => self.apply_button_down(button),
                MouseButtonState::Released => self.apply_button_up(button),
            },

            InputEvent::MouseWheel(delta) => {
                let (x, y) = match delta {
                    MouseWheelDelta::Line { x, y } | MouseWheelDelta::Pixel { x, y } => (x, y),
                };
                self.wheel = self.wheel + Vec2::new(x, y);
            }

            InputEvent::Text(t) => self.text.push_str(&t),
        }
    }

    /// Closes the current tick: "down previous" becomes "down now" and the
    /// per-tick wheel/text streams are emptied.
    pub fn commit_frame(&mut self) {
        self.keys.commit();
        self.buttons.commit();
        self.wheel = Vec2::zero();
        self.text.clear();
    }

    pub fn is_down(&self, key: Key) -> bool {
        key.is_tracked() && self.keys.down(key)
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        key.is_tracked() && self.keys.pressed(key)
    }

    pub fn is_released(&self, key: Key) -> bool {
        key.is_tracked() && self.keys.released(key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.down(button)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons.pressed(button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons.released(button)
    }

    /// Wheel movement since the last commit.
    pub fn wheel_delta(&self) -> Vec2 {
        self.wheel
    }

    /// Text committed since the last commit.
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_an_edge_hold_is_not() {
        let mut latch = InputLatch::new();

        latch.apply_down(Key::Space);
        assert!(latch.is_pressed(Key::Space));
        assert!(latch.is_down(Key::Space));

        latch.commit_frame();
        assert!(!latch.is_pressed(Key::Space));
        assert!(latch.is_down(Key::Space));

        latch.commit_frame();
        assert!(latch.is_down(Key::Space));

        latch.apply_up(Key::Space);
        assert!(latch.is_released(Key::Space));
        assert!(!latch.is_down(Key::Space));

        latch.commit_frame();
        assert!(!latch.is_released(Key::Space));
    }

    #[test]
    fn unknown_keys_are_always_up() {
        let mut latch = InputLatch::new();
        latch.apply_down(Key::Unknown(42));

        assert!(!latch.is_down(Key::Unknown(42)));
        assert!(!latch.is_pressed(Key::Unknown(42)));
        assert!(!latch.is_released(Key::Unknown(42)));
    }

    #[test]
    fn press_and_release_between_commits_is_not_observable() {
        let mut latch = InputLatch::new();
        latch.apply_down(Key::A);
        latch.apply_up(Key::A);

        assert!(!latch.is_down(Key::A));
        assert!(!latch.is_pressed(Key::A));
        assert!(!latch.is_released(Key::A), "was not down at the last commit");
    }

    #[test]
    fn release_and_repress_within_a_tick_keeps_key_held() {
        let mut latch = InputLatch::new();
        latch.apply_down(Key::W);
        latch.commit_frame();

        latch.apply_up(Key::W);
        latch.apply_down(Key::W);
        assert!(latch.is_down(Key::W));
        assert!(!latch.is_pressed(Key::W));
        assert!(!latch.is_released(Key::W));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut latch = InputLatch::new();
        latch.apply_event(InputEvent::Key {
            key: Key::D,
            state: KeyState::Pressed,
            repeat: false,
        });
        latch.apply_event(InputEvent::PointerButton {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
        });
        latch.commit_frame();

        latch.apply_event(InputEvent::Focused(false));
        assert!(latch.is_released(Key::D));
        assert!(latch.is_button_released(MouseButton::Left));
    }

    #[test]
    fn mouse_buttons_have_edges() {
        let mut latch = InputLatch::new();
        latch.apply_button_down(MouseButton::Right);
        assert!(latch.is_button_pressed(MouseButton::Right));

        latch.commit_frame();
        assert!(!latch.is_button_pressed(MouseButton::Right));
        assert!(latch.is_button_down(MouseButton::Right));
    }

    #[test]
    fn wheel_and_text_reset_on_commit() {
        let mut latch = InputLatch::new();
        latch.apply_event(InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 1.0 }));
        latch.apply_event(InputEvent::MouseWheel(MouseWheelDelta::Line { x: 0.0, y: 2.0 }));
        latch.apply_event(InputEvent::Text("hi".to_string()));

        assert_eq!(latch.wheel_delta(), Vec2::new(0.0, 3.0));
        assert_eq!(latch.text(), "hi");

        latch.commit_frame();
        assert_eq!(latch.wheel_delta(), Vec2::zero());
        assert_eq!(latch.text(), "");
    }

    #[test]
    fn pointer_tracks_moves_and_leave() {
        let mut latch = InputLatch::new();
        latch.apply_event(InputEvent::PointerMoved { x: 4.0, y: 8.0 });
        assert_eq!(latch.pointer_pos, Some(Vec2::new(4.0, 8.0)));

        latch.apply_event(InputEvent::PointerLeft);
        assert_eq!(latch.pointer_pos, None);
    }
}
