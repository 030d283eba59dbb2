use std::collections::HashMap;

use crate::coords::Vec2;

use super::latch::InputLatch;
use super::types::{Key, MouseButton};

/// One physical input that can trigger an action.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Binding {
    Key(Key),
    Mouse(MouseButton),
}

impl Binding {
    fn held(self, latch: &InputLatch) -> bool {
        match self {
            Binding::Key(k) => latch.is_down(k),
            Binding::Mouse(b) => latch.is_button_down(b),
        }
    }

    fn pressed(self, latch: &InputLatch) -> bool {
        match self {
            Binding::Key(k) => latch.is_pressed(k),
            Binding::Mouse(b) => latch.is_button_pressed(b),
        }
    }

    fn released(self, latch: &InputLatch) -> bool {
        match self {
            Binding::Key(k) => latch.is_released(k),
            Binding::Mouse(b) => latch.is_button_released(b),
        }
    }
}

/// Named input triggered by any of its bindings.
#[derive(Debug, Clone, Default)]
pub struct InputAction {
    pub name: String,
    pub bindings: Vec<Binding>,
}

impl InputAction {
    pub fn add_key(&mut self, key: Key) -> &mut Self {
        self.bindings.push(Binding::Key(key));
        self
    }

    pub fn add_mouse(&mut self, button: MouseButton) -> &mut Self {
        self.bindings.push(Binding::Mouse(button));
        self
    }

    pub fn clear_bindings(&mut self) -> &mut Self {
        self.bindings.clear();
        self
    }
}

/// Analog value in `[-1, 1]` synthesized from a negative and a positive key.
#[derive(Debug, Clone)]
pub struct InputAxis {
    pub name: String,
    pub negative: Option<Key>,
    pub positive: Option<Key>,
    /// Magnitudes below this read as zero.
    pub dead_zone: f32,
    pub sensitivity: f32,
}

impl Default for InputAxis {
    fn default() -> Self {
        Self {
            name: String::new(),
            negative: None,
            positive: None,
            dead_zone: 0.1,
            sensitivity: 1.0,
        }
    }
}

impl InputAxis {
    pub fn set_keys(&mut self, negative: Key, positive: Key) -> &mut Self {
        self.negative = Some(negative);
        self.positive = Some(positive);
        self
    }

    fn value(&self, latch: &InputLatch) -> f32 {
        let mut value = 0.0;
        if self.positive.is_some_and(|k| latch.is_down(k)) {
            value += 1.0;
        }
        if self.negative.is_some_and(|k| latch.is_down(k)) {
            value -= 1.0;
        }

        if f32::abs(value) < self.dead_zone {
            value = 0.0;
        }

        (value * self.sensitivity).clamp(-1.0, 1.0)
    }
}

type ActionCallback = Box<dyn FnMut()>;

/// Named actions and axes layered over an [`InputLatch`].
///
/// Queries take the latch explicitly, so one map can serve any window.
#[derive(Default)]
pub struct InputMap {
    actions: HashMap<String, InputAction>,
    axes: HashMap<String, InputAxis>,

    pressed_callbacks: HashMap<String, Vec<ActionCallback>>,
    released_callbacks: HashMap<String, Vec<ActionCallback>>,

    /// Held state seen by the last `update`, for callback edges.
    prev_held: HashMap<String, bool>,
}

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    // ── actions ───────────────────────────────────────────────────────────

    /// Returns the action named `name`, creating it when missing.
    pub fn define_action(&mut self, name: &str) -> &mut InputAction {
        self.actions
            .entry(name.to_string())
            .or_insert_with(|| InputAction {
                name: name.to_string(),
                bindings: Vec::new(),
            })
    }

    pub fn action(&self, name: &str) -> Option<&InputAction> {
        self.actions.get(name)
    }

    pub fn action_mut(&mut self, name: &str) -> Option<&mut InputAction> {
        self.actions.get_mut(name)
    }

    /// Removes the action together with its callbacks.
    pub fn remove_action(&mut self, name: &str) {
        self.actions.remove(name);
        self.pressed_callbacks.remove(name);
        self.released_callbacks.remove(name);
        self.prev_held.remove(name);
    }

    // ── axes ──────────────────────────────────────────────────────────────

    /// Returns the axis named `name`, creating it when missing.
    pub fn define_axis(&mut self, name: &str) -> &mut InputAxis {
        self.axes.entry(name.to_string()).or_insert_with(|| InputAxis {
            name: name.to_string(),
            ..InputAxis::default()
        })
    }

    pub fn axis(&self, name: &str) -> Option<&InputAxis> {
        self.axes.get(name)
    }

    pub fn axis_mut(&mut self, name: &str) -> Option<&mut InputAxis> {
        self.axes.get_mut(name)
    }

    pub fn remove_axis(&mut self, name: &str) {
        self.axes.remove(name);
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// Any binding currently held. Unknown actions read as not held.
    pub fn is_action_held(&self, latch: &InputLatch, name: &str) -> bool {
        self.any_binding(name, |b| b.held(latch))
    }

    /// Any binding went down this tick.
    pub fn is_action_pressed(&self, latch: &InputLatch, name: &str) -> bool {
        self.any_binding(name, |b| b.pressed(latch))
    }

    /// Any binding went up this tick.
    pub fn is_action_released(&self, latch: &InputLatch, name: &str) -> bool {
        self.any_binding(name, |b| b.released(latch))
    }

    /// Axis value in `[-1, 1]`; unknown axes read as zero.
    pub fn axis_value(&self, latch: &InputLatch, name: &str) -> f32 {
        self.axes.get(name).map_or(0.0, |a| a.value(latch))
    }

    /// Movement vector from the `move_x` / `move_y` axes.
    pub fn movement(&self, latch: &InputLatch) -> Vec2 {
        self.movement_from(latch, "move_x", "move_y")
    }

    /// Movement vector from two axes, normalized when longer than one (diagonals).
    pub fn movement_from(&self, latch: &InputLatch, x_axis: &str, y_axis: &str) -> Vec2 {
        let v = Vec2::new(self.axis_value(latch, x_axis), self.axis_value(latch, y_axis));
        if v.length_squared() > 1.0 {
            v / v.length()
        } else {
            v
        }
    }

    fn any_binding(&self, name: &str, pred: impl Fn(Binding) -> bool) -> bool {
        self.actions
            .get(name)
            .is_some_and(|a| a.bindings.iter().copied().any(pred))
    }

    // ── presets ───────────────────────────────────────────────────────────

    /// `move_x` on A/D and `move_y` on W/S (+Y down).
    pub fn add_wasd_movement(&mut self) {
        self.define_axis("move_x").set_keys(Key::A, Key::D);
        self.define_axis("move_y").set_keys(Key::W, Key::S);
    }

    /// Arrow-key movement axes; existing axes are left untouched.
    pub fn add_arrow_movement(&mut self) {
        if !self.axes.contains_key("move_x") {
            self.define_axis("move_x").set_keys(Key::Left, Key::Right);
        }
        if !self.axes.contains_key("move_y") {
            self.define_axis("move_y").set_keys(Key::Up, Key::Down);
        }
    }

    /// WASD movement plus `confirm` (Enter/Space) and `cancel` (Escape).
    pub fn add_standard_movement(&mut self) {
        self.add_wasd_movement();
        self.define_action("confirm").add_key(Key::Enter).add_key(Key::Space);
        self.define_action("cancel").add_key(Key::Escape);
    }

    // ── callbacks ─────────────────────────────────────────────────────────

    pub fn on_action_pressed(&mut self, name: &str, callback: impl FnMut() + 'static) {
        self.pressed_callbacks
            .entry(name.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    pub fn on_action_released(&mut self, name: &str, callback: impl FnMut() + 'static) {
        self.released_callbacks
            .entry(name.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Fires callbacks for actions whose held state changed since the last call.
    ///
    /// Call once per update tick.
    pub fn update(&mut self, latch: &InputLatch) {
        for (name, action) in &self.actions {
            let held = action.bindings.iter().any(|b| b.held(latch));
            let was_held = self.prev_held.insert(name.clone(), held).unwrap_or(false);

            let callbacks = match (was_held, held) {
                (false, true) => self.pressed_callbacks.get_mut(name),
                (true, false) => self.released_callbacks.get_mut(name),
                _ => None,
            };

            for cb in callbacks.into_iter().flatten() {
                cb();
            }
        }
    }
}
