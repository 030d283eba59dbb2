use anyhow::{Context, Result};

use crate::core::{FrameCtx, TickCtx};
use crate::render::Renderer;

use super::{Scene, SceneCommand};

type TransitionFn = Box<dyn FnMut(Option<&str>, &str)>;

/// Stack of scenes with deferred transitions.
///
/// Only one transition can be pending; a later request replaces an earlier
/// one from the same frame.
#[derive(Default)]
pub struct SceneManager {
    stack: Vec<Box<dyn Scene>>,
    pending: SceneCommand,
    on_transition: Option<TransitionFn>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with `(from, to)` names whenever a scene becomes the top.
    ///
    /// Not called when a pop or clear leaves the stack empty.
    pub fn set_transition_callback(&mut self, f: impl FnMut(Option<&str>, &str) + 'static) {
        self.on_transition = Some(Box::new(f));
    }

    pub fn push(&mut self, scene: impl Scene + 'static) {
        self.request(SceneCommand::push(scene));
    }

    pub fn replace(&mut self, scene: impl Scene + 'static) {
        self.request(SceneCommand::replace(scene));
    }

    pub fn pop(&mut self) {
        self.request(SceneCommand::Pop);
    }

    pub fn clear(&mut self) {
        self.request(SceneCommand::Clear);
    }

    /// Queues `command` for the next [`process_pending`](Self::process_pending).
    pub fn request(&mut self, command: SceneCommand) {
        if command.is_none() {
            return;
        }
        if !self.pending.is_none() {
            log::debug!("scene request {command:?} replaces pending {:?}", self.pending);
        }
        self.pending = command;
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_none()
    }

    pub fn current(&self) -> Option<&dyn Scene> {
        self.stack.last().map(|s| &**s)
    }

    pub fn current_mut(&mut self) -> Option<&mut (dyn Scene + 'static)> {
        self.stack.last_mut().map(|s| &mut **s)
    }

    /// Scene at `index`, counted from the bottom of the stack.
    pub fn scene_at(&self, index: usize) -> Option<&dyn Scene> {
        self.stack.get(index).map(|s| &**s)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Ticks the top scene, queues its command and flushes its entity destroys.
    pub fn update(&mut self, ctx: &mut TickCtx<'_>) -> Result<()> {
        let Some(scene) = self.stack.last_mut() else {
            return Ok(());
        };

        let command = scene
            .update(ctx)
            .with_context(|| format!("scene \"{}\" update failed", scene.name()))?;
        if let Some(entities) = scene.entities() {
            entities.process_pending_destroys();
        }

        self.request(command);
        Ok(())
    }

    /// Draws every scene from the bottom of the stack up.
    pub fn render(&mut self, ctx: &mut FrameCtx<'_>, renderer: &mut dyn Renderer) -> Result<()> {
        for scene in self.stack.iter_mut() {
            scene
                .render(ctx, renderer)
                .with_context(|| format!("scene \"{}\" render failed", scene.name()))?;
        }
        Ok(())
    }

    /// Applies the pending transition, if any. Returns whether the stack changed.
    pub fn process_pending(&mut self) -> bool {
        match std::mem::take(&mut self.pending) {
            SceneCommand::None => false,
            SceneCommand::Push(scene) => {
                self.apply_push(scene);
                true
            }
            SceneCommand::Replace(scene) => {
                self.apply_replace(scene);
                true
            }
            SceneCommand::Pop => self.apply_pop(),
            SceneCommand::Clear => {
                let changed = !self.stack.is_empty();
                while let Some(mut scene) = self.stack.pop() {
                    scene.on_exit();
                }
                changed
            }
        }
    }

    fn apply_push(&mut self, mut scene: Box<dyn Scene>) {
        let from = match self.stack.last_mut() {
            Some(top) => {
                top.on_pause();
                Some(top.name().to_string())
            }
            None => None,
        };

        self.notify(from.as_deref(), scene.name());
        scene.on_enter();
        log::debug!("pushed scene \"{}\" ({} on stack)", scene.name(), self.stack.len() + 1);
        self.stack.push(scene);
    }

    fn apply_replace(&mut self, mut scene: Box<dyn Scene>) {
        let from = self.stack.pop().map(|mut old| {
            old.on_exit();
            old.name().to_string()
        });

        self.notify(from.as_deref(), scene.name());
        scene.on_enter();
        self.stack.push(scene);
    }

    fn apply_pop(&mut self) -> bool {
        let Some(mut old) = self.stack.pop() else {
            log::debug!("pop on an empty scene stack ignored");
            return false;
        };
        old.on_exit();

        if let Some(top) = self.stack.last_mut() {
            top.on_resume();
            if let Some(notify) = self.on_transition.as_mut() {
                notify(Some(old.name()), top.name());
            }
        }
        true
    }

    fn notify(&mut self, from: Option<&str>, to: &str) {
        if let Some(notify) = self.on_transition.as_mut() {
            notify(from, to);
        }
    }
}
