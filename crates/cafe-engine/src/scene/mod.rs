//! Scene stack.
//!
//! Game code runs one [`SceneManager`] from its loop callbacks:
//! - `update(ctx)` from the update callback ticks the top scene
//! - `render(ctx, renderer)` from the render callback draws every scene, bottom to top
//! - `process_pending()` at the end of the render callback applies the
//!   transition requested during the frame
//!
//! Transitions never happen in the middle of a tick or a draw.

mod manager;

use std::fmt;

use anyhow::Result;

use crate::core::{FrameCtx, TickCtx};
use crate::entity::EntityManager;
use crate::render::Renderer;

pub use manager::SceneManager;

/// One screen of the game: a level, a menu, a pause overlay.
pub trait Scene {
    fn name(&self) -> &str;

    /// Became the top of the stack by push or replace.
    fn on_enter(&mut self) {}

    /// Left the stack by pop, replace or clear.
    fn on_exit(&mut self) {}

    /// Another scene was pushed on top.
    fn on_pause(&mut self) {}

    /// The scene above was popped.
    fn on_resume(&mut self) {}

    /// One fixed tick while on top. The returned command is applied at the
    /// next [`SceneManager::process_pending`].
    fn update(&mut self, ctx: &mut TickCtx<'_>) -> Result<SceneCommand>;

    /// Draws the scene. Scenes below the top draw first.
    fn render(&mut self, _ctx: &mut FrameCtx<'_>, _renderer: &mut dyn Renderer) -> Result<()> {
        Ok(())
    }

    /// Entities whose queued destroys are flushed after each update.
    fn entities(&mut self) -> Option<&mut EntityManager> {
        None
    }
}

/// Stack change requested by a scene or by game code.
#[derive(Default)]
pub enum SceneCommand {
    #[default]
    None,
    Push(Box<dyn Scene>),
    Pop,
    Replace(Box<dyn Scene>),
    Clear,
}

impl SceneCommand {
    pub fn push(scene: impl Scene + 'static) -> Self {
        SceneCommand::Push(Box::new(scene))
    }

    pub fn replace(scene: impl Scene + 'static) -> Self {
        SceneCommand::Replace(Box::new(scene))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SceneCommand::None)
    }
}

impl fmt::Debug for SceneCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneCommand::None => f.write_str("None"),
            SceneCommand::Push(s) => write!(f, "Push({})", s.name()),
            SceneCommand::Pop => f.write_str("Pop"),
            SceneCommand::Replace(s) => write!(f, "Replace({})", s.name()),
            SceneCommand::Clear => f.write_str("Clear"),
        }
    }
}
