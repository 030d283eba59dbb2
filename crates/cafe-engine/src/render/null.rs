use anyhow::{ensure, Result};

use crate::coords::Vec2;
use crate::paint::Color;

use super::Renderer;

/// Renderer that draws nothing and counts what it was asked to do.
#[derive(Debug, Default)]
pub struct NullRenderer {
    in_frame: bool,
    clear_color: Color,

    frames: u64,
    clears: u64,
    quads_this_frame: usize,
    quads_last_frame: usize,
}

impl NullRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed `begin_frame`/`end_frame` pairs.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clears(&self) -> u64 {
        self.clears
    }

    /// Quads submitted in the most recently finished frame.
    pub fn quads_last_frame(&self) -> usize {
        self.quads_last_frame
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn is_in_frame(&self) -> bool {
        self.in_frame
    }
}

impl Renderer for NullRenderer {
    fn backend_name(&self) -> &'static str {
        "null"
    }

    fn begin_frame(&mut self) -> Result<()> {
        ensure!(!self.in_frame, "begin_frame called twice without end_frame");
        self.in_frame = true;
        self.quads_this_frame = 0;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        ensure!(self.in_frame, "end_frame called without begin_frame");
        self.in_frame = false;
        self.frames += 1;
        self.quads_last_frame = self.quads_this_frame;
        Ok(())
    }

    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn clear(&mut self) {
        if self.in_frame {
            self.clears += 1;
        }
    }

    fn draw_quad(&mut self, _position: Vec2, size: Vec2, _color: Color) {
        if !self.in_frame {
            log::warn!("draw_quad outside of a frame; ignored");
            return;
        }
        if size.x > 0.0 && size.y > 0.0 {
            self.quads_this_frame += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_quads_per_frame() {
        let mut r = NullRenderer::new();

        r.begin_frame().unwrap();
        r.clear();
        r.draw_quad(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), Color::RED);
        r.draw_quad(Vec2::new(5.0, 5.0), Vec2::new(0.0, 10.0), Color::RED);
        r.end_frame().unwrap();

        assert_eq!(r.frames(), 1);
        assert_eq!(r.clears(), 1);
        assert_eq!(r.quads_last_frame(), 1, "empty quad is skipped");
    }

    #[test]
    fn begin_end_must_pair() {
        let mut r = NullRenderer::new();
        assert!(r.end_frame().is_err());

        r.begin_frame().unwrap();
        assert!(r.begin_frame().is_err());
        r.end_frame().unwrap();

        // Outside a frame nothing is recorded.
        r.draw_quad(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Color::WHITE);
        r.clear();
        assert_eq!(r.clears(), 0);
        assert_eq!(r.quads_last_frame(), 0);
    }
}
