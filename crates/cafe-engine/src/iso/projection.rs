use crate::coords::Vec2;

/// Tile size plus camera scroll; converts between tile and screen space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IsoProjection {
    tile_size: Vec2,
    camera: Vec2,
}

impl Default for IsoProjection {
    /// 64x32 tiles, camera at the origin.
    fn default() -> Self {
        Self::new(64.0, 32.0)
    }
}

impl IsoProjection {
    /// Non-positive or non-finite dimensions fall back to the 64x32 default.
    pub fn new(tile_width: f32, tile_height: f32) -> Self {
        let valid = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            tile_size: Vec2::new(valid(tile_width, 64.0), valid(tile_height, 32.0)),
            camera: Vec2::zero(),
        }
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    /// World scroll subtracted from every screen position.
    pub fn set_camera(&mut self, camera: Vec2) {
        self.camera = camera;
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    /// Screen position of a tile point; integer coordinates give the tile's top corner.
    pub fn tile_to_screen(&self, tile: Vec2) -> Vec2 {
        let half = self.tile_size / 2.0;
        Vec2::new((tile.x - tile.y) * half.x, (tile.x + tile.y) * half.y) - self.camera
    }

    pub fn tile_index_to_screen(&self, x: i32, y: i32) -> Vec2 {
        self.tile_to_screen(Vec2::new(x as f32, y as f32))
    }

    /// Inverse of [`tile_to_screen`](Self::tile_to_screen); the fraction is the
    /// position inside the tile.
    pub fn screen_to_tile(&self, screen: Vec2) -> Vec2 {
        let world = screen + self.camera;
        let half = self.tile_size / 2.0;
        let (u, v) = (world.x / half.x, world.y / half.y);
        Vec2::new((v + u) / 2.0, (v - u) / 2.0)
    }

    /// Tile under a screen point.
    pub fn tile_at(&self, screen: Vec2) -> (i32, i32) {
        let t = self.screen_to_tile(screen);
        (t.x.floor() as i32, t.y.floor() as i32)
    }

    /// Draw order key; larger draws later.
    #[inline]
    pub fn depth(x: i32, y: i32) -> i32 {
        x + y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn unit_steps_move_half_a_tile() {
        let p = IsoProjection::default();
        assert_eq!(p.tile_index_to_screen(0, 0), Vec2::zero());
        assert_eq!(p.tile_index_to_screen(1, 0), Vec2::new(32.0, 16.0));
        assert_eq!(p.tile_index_to_screen(0, 1), Vec2::new(-32.0, 16.0));
        assert_eq!(p.tile_index_to_screen(2, 2), Vec2::new(0.0, 64.0));
    }

    #[test]
    fn screen_to_tile_inverts_tile_to_screen() {
        let mut p = IsoProjection::new(48.0, 24.0);
        p.set_camera(Vec2::new(-100.0, 37.5));

        for tile in [Vec2::new(0.0, 0.0), Vec2::new(3.25, -1.5), Vec2::new(10.0, 7.75)] {
            let back = p.screen_to_tile(p.tile_to_screen(tile));
            assert!(close(back, tile), "{tile:?} came back as {back:?}");
        }
    }

    #[test]
    fn camera_scrolls_the_screen() {
        let mut p = IsoProjection::default();
        p.set_camera(Vec2::new(10.0, 5.0));
        assert_eq!(p.tile_index_to_screen(0, 0), Vec2::new(-10.0, -5.0));
        assert_eq!(p.tile_at(Vec2::new(-10.0, -5.0 + 8.0)), (0, 0));
    }

    #[test]
    fn tile_at_floors_toward_negative_infinity() {
        let p = IsoProjection::default();
        // Just above the top corner of tile (0, 0) lies outside the map.
        assert_eq!(p.tile_at(Vec2::new(0.0, -1.0)), (-1, -1));
        assert_eq!(p.tile_at(Vec2::new(0.0, 17.0)), (0, 0));
        assert_eq!(p.tile_at(Vec2::new(33.0, 17.0)), (1, 0));
    }

    #[test]
    fn invalid_tile_size_falls_back() {
        assert_eq!(IsoProjection::new(0.0, f32::NAN).tile_size(), Vec2::new(64.0, 32.0));
    }
}
