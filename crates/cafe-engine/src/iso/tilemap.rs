use crate::coords::{Rect, Vec2};

use super::IsoProjection;

/// Extra tiles scanned around the viewport's tile bounds.
const SCAN_MARGIN: i32 = 2;

/// Depth added per height level, so raised tiles draw above the ground layer.
const HEIGHT_DEPTH: i32 = 1000;

/// One map cell.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Tile {
    /// Tileset index; `0` is an empty cell.
    pub tile_id: u32,
    /// Stacking level.
    pub height: i32,
    /// Game-defined bits (walkable, ...).
    pub flags: u8,
}

impl Tile {
    pub const EMPTY: Tile = Tile {
        tile_id: 0,
        height: 0,
        flags: 0,
    };

    pub fn new(tile_id: u32) -> Self {
        Self {
            tile_id,
            ..Self::EMPTY
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tile_id == 0
    }
}

/// A non-empty tile inside the viewport, in draw order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisibleTile {
    pub x: i32,
    pub y: i32,
    pub tile: Tile,
    /// Top corner on screen, before height offsets.
    pub screen: Vec2,
    pub depth: i32,
}

/// Row-major grid of tiles.
#[derive(Debug, Clone, Default)]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Map of empty tiles. Negative dimensions count as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let mut map = Self::default();
        map.resize(width, height);
        map
    }

    /// Resizes and clears the map.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.tiles.clear();
        self.tiles
            .resize(self.width as usize * self.height as usize, Tile::EMPTY);
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).map(|i| &mut self.tiles[i])
    }

    /// Writes a tile; returns `false` out of bounds.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        match self.get_mut(x, y) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Non-empty tiles that can touch `viewport`, sorted back to front.
    ///
    /// Tiles are scanned over the tile-space bounding box of the viewport's
    /// corners, then kept when their top corner lies within the viewport grown
    /// by one tile width sideways and two tile heights vertically. Equal
    /// depths keep row-major order.
    pub fn visible_tiles(&self, projection: &IsoProjection, viewport: Rect) -> Vec<VisibleTile> {
        let max = viewport.max();
        let corners = [
            projection.screen_to_tile(viewport.origin),
            projection.screen_to_tile(Vec2::new(max.x, viewport.origin.y)),
            projection.screen_to_tile(Vec2::new(viewport.origin.x, max.y)),
            projection.screen_to_tile(max),
        ];

        let mut lo = Vec2::new(f32::INFINITY, f32::INFINITY);
        let mut hi = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for c in corners {
            lo = Vec2::new(lo.x.min(c.x), lo.y.min(c.y));
            hi = Vec2::new(hi.x.max(c.x), hi.y.max(c.y));
        }

        let min_x = (lo.x.floor() as i32).saturating_sub(SCAN_MARGIN).max(0);
        let max_x = (hi.x.ceil() as i32).saturating_add(SCAN_MARGIN).min(self.width - 1);
        let min_y = (lo.y.floor() as i32).saturating_sub(SCAN_MARGIN).max(0);
        let max_y = (hi.y.ceil() as i32).saturating_add(SCAN_MARGIN).min(self.height - 1);

        if min_x > max_x || min_y > max_y {
            return Vec::new();
        }

        let tile_size = projection.tile_size();
        let bounds = Rect::new(
            viewport.origin.x - tile_size.x,
            viewport.origin.y - tile_size.y * 2.0,
            viewport.size.x + tile_size.x * 2.0,
            viewport.size.y + tile_size.y * 4.0,
        );

        let mut visible = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let Some(tile) = self.get(x, y).filter(|t| !t.is_empty()) else {
                    continue;
                };

                let screen = projection.tile_index_to_screen(x, y);
                let max = bounds.max();
                if screen.x < bounds.origin.x
                    || screen.x > max.x
                    || screen.y < bounds.origin.y
                    || screen.y > max.y
                {
                    continue;
                }

                visible.push(VisibleTile {
                    x,
                    y,
                    tile: *tile,
                    screen,
                    depth: IsoProjection::depth(x, y) + tile.height * HEIGHT_DEPTH,
                });
            }
        }

        visible.sort_by_key(|v| v.depth);
        visible
    }

    /// Calls `f` for each of [`visible_tiles`](Self::visible_tiles) in draw order.
    pub fn for_each_visible(
        &self,
        projection: &IsoProjection,
        viewport: Rect,
        mut f: impl FnMut(&VisibleTile),
    ) {
        for tile in self.visible_tiles(projection, viewport) {
            f(&tile);
        }
    }
}
