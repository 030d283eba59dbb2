//! Isometric 2:1 tile math.
//!
//! Tile `(x, y)` grows right-down along x and left-down along y:
//! - `screen.x = (x - y) * tile_width / 2 - camera.x`
//! - `screen.y = (x + y) * tile_height / 2 - camera.y`
//!
//! Tiles with a larger `x + y` sit in front and draw later.

mod projection;
mod tilemap;

pub use projection::IsoProjection;
pub use tilemap::{Tile, TileMap, VisibleTile};
