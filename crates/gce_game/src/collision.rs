//! Tile grid and box-vs-tile resolution.
//!
//! The grid is the gameplay truth for static geometry: a dense array of tile
//! kinds, one per cell, with `None` for empty cells. Resolution pushes a body
//! out of every solid cell it overlaps, one cell at a time in row-major order,
//! along whichever open side has the smallest penetration. Sides facing another
//! solid cell are skipped, so runs of floor or wall tiles act as one surface. Later cells see the
//! already-corrected position, so a body wedged into a corner is cleared in a
//! single pass.

use crate::body::Body;
use crate::level::LevelFile;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Dirt,
    Grass,
    Stone,
    Brick,
    Wood,
    Gold,
    Lava,
    Water,
    Ice,
}

impl TileKind {
    /// Maps the level editor's codes 1-9; everything else is empty.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Dirt),
            2 => Some(Self::Grass),
            3 => Some(Self::Stone),
            4 => Some(Self::Brick),
            5 => Some(Self::Wood),
            6 => Some(Self::Gold),
            7 => Some(Self::Lava),
            8 => Some(Self::Water),
            9 => Some(Self::Ice),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dirt => "dirt",
            Self::Grass => "grass",
            Self::Stone => "stone",
            Self::Brick => "brick",
            Self::Wood => "wood",
            Self::Gold => "gold",
            Self::Lava => "lava",
            Self::Water => "water",
            Self::Ice => "ice",
        }
    }

    /// Flat RGB colour for renderers without tile art.
    pub fn fallback_color(self) -> [u8; 3] {
        match self {
            Self::Dirt => [0x8b, 0x45, 0x13],
            Self::Grass => [0x22, 0x8b, 0x22],
            Self::Stone => [0x80, 0x80, 0x80],
            Self::Brick => [0xb2, 0x22, 0x22],
            Self::Wood => [0xde, 0xb8, 0x87],
            Self::Gold => [0xff, 0xd7, 0x00],
            Self::Lava => [0xff, 0x45, 0x00],
            Self::Water => [0x1e, 0x90, 0xff],
            Self::Ice => [0xad, 0xd8, 0xe6],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileHit {
    pub tile: TileKind,
    pub cell: (i32, i32),
}

/// Which side of the body was blocked during one resolution pass. A side
/// holds the last tile that pushed on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub down: Option<TileHit>,
    pub up: Option<TileHit>,
    pub left: Option<TileHit>,
    pub right: Option<TileHit>,
}

impl CollisionReport {
    pub fn any(&self) -> bool {
        self.down.is_some() || self.up.is_some() || self.left.is_some() || self.right.is_some()
    }

    pub fn blocked_horizontally(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }
}

/// Direction a body leaves an overlapped cell.
#[derive(Debug, Clone, Copy)]
enum Exit {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct TileGrid {
    width: i32,
    height: i32,
    block_size: f32,
    tiles: Vec<Option<TileKind>>,
}

impl TileGrid {
    pub fn new(width: i32, height: i32, block_size: f32) -> Self {
        let cells = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            width: width.max(0),
            height: height.max(0),
            block_size,
            tiles: vec![None; cells],
        }
    }

    pub fn from_level(level: &LevelFile) -> Self {
        let mut grid = Self::new(
            level.width as i32,
            level.height as i32,
            level.block_size_px(),
        );
        let mut skipped = 0usize;
        for y in 0..level.height as usize {
            for x in 0..level.width as usize {
                let code = level.tile_code(x, y);
                match TileKind::from_code(code) {
                    Some(kind) => grid.set(x as i32, y as i32, Some(kind)),
                    None if code != 0 => skipped += 1,
                    None => {}
                }
            }
        }
        if skipped > 0 {
            log::warn!(
                "Level '{}': {skipped} cells with unknown tile codes treated as empty",
                level.name
            );
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn block_size(&self) -> f32 {
        self.block_size
    }

    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.block_size,
            self.height as f32 * self.block_size,
        )
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<TileKind> {
        self.index(x, y).and_then(|i| self.tiles[i])
    }

    pub fn set(&mut self, x: i32, y: i32, tile: Option<TileKind>) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    fn world_to_cell(&self, v: f32) -> i32 {
        (v / self.block_size).floor() as i32
    }

    pub fn resolve(&self, body: &mut Body) -> CollisionReport {
        let mut report = CollisionReport::default();
        if self.block_size <= 0.0 {
            return report;
        }

        let bs = self.block_size;
        let x0 = self.world_to_cell(body.left());
        let x1 = self.world_to_cell(body.right());
        let y0 = self.world_to_cell(body.top());
        let y1 = self.world_to_cell(body.bottom());

        for gy in y0..=y1 {
            for gx in x0..=x1 {
                let Some(tile) = self.tile_at(gx, gy) else {
                    continue;
                };
                let cell_min = Vec2::new(gx as f32 * bs, gy as f32 * bs);
                if !crate::body::aabb_overlap(body.pos, body.size, cell_min, Vec2::splat(bs)) {
                    continue;
                }

                let into_top = body.bottom() - cell_min.y;
                let into_bottom = cell_min.y + bs - body.top();
                let into_left = body.right() - cell_min.x;
                let into_right = cell_min.x + bs - body.left();
                let exits = [
                    (Exit::Up, into_top, (0, -1)),
                    (Exit::Down, into_bottom, (0, 1)),
                    (Exit::Left, into_left, (-1, 0)),
                    (Exit::Right, into_right, (1, 0)),
                ];
                // An exit into a solid neighbour is an internal seam, not a face.
                let shallowest = |open_only: bool| {
                    exits
                        .iter()
                        .filter(|(_, _, (dx, dy))| {
                            !open_only || self.tile_at(gx + dx, gy + dy).is_none()
                        })
                        .min_by(|a, b| a.1.total_cmp(&b.1))
                        .map(|(exit, _, _)| *exit)
                };
                let Some(exit) = shallowest(true).or_else(|| shallowest(false)) else {
                    continue;
                };
                let hit = Some(TileHit {
                    tile,
                    cell: (gx, gy),
                });

                match exit {
                    Exit::Up => {
                        body.pos.y = cell_min.y - body.size.y;
                        body.vel.y = 0.0;
                        body.on_ground = true;
                        report.down = hit;
                    }
                    Exit::Down => {
                        body.pos.y = cell_min.y + bs;
                        body.vel.y = 0.0;
                        report.up = hit;
                    }
                    Exit::Left => {
                        body.pos.x = cell_min.x - body.size.x;
                        body.vel.x = 0.0;
                        report.right = hit;
                    }
                    Exit::Right => {
                        body.pos.x = cell_min.x + bs;
                        body.vel.x = 0.0;
                        report.left = hit;
                    }
                }
            }
        }

        report
    }

    /// Solid cells intersecting the rectangle `[min, min + size)`.
    pub fn visible_tiles(
        &self,
        min: Vec2,
        size: Vec2,
    ) -> impl Iterator<Item = (i32, i32, TileKind)> + '_ {
        let x0 = self.world_to_cell(min.x).max(0);
        let y0 = self.world_to_cell(min.y).max(0);
        let x1 = self.world_to_cell(min.x + size.x).min(self.width - 1);
        let y1 = self.world_to_cell(min.y + size.y).min(self.height - 1);
        (y0..=y1).flat_map(move |y| {
            (x0..=x1).filter_map(move |x| self.tile_at(x, y).map(|tile| (x, y, tile)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::parse_level;

    fn grid_with(cells: &[(i32, i32)]) -> TileGrid {
        let mut grid = TileGrid::new(10, 10, 32.0);
        for &(x, y) in cells {
            grid.set(x, y, Some(TileKind::Stone));
        }
        grid
    }

    #[test]
    fn falling_body_lands_on_tile_top() {
        let grid = grid_with(&[(2, 5)]);
        let mut body = Body::new(Vec2::new(64.0, 120.0), Vec2::new(32.0, 48.0));
        body.vel.y = 300.0;

        let report = grid.resolve(&mut body);

        assert_eq!(body.bottom(), 160.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(body.on_ground);
        assert_eq!(
            report.down,
            Some(TileHit {
                tile: TileKind::Stone,
                cell: (2, 5)
            })
        );
    }

    #[test]
    fn rising_body_bumps_head() {
        let grid = grid_with(&[(2, 2)]);
        let mut body = Body::new(Vec2::new(64.0, 90.0), Vec2::new(32.0, 48.0));
        body.vel.y = -400.0;

        let report = grid.resolve(&mut body);

        assert_eq!(body.top(), 96.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(report.up.is_some());
        assert!(!body.on_ground);
    }

    #[test]
    fn wall_on_the_right_pushes_body_left() {
        let grid = grid_with(&[(3, 2), (3, 3)]);
        let mut body = Body::new(Vec2::new(70.0, 70.0), Vec2::new(32.0, 32.0));
        body.vel.x = 200.0;

        let report = grid.resolve(&mut body);

        assert_eq!(body.right(), 96.0);
        assert_eq!(body.vel.x, 0.0);
        assert!(report.right.is_some());
        assert!(report.left.is_none());
        assert!(report.blocked_horizontally());
    }

    #[test]
    fn wall_on_the_left_pushes_body_right() {
        let grid = grid_with(&[(1, 2), (1, 3)]);
        let mut body = Body::new(Vec2::new(60.0, 70.0), Vec2::new(32.0, 32.0));
        body.vel.x = -200.0;

        let report = grid.resolve(&mut body);

        assert_eq!(body.left(), 64.0);
        assert!(report.left.is_some());
    }

    #[test]
    fn floor_seam_resolves_upward() {
        let grid = grid_with(&(0..10).map(|x| (x, 9)).collect::<Vec<_>>());
        // Left edge 0.3 px into cell 1, sunk 0.5 px into the floor.
        let mut body = Body::new(Vec2::new(63.7, 240.5), Vec2::new(32.0, 48.0));
        body.vel = Vec2::new(150.0, 30.0);

        let report = grid.resolve(&mut body);

        assert_eq!(body.pos.x, 63.7);
        assert_eq!(body.bottom(), 288.0);
        assert_eq!(body.vel.x, 150.0);
        assert!(body.on_ground);
        assert!(report.down.is_some());
        assert!(!report.blocked_horizontally());
    }

    #[test]
    fn walking_across_a_flat_floor_never_hits_a_wall() {
        let grid = grid_with(&(0..10).map(|x| (x, 9)).collect::<Vec<_>>());
        let mut body = Body::new(Vec2::new(4.3, 240.0), Vec2::new(32.0, 48.0));
        let dt = 1.0 / 60.0;

        for step in 0..100 {
            body.vel.x = 150.0;
            body.vel.y += 1800.0 * dt;
            body.pos += body.vel * dt;

            let report = grid.resolve(&mut body);

            assert!(!report.blocked_horizontally(), "wall hit at step {step}");
            assert_eq!(body.vel.x, 150.0);
            assert_eq!(body.bottom(), 288.0);
        }
        assert!(body.pos.x > 200.0);
    }

    #[test]
    fn inner_corner_still_blocks_both_ways() {
        // Floor on row 9 meeting a wall in column 6.
        let mut cells: Vec<(i32, i32)> = (0..10).map(|x| (x, 9)).collect();
        cells.extend([(6, 7), (6, 8)]);
        let grid = grid_with(&cells);
        let mut body = Body::new(Vec2::new(162.0, 240.5), Vec2::new(32.0, 48.0));
        body.vel = Vec2::new(150.0, 30.0);

        let report = grid.resolve(&mut body);

        assert_eq!(body.right(), 192.0);
        assert_eq!(body.bottom(), 288.0);
        assert!(report.right.is_some());
        assert!(report.down.is_some());
    }

    #[test]
    fn out_of_range_is_empty() {
        let grid = grid_with(&[]);
        assert_eq!(grid.tile_at(-1, 0), None);
        assert_eq!(grid.tile_at(0, 10), None);

        let mut body = Body::new(Vec2::new(-100.0, -100.0), Vec2::splat(32.0));
        assert!(!grid.resolve(&mut body).any());
    }

    #[test]
    fn touching_a_tile_is_not_a_collision() {
        let grid = grid_with(&[(2, 5)]);
        let mut body = Body::new(Vec2::new(64.0, 112.0), Vec2::new(32.0, 48.0));
        let report = grid.resolve(&mut body);
        assert!(!report.any());
        assert!(!body.on_ground);
    }

    #[test]
    fn from_level_maps_codes_and_skips_unknown() {
        let level = parse_level(r#"{"width": 3, "height": 1, "blocks": [[2, 12, 9]]}"#)
            .expect("level parses");
        let grid = TileGrid::from_level(&level);
        assert_eq!(grid.tile_at(0, 0), Some(TileKind::Grass));
        assert_eq!(grid.tile_at(1, 0), None);
        assert_eq!(grid.tile_at(2, 0), Some(TileKind::Ice));
    }

    #[test]
    fn visible_tiles_clips_to_rect() {
        let grid = grid_with(&[(0, 0), (4, 4), (9, 9)]);
        let visible: Vec<_> = grid
            .visible_tiles(Vec2::new(0.0, 0.0), Vec2::new(160.0, 160.0))
            .collect();
        assert_eq!(
            visible,
            vec![(0, 0, TileKind::Stone), (4, 4, TileKind::Stone)]
        );
    }
}
