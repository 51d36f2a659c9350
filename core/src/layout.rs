use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Edge;
use crate::tile::{EdgeProfile, Neighbors, TileId};

pub const SNAP_DISTANCE_DEFAULT: f32 = 20.0;
pub const TILE_SIZE_DEFAULT: f32 = 100.0;
pub const GRID_SEED_DEFAULT: u32 = 0x5EED_2520;
pub const TAB_DEPTH_RATIO: f32 = 0.2;
pub const WORKSPACE_SCALE: f32 = 2.0;
pub const WORKSPACE_MARGIN_RATIO: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleRules {
    pub snap_distance: f32,
    /// Shared body cell of tab/blank art. Without it the body is derived per tile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<(f32, f32)>,
}

impl Default for PuzzleRules {
    fn default() -> Self {
        Self {
            snap_distance: SNAP_DISTANCE_DEFAULT,
            cell: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    pub id: TileId,
    pub pos: (f32, f32),
    pub size: (f32, f32),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<EdgeProfile>,
    #[serde(default)]
    pub neighbors: Neighbors,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PuzzleLayout {
    #[serde(default)]
    pub rules: PuzzleRules,
    pub tiles: Vec<TileSpec>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout has no tiles")]
    Empty,
    #[error("duplicate tile id {0}")]
    DuplicateId(TileId),
    #[error("tile {tile} has invalid size {width}x{height}")]
    InvalidSize { tile: TileId, width: f32, height: f32 },
    #[error("tile {tile} has non-finite position ({x}, {y})")]
    InvalidPosition { tile: TileId, x: f32, y: f32 },
    #[error("tile {0} has a non-finite edge profile")]
    InvalidProfile(TileId),
    #[error("snap distance must be a non-negative number, got {0}")]
    InvalidSnapDistance(f32),
    #[error("body cell must be positive, got {width}x{height}")]
    InvalidCell { width: f32, height: f32 },
    #[error("tile {0} names itself as a neighbor")]
    SelfNeighbor(TileId),
    #[error("tile {tile} names unknown {edge} neighbor {neighbor}")]
    UnknownNeighbor {
        tile: TileId,
        edge: Edge,
        neighbor: TileId,
    },
    #[error("tile {tile} expects {neighbor} on its {edge} edge, but {neighbor} does not expect it back")]
    Unmirrored {
        tile: TileId,
        edge: Edge,
        neighbor: TileId,
    },
}

impl PuzzleLayout {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.tiles.is_empty() {
            return Err(LayoutError::Empty);
        }
        let snap = self.rules.snap_distance;
        if !(snap >= 0.0) || !snap.is_finite() {
            return Err(LayoutError::InvalidSnapDistance(snap));
        }
        if let Some((width, height)) = self.rules.cell {
            if !positive(width) || !positive(height) {
                return Err(LayoutError::InvalidCell { width, height });
            }
        }
        let mut by_id: HashMap<TileId, &TileSpec> = HashMap::with_capacity(self.tiles.len());
        for spec in &self.tiles {
            if by_id.insert(spec.id, spec).is_some() {
                return Err(LayoutError::DuplicateId(spec.id));
            }
            let (width, height) = spec.size;
            if !positive(width) || !positive(height) {
                return Err(LayoutError::InvalidSize {
                    tile: spec.id,
                    width,
                    height,
                });
            }
            let (x, y) = spec.pos;
            if !x.is_finite() || !y.is_finite() {
                return Err(LayoutError::InvalidPosition { tile: spec.id, x, y });
            }
            if let Some(profile) = spec.profile {
                if Edge::ALL.iter().any(|&edge| !profile.get(edge).is_finite()) {
                    return Err(LayoutError::InvalidProfile(spec.id));
                }
            }
        }
        for spec in &self.tiles {
            for (edge, neighbor) in spec.neighbors.iter() {
                if neighbor == spec.id {
                    return Err(LayoutError::SelfNeighbor(spec.id));
                }
                let Some(other) = by_id.get(&neighbor) else {
                    return Err(LayoutError::UnknownNeighbor {
                        tile: spec.id,
                        edge,
                        neighbor,
                    });
                };
                if other.neighbors.get(edge.opposite()) != Some(spec.id) {
                    return Err(LayoutError::Unmirrored {
                        tile: spec.id,
                        edge,
                        neighbor,
                    });
                }
            }
        }
        Ok(())
    }
}

fn positive(value: f32) -> bool {
    value > 0.0 && value.is_finite()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub cols: u32,
    pub rows: u32,
    pub tile_size: f32,
    pub seed: u32,
    pub tabs: bool,
    pub snap_distance: f32,
}

impl GridSpec {
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            tile_size: TILE_SIZE_DEFAULT,
            seed: GRID_SEED_DEFAULT,
            tabs: false,
            snap_distance: SNAP_DISTANCE_DEFAULT,
        }
    }

    pub fn workspace(&self) -> (f32, f32) {
        (
            self.cols as f32 * self.tile_size * WORKSPACE_SCALE,
            self.rows as f32 * self.tile_size * WORKSPACE_SCALE,
        )
    }
}

fn splitmix32(value: u32) -> u32 {
    let mut z = value.wrapping_add(0x9E37_79B9);
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

/// Uniform in `[0, 1)` from the top 24 bits of the mixed seed.
fn rand_unit(seed: u32, salt: u32) -> f32 {
    (splitmix32(seed ^ salt) >> 8) as f32 / (1u32 << 24) as f32
}

/// Scatter position for tile `index`, kept inside `margin..=max` on both axes.
fn scatter_pos(seed: u32, index: u32, margin: f32, max: (f32, f32)) -> (f32, f32) {
    let salt = index << 1;
    (
        margin + (max.0 - margin) * rand_unit(seed, salt),
        margin + (max.1 - margin) * rand_unit(seed, salt + 1),
    )
}

/// Builds a `cols x rows` puzzle with row-major ids, scattered over the workspace.
pub fn grid_layout(spec: &GridSpec) -> PuzzleLayout {
    let cols = spec.cols as usize;
    let rows = spec.rows as usize;
    let total = cols * rows;
    let cell = spec.tile_size;
    let depth = cell * TAB_DEPTH_RATIO;

    let mut profiles = vec![EdgeProfile::FLAT; total];
    if spec.tabs {
        for row in 0..rows {
            for col in 0..cols {
                let id = row * cols + col;
                if col + 1 < cols {
                    let sign = tab_sign(spec.seed, 0x7AB0_0000 + id as u32);
                    profiles[id].right = sign * depth;
                    profiles[id + 1].left = -sign * depth;
                }
                if row + 1 < rows {
                    let sign = tab_sign(spec.seed, 0x7AB1_0000 + id as u32);
                    profiles[id].bottom = sign * depth;
                    profiles[id + cols].top = -sign * depth;
                }
            }
        }
    }

    let (workspace_width, workspace_height) = spec.workspace();
    let margin = cell * WORKSPACE_MARGIN_RATIO;
    let mut tiles = Vec::with_capacity(total);
    for row in 0..rows {
        for col in 0..cols {
            let id = row * cols + col;
            let profile = profiles[id];
            let size = (
                cell + profile.tab(Edge::Left) + profile.tab(Edge::Right),
                cell + profile.tab(Edge::Top) + profile.tab(Edge::Bottom),
            );
            let max_x = (workspace_width - size.0 - margin).max(margin);
            let max_y = (workspace_height - size.1 - margin).max(margin);
            let pos = scatter_pos(spec.seed, id as u32, margin, (max_x, max_y));
            let tile_id = |id: usize| Some(TileId(id as u32));
            let neighbors = Neighbors {
                top: if row > 0 { tile_id(id - cols) } else { None },
                right: if col + 1 < cols { tile_id(id + 1) } else { None },
                bottom: if row + 1 < rows { tile_id(id + cols) } else { None },
                left: if col > 0 { tile_id(id - 1) } else { None },
            };
            tiles.push(TileSpec {
                id: TileId(id as u32),
                pos,
                size,
                art: None,
                profile: spec.tabs.then_some(profile),
                neighbors,
            });
        }
    }

    PuzzleLayout {
        rules: PuzzleRules {
            snap_distance: spec.snap_distance,
            cell: spec.tabs.then_some((cell, cell)),
        },
        tiles,
    }
}

fn tab_sign(seed: u32, salt: u32) -> f32 {
    if rand_unit(seed, salt) < 0.5 {
        1.0
    } else {
        -1.0
    }
}
