use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Edge;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies a group by the smallest tile id among its members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl From<TileId> for GroupId {
    fn from(id: TileId) -> Self {
        GroupId(id.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Stable arena index of a tile, assigned in layout order.
pub type TileHandle = usize;

/// Signed per-edge offsets: positive is a protruding tab, negative an indented blank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeProfile {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeProfile {
    pub const FLAT: EdgeProfile = EdgeProfile {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn get(&self, edge: Edge) -> f32 {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    /// How far the edge sticks out past the tile body; blanks count as zero.
    pub fn tab(&self, edge: Edge) -> f32 {
        self.get(edge).max(0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neighbors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<TileId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<TileId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<TileId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<TileId>,
}

impl Neighbors {
    pub fn get(&self, edge: Edge) -> Option<TileId> {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Edge, TileId)> + '_ {
        Edge::ALL
            .into_iter()
            .filter_map(|edge| self.get(edge).map(|id| (edge, id)))
    }
}

#[derive(Clone, Debug)]
pub struct Tile {
    pub id: TileId,
    pub pos: (f32, f32),
    pub size: (f32, f32),
    pub profile: Option<EdgeProfile>,
    pub neighbors: Neighbors,
    pub connected_to: BTreeSet<TileId>,
    pub group: GroupId,
    pub art: Option<String>,
}

impl Tile {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.pos.0
            && x <= self.pos.0 + self.size.0
            && y >= self.pos.1
            && y <= self.pos.1 + self.size.1
    }

    pub fn is_connected_to(&self, other: TileId) -> bool {
        self.connected_to.contains(&other)
    }
}
