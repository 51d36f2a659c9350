use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::PuzzleRules;
use crate::tile::Tile;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// Scan order of the connection test. The first matching edge wins.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Right => Edge::Left,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Offset from the bounding-box corner to the corner of the tile body.
pub fn body_inset(tile: &Tile) -> (f32, f32) {
    match tile.profile {
        Some(profile) => (profile.tab(Edge::Left), profile.tab(Edge::Top)),
        None => (0.0, 0.0),
    }
}

pub fn body_size(tile: &Tile, cell: Option<(f32, f32)>) -> (f32, f32) {
    if let Some(cell) = cell {
        return cell;
    }
    match tile.profile {
        Some(profile) => (
            (tile.size.0 - profile.tab(Edge::Left) - profile.tab(Edge::Right)).max(0.0),
            (tile.size.1 - profile.tab(Edge::Top) - profile.tab(Edge::Bottom)).max(0.0),
        ),
        None => tile.size,
    }
}

/// Displacement `b.pos - a.pos` of a perfect fit with `b` sitting on `edge` of `a`.
///
/// The tile bodies abut exactly; the bounding boxes are shifted by whatever
/// tabs stick out on the left and top of either tile.
pub fn expected_offset(a: &Tile, b: &Tile, edge: Edge, cell: Option<(f32, f32)>) -> (f32, f32) {
    let (a_inset_x, a_inset_y) = body_inset(a);
    let (b_inset_x, b_inset_y) = body_inset(b);
    let (a_width, a_height) = body_size(a, cell);
    let (b_width, b_height) = body_size(b, cell);
    let (dx, dy) = match edge {
        Edge::Top => (0.0, -b_height),
        Edge::Right => (a_width, 0.0),
        Edge::Bottom => (0.0, a_height),
        Edge::Left => (-b_width, 0.0),
    };
    (a_inset_x + dx - b_inset_x, a_inset_y + dy - b_inset_y)
}

pub fn within_tolerance(actual: (f32, f32), expected: (f32, f32), tolerance: f32) -> bool {
    (actual.0 - expected.0).abs() <= tolerance && (actual.1 - expected.1).abs() <= tolerance
}

/// Returns the edge of `a` on which `b` currently fits, if any.
///
/// Only edges where `a` expects `b` are considered, tested in [`Edge::ALL`]
/// order. Both axes must be inside the snap distance.
pub fn can_connect(a: &Tile, b: &Tile, rules: &PuzzleRules) -> Option<Edge> {
    if a.id == b.id {
        return None;
    }
    let actual = (b.pos.0 - a.pos.0, b.pos.1 - a.pos.1);
    let tolerance = rules.snap_distance + rounding_slack(a, b);
    Edge::ALL.into_iter().find(|&edge| {
        if a.neighbors.get(edge) != Some(b.id) {
            return false;
        }
        let expected = expected_offset(a, b, edge, rules.cell);
        within_tolerance(actual, expected, tolerance)
    })
}

/// Float error a snapped pair can carry at these coordinates.
///
/// A tile placed by [`snap_target`] is `b.pos - offset` rounded once, so reading
/// the offset back can be off by a few ulps of the largest coordinate involved.
fn rounding_slack(a: &Tile, b: &Tile) -> f32 {
    let magnitude = [a.pos, b.pos, a.size, b.size]
        .into_iter()
        .fold(0.0f32, |max, (x, y)| max.max(x.abs()).max(y.abs()));
    4.0 * f32::EPSILON * magnitude
}

/// Position `a` has to take so that it fits `b` exactly on `edge`, holding `b` fixed.
pub fn snap_target(a: &Tile, b: &Tile, edge: Edge, rules: &PuzzleRules) -> (f32, f32) {
    let (dx, dy) = expected_offset(a, b, edge, rules.cell);
    (b.pos.0 - dx, b.pos.1 - dy)
}
