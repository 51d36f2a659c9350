//! Grab, drag and release transitions over a [`PuzzleState`].
//!
//! The drag target and pointer offset live in an explicit
//! [`InteractionSession`] so every transition can be driven without a
//! rendering surface.

use log::{debug, info, trace};

use crate::geometry::{can_connect, snap_target, Edge};
use crate::state::PuzzleState;
use crate::tile::{GroupId, TileHandle, TileId};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionSession {
    grabbed: Option<TileHandle>,
    grab_offset: (f32, f32),
}

impl InteractionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grabbed(&self) -> Option<TileHandle> {
        self.grabbed
    }

    pub fn grab_offset(&self) -> (f32, f32) {
        self.grab_offset
    }

    pub fn is_dragging(&self) -> bool {
        self.grabbed.is_some()
    }

    fn clear(&mut self) {
        self.grabbed = None;
        self.grab_offset = (0.0, 0.0);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReleaseOutcome {
    /// Nothing was grabbed.
    Idle,
    /// The group stays where it was dragged.
    Dropped { group: GroupId },
    Connected {
        tile: TileId,
        neighbor: TileId,
        edge: Edge,
        group: GroupId,
    },
}

/// Picks up `id` together with its group and raises the group to the top.
pub fn grab(
    state: &mut PuzzleState,
    session: &mut InteractionSession,
    id: TileId,
    pointer: (f32, f32),
) -> bool {
    let Some(handle) = state.handle_of(id) else {
        return false;
    };
    let tile = &state.tiles()[handle];
    let group = tile.group;
    session.grabbed = Some(handle);
    session.grab_offset = (pointer.0 - tile.pos.0, pointer.1 - tile.pos.1);
    state.raise_group(group);
    debug!("grab tile {id} in {group}");
    true
}

/// Moves the grabbed group rigidly so the grabbed tile follows the pointer.
pub fn drag(state: &mut PuzzleState, session: &InteractionSession, pointer: (f32, f32)) -> bool {
    let Some(handle) = session.grabbed else {
        return false;
    };
    let Some(tile) = state.tile(handle) else {
        return false;
    };
    let target = (
        pointer.0 - session.grab_offset.0,
        pointer.1 - session.grab_offset.1,
    );
    let delta = (target.0 - tile.pos.0, target.1 - tile.pos.1);
    let group = tile.group;
    trace!("drag {group} by ({}, {})", delta.0, delta.1);
    state.translate_group(group, delta);
    true
}

/// First fit between a member of `group` and a tile outside it.
///
/// Members are scanned in creation order and, for each, candidates in
/// creation order; the scan stops at the first hit. A release therefore
/// connects at most one pair even when several would fit.
pub fn find_first_fit(
    state: &PuzzleState,
    group: GroupId,
) -> Option<(TileHandle, TileHandle, Edge)> {
    let tiles = state.tiles();
    for &member in state.group_members(group) {
        let a = &tiles[member];
        for (candidate, b) in tiles.iter().enumerate() {
            if b.group == group || a.is_connected_to(b.id) {
                continue;
            }
            if let Some(edge) = can_connect(a, b, state.rules()) {
                return Some((member, candidate, edge));
            }
        }
    }
    None
}

/// Drops the grabbed group, snapping and merging it on the first fit found.
pub fn release(state: &mut PuzzleState, session: &mut InteractionSession) -> ReleaseOutcome {
    let Some(handle) = session.grabbed else {
        return ReleaseOutcome::Idle;
    };
    session.clear();
    let Some(group) = state.tile(handle).map(|tile| tile.group) else {
        return ReleaseOutcome::Idle;
    };
    let Some((member, candidate, edge)) = find_first_fit(state, group) else {
        debug!("release {group}: no fit");
        return ReleaseOutcome::Dropped { group };
    };

    let tiles = state.tiles();
    let a = &tiles[member];
    let b = &tiles[candidate];
    let target = snap_target(a, b, edge, state.rules());
    let delta = (target.0 - a.pos.0, target.1 - a.pos.1);
    let tile = a.id;
    let neighbor = b.id;
    let neighbor_group = b.group;

    state.translate_group(group, delta);
    // The anchor lands on the target itself, not on `pos + delta`.
    state.place_tile(member, target);
    state.connect(member, candidate);
    let merged = state.merge_groups(group, neighbor_group);
    info!("connected {tile} to {neighbor} on its {edge} edge, now {merged}");
    ReleaseOutcome::Connected {
        tile,
        neighbor,
        edge,
        group: merged,
    }
}

/// Discards all progress and any drag in flight.
pub fn reset(state: &mut PuzzleState, session: &mut InteractionSession) {
    session.clear();
    state.reset();
    info!("puzzle reset, {} groups", state.group_count());
}
