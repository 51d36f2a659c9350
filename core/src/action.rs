use serde::{Deserialize, Serialize};

use crate::session::{drag, grab, release, reset, InteractionSession, ReleaseOutcome};
use crate::state::PuzzleState;
use crate::tile::{GroupId, TileId};

/// Everything the outside world can ask of the puzzle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreAction {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    /// Pointer left the drawing surface; handled exactly like `PointerUp`.
    PointerLeave,
    Reset,
    TileArtLoaded { id: TileId, width: f32, height: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActionOutcome {
    Ignored,
    Grabbed { tile: TileId, group: GroupId },
    Moved,
    Released(ReleaseOutcome),
    Reset,
    Resized { tile: TileId },
}

impl ActionOutcome {
    /// Whether anything visible changed.
    pub fn needs_render(&self) -> bool {
        !matches!(
            self,
            ActionOutcome::Ignored | ActionOutcome::Released(ReleaseOutcome::Idle)
        )
    }
}

pub fn apply_action(
    state: &mut PuzzleState,
    session: &mut InteractionSession,
    action: &CoreAction,
) -> ActionOutcome {
    match *action {
        CoreAction::PointerDown { x, y } => {
            // Single pointer: a second press mid-drag is not a new grab.
            if session.is_dragging() {
                return ActionOutcome::Ignored;
            }
            let Some(tile) = state.hit_test(x, y).and_then(|handle| state.tile(handle)) else {
                return ActionOutcome::Ignored;
            };
            let id = tile.id;
            if !grab(state, session, id, (x, y)) {
                return ActionOutcome::Ignored;
            }
            let group = state.tile_by_id(id).map(|tile| tile.group).unwrap_or(GroupId::from(id));
            ActionOutcome::Grabbed { tile: id, group }
        }
        CoreAction::PointerMove { x, y } => {
            if drag(state, session, (x, y)) {
                ActionOutcome::Moved
            } else {
                ActionOutcome::Ignored
            }
        }
        CoreAction::PointerUp | CoreAction::PointerLeave => {
            ActionOutcome::Released(release(state, session))
        }
        CoreAction::Reset => {
            reset(state, session);
            ActionOutcome::Reset
        }
        CoreAction::TileArtLoaded { id, width, height } => {
            if state.set_tile_size(id, width, height) {
                ActionOutcome::Resized { tile: id }
            } else {
                ActionOutcome::Ignored
            }
        }
    }
}
