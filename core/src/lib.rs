pub mod action;
pub mod geometry;
pub mod layout;
pub mod session;
pub mod state;
pub mod tile;

pub use action::{apply_action, ActionOutcome, CoreAction};
pub use geometry::{can_connect, expected_offset, snap_target, Edge};
pub use layout::{
    grid_layout, GridSpec, LayoutError, PuzzleLayout, PuzzleRules, TileSpec, SNAP_DISTANCE_DEFAULT,
};
pub use session::{drag, grab, release, reset, InteractionSession, ReleaseOutcome};
pub use state::{PuzzleState, RenderTile};
pub use tile::{EdgeProfile, GroupId, Neighbors, Tile, TileHandle, TileId};
