use std::collections::{BTreeSet, HashMap};

use crate::layout::{LayoutError, PuzzleLayout, PuzzleRules};
use crate::tile::{GroupId, Tile, TileHandle, TileId};

/// What the renderer needs to paint a tile. Read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderTile {
    pub id: TileId,
    pub pos: (f32, f32),
    pub size: (f32, f32),
    pub art: Option<String>,
    pub connected: bool,
    pub group: GroupId,
}

#[derive(Clone, Debug)]
pub struct PuzzleState {
    rules: PuzzleRules,
    tiles: Vec<Tile>,
    handles: HashMap<TileId, TileHandle>,
    groups: HashMap<GroupId, Vec<TileHandle>>,
    layer_order: Vec<GroupId>,
    initial_positions: Vec<(f32, f32)>,
}

impl PuzzleState {
    pub fn from_layout(layout: &PuzzleLayout) -> Result<Self, LayoutError> {
        layout.validate()?;
        let tiles: Vec<Tile> = layout
            .tiles
            .iter()
            .map(|spec| Tile {
                id: spec.id,
                pos: spec.pos,
                size: spec.size,
                profile: spec.profile,
                neighbors: spec.neighbors,
                connected_to: BTreeSet::new(),
                group: GroupId::from(spec.id),
                art: spec.art.clone(),
            })
            .collect();
        let handles = tiles
            .iter()
            .enumerate()
            .map(|(handle, tile)| (tile.id, handle))
            .collect();
        let initial_positions = tiles.iter().map(|tile| tile.pos).collect();
        let mut state = Self {
            rules: layout.rules,
            tiles,
            handles,
            groups: HashMap::new(),
            layer_order: Vec::new(),
            initial_positions,
        };
        state.rebuild_singleton_groups();
        Ok(state)
    }

    pub fn rules(&self) -> &PuzzleRules {
        &self.rules
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, handle: TileHandle) -> Option<&Tile> {
        self.tiles.get(handle)
    }

    pub fn handle_of(&self, id: TileId) -> Option<TileHandle> {
        self.handles.get(&id).copied()
    }

    pub fn tile_by_id(&self, id: TileId) -> Option<&Tile> {
        self.handle_of(id).and_then(|handle| self.tiles.get(handle))
    }

    /// Members of `group` in creation order; empty for a group that no longer exists.
    pub fn group_members(&self, group: GroupId) -> &[TileHandle] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn layer_order(&self) -> &[GroupId] {
        &self.layer_order
    }

    pub fn raise_group(&mut self, group: GroupId) {
        let Some(index) = self.layer_order.iter().position(|id| *id == group) else {
            return;
        };
        let id = self.layer_order.remove(index);
        self.layer_order.push(id);
    }

    pub(crate) fn translate_group(&mut self, group: GroupId, delta: (f32, f32)) {
        let Some(members) = self.groups.get(&group) else {
            return;
        };
        for &handle in members {
            if let Some(tile) = self.tiles.get_mut(handle) {
                tile.pos = (tile.pos.0 + delta.0, tile.pos.1 + delta.1);
            }
        }
    }

    pub(crate) fn place_tile(&mut self, handle: TileHandle, pos: (f32, f32)) {
        if let Some(tile) = self.tiles.get_mut(handle) {
            tile.pos = pos;
        }
    }

    pub(crate) fn connect(&mut self, a: TileHandle, b: TileHandle) {
        if a == b || a >= self.tiles.len() || b >= self.tiles.len() {
            return;
        }
        let a_id = self.tiles[a].id;
        let b_id = self.tiles[b].id;
        self.tiles[a].connected_to.insert(b_id);
        self.tiles[b].connected_to.insert(a_id);
    }

    /// Folds both groups into the one named by the smaller id and returns it.
    ///
    /// Merging a group with itself changes nothing. The merged group takes the
    /// layer slot of whichever of the two was painted higher.
    pub(crate) fn merge_groups(&mut self, a: GroupId, b: GroupId) -> GroupId {
        if a == b {
            return a;
        }
        let (keep, absorb) = if a < b { (a, b) } else { (b, a) };
        let Some(absorbed) = self.groups.remove(&absorb) else {
            return keep;
        };
        for &handle in &absorbed {
            if let Some(tile) = self.tiles.get_mut(handle) {
                tile.group = keep;
            }
        }
        let members = self.groups.entry(keep).or_default();
        members.extend(absorbed);
        members.sort_unstable();

        let keep_index = self.layer_order.iter().position(|id| *id == keep);
        let absorb_index = self.layer_order.iter().position(|id| *id == absorb);
        if let (Some(keep_index), Some(absorb_index)) = (keep_index, absorb_index) {
            if absorb_index > keep_index {
                self.layer_order[absorb_index] = keep;
                self.layer_order.remove(keep_index);
            } else {
                self.layer_order.remove(absorb_index);
            }
        } else if let Some(absorb_index) = absorb_index {
            self.layer_order.remove(absorb_index);
        }
        keep
    }

    pub fn set_tile_size(&mut self, id: TileId, width: f32, height: f32) -> bool {
        if !(width > 0.0 && width.is_finite()) || !(height > 0.0 && height.is_finite()) {
            return false;
        }
        let Some(handle) = self.handle_of(id) else {
            return false;
        };
        let tile = &mut self.tiles[handle];
        if tile.size == (width, height) {
            return false;
        }
        tile.size = (width, height);
        true
    }

    /// Topmost tile whose bounding box contains the point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<TileHandle> {
        for group in self.layer_order.iter().rev() {
            for &handle in self.group_members(*group).iter().rev() {
                if self.tiles[handle].contains(x, y) {
                    return Some(handle);
                }
            }
        }
        None
    }

    /// Restores the positions and grouping the puzzle started with.
    ///
    /// Sizes reported by loaded art are kept.
    pub fn reset(&mut self) {
        for (tile, pos) in self.tiles.iter_mut().zip(&self.initial_positions) {
            tile.pos = *pos;
            tile.connected_to.clear();
            tile.group = GroupId::from(tile.id);
        }
        self.rebuild_singleton_groups();
    }

    pub fn render_list(&self) -> Vec<RenderTile> {
        let mut out = Vec::with_capacity(self.tiles.len());
        for group in &self.layer_order {
            for &handle in self.group_members(*group) {
                let tile = &self.tiles[handle];
                out.push(RenderTile {
                    id: tile.id,
                    pos: tile.pos,
                    size: tile.size,
                    art: tile.art.clone(),
                    connected: !tile.connected_to.is_empty(),
                    group: tile.group,
                });
            }
        }
        out
    }

    fn rebuild_singleton_groups(&mut self) {
        self.groups = self
            .tiles
            .iter()
            .enumerate()
            .map(|(handle, tile)| (tile.group, vec![handle]))
            .collect();
        self.layer_order = self.tiles.iter().map(|tile| tile.group).collect();
    }
}
