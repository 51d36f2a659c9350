use approx::assert_relative_eq;
use tessera_core::{
    apply_action, can_connect, drag, grab, grid_layout, release, reset, snap_target, ActionOutcome,
    CoreAction, Edge, EdgeProfile, GridSpec, GroupId, InteractionSession, Neighbors, PuzzleLayout,
    PuzzleRules, PuzzleState, ReleaseOutcome, TileId, TileSpec,
};

const SIZE: f32 = 100.0;
const SNAP: f32 = 20.0;

fn spec(id: u32, pos: (f32, f32), neighbors: Neighbors) -> TileSpec {
    TileSpec {
        id: TileId(id),
        pos,
        size: (SIZE, SIZE),
        art: None,
        profile: None,
        neighbors,
    }
}

/// Tile 0 expects tile 1 on its right.
fn pair_layout(second: (f32, f32)) -> PuzzleLayout {
    PuzzleLayout {
        rules: PuzzleRules {
            snap_distance: SNAP,
            cell: None,
        },
        tiles: vec![
            spec(
                0,
                (400.0, 300.0),
                Neighbors {
                    right: Some(TileId(1)),
                    ..Neighbors::default()
                },
            ),
            spec(
                1,
                second,
                Neighbors {
                    left: Some(TileId(0)),
                    ..Neighbors::default()
                },
            ),
        ],
    }
}

/// Row of three tiles, 0 - 1 - 2, spread apart.
fn row_layout() -> PuzzleLayout {
    PuzzleLayout {
        rules: PuzzleRules {
            snap_distance: SNAP,
            cell: None,
        },
        tiles: vec![
            spec(
                0,
                (0.0, 0.0),
                Neighbors {
                    right: Some(TileId(1)),
                    ..Neighbors::default()
                },
            ),
            spec(
                1,
                (300.0, 0.0),
                Neighbors {
                    left: Some(TileId(0)),
                    right: Some(TileId(2)),
                    ..Neighbors::default()
                },
            ),
            spec(
                2,
                (600.0, 300.0),
                Neighbors {
                    left: Some(TileId(1)),
                    ..Neighbors::default()
                },
            ),
        ],
    }
}

fn pos(state: &PuzzleState, id: u32) -> (f32, f32) {
    state.tile_by_id(TileId(id)).expect("tile").pos
}

fn group(state: &PuzzleState, id: u32) -> GroupId {
    state.tile_by_id(TileId(id)).expect("tile").group
}

fn assert_symmetric(state: &PuzzleState) {
    for tile in state.tiles() {
        for other in &tile.connected_to {
            let back = state.tile_by_id(*other).expect("connected tile");
            assert!(
                back.is_connected_to(tile.id),
                "{} lists {} but not the reverse",
                tile.id,
                other
            );
        }
    }
}

/// Grabs `id` at its origin, drags it to `to`, releases.
fn move_tile(
    state: &mut PuzzleState,
    session: &mut InteractionSession,
    id: u32,
    to: (f32, f32),
) -> ReleaseOutcome {
    let at = pos(state, id);
    assert!(grab(state, session, TileId(id), at));
    assert!(drag(state, session, to));
    release(state, session)
}

#[test]
fn near_miss_inside_tolerance_connects() {
    // Ideal spot for tile 1 is (500, 300); one unit off on both axes.
    let mut state = PuzzleState::from_layout(&pair_layout((50.0, 50.0))).expect("layout");
    let mut session = InteractionSession::new();
    let outcome = move_tile(&mut state, &mut session, 1, (501.0, 299.0));

    assert_eq!(
        outcome,
        ReleaseOutcome::Connected {
            tile: TileId(1),
            neighbor: TileId(0),
            edge: Edge::Left,
            group: GroupId(0),
        }
    );
    assert_eq!(pos(&state, 1), (500.0, 300.0));
    assert_eq!(pos(&state, 0), (400.0, 300.0));
    assert_eq!(group(&state, 0), group(&state, 1));
    assert_eq!(state.group_count(), 1);
    assert!(state.tile_by_id(TileId(0)).expect("tile").is_connected_to(TileId(1)));
    assert!(state.tile_by_id(TileId(1)).expect("tile").is_connected_to(TileId(0)));
    assert!(!session.is_dragging());
}

#[test]
fn beyond_tolerance_stays_where_dropped() {
    let mut state = PuzzleState::from_layout(&pair_layout((50.0, 50.0))).expect("layout");
    let mut session = InteractionSession::new();
    let dropped_at = (500.0 + SNAP + 1.0, 300.0);
    let outcome = move_tile(&mut state, &mut session, 1, dropped_at);

    assert_eq!(outcome, ReleaseOutcome::Dropped { group: GroupId(1) });
    assert_eq!(pos(&state, 1), dropped_at);
    assert_eq!(pos(&state, 0), (400.0, 300.0));
    assert_eq!(state.group_count(), 2);
    assert!(state.tiles().iter().all(|tile| tile.connected_to.is_empty()));
    assert!(!session.is_dragging());
}

#[test]
fn tolerance_applies_to_each_axis() {
    let rules = PuzzleRules {
        snap_distance: SNAP,
        cell: None,
    };
    let cases = [
        ((500.0 + SNAP, 300.0 - SNAP), Some(Edge::Right)),
        ((500.0 - SNAP, 300.0 + SNAP), Some(Edge::Right)),
        ((500.0, 300.0 + SNAP + 1.0), None),
        ((500.0 - SNAP - 1.0, 300.0), None),
    ];
    for (second, expected) in cases {
        let state = PuzzleState::from_layout(&pair_layout(second)).expect("layout");
        let a = state.tile_by_id(TileId(0)).expect("tile");
        let b = state.tile_by_id(TileId(1)).expect("tile");
        assert_eq!(can_connect(a, b, &rules), expected, "second tile at {second:?}");
    }
}

#[test]
fn snapped_tiles_have_no_residual_error() {
    let rules = PuzzleRules {
        snap_distance: SNAP,
        cell: None,
    };
    let mut state = PuzzleState::from_layout(&pair_layout((513.0, 288.0))).expect("layout");
    let a = state.tile_by_id(TileId(0)).expect("tile").clone();
    let b = state.tile_by_id(TileId(1)).expect("tile").clone();
    let edge = can_connect(&a, &b, &rules).expect("fits");
    let target = snap_target(&a, &b, edge, &rules);

    let mut snapped = a.clone();
    snapped.pos = target;
    let exact = PuzzleRules {
        snap_distance: 0.0,
        cell: None,
    };
    assert_eq!(can_connect(&snapped, &b, &exact), Some(edge));

    // The same pair released through the controller lands on the same spot.
    let mut session = InteractionSession::new();
    assert!(grab(&mut state, &mut session, TileId(0), a.pos));
    assert!(matches!(
        release(&mut state, &mut session),
        ReleaseOutcome::Connected { .. }
    ));
    assert_eq!(pos(&state, 0), target);
}

#[test]
fn released_pairs_fit_exactly_at_awkward_coordinates() {
    let exact = PuzzleRules {
        snap_distance: 0.0,
        cell: None,
    };
    for step in 0..400 {
        let first = (1000.013 + step as f32 * 0.613, 699.9908 - step as f32 * 0.389);
        let miss = ((step % 7) as f32 * 2.9 - 9.0, (step % 5) as f32 * 3.7 - 7.4);
        let mut layout = pair_layout((first.0 + SIZE + miss.0, first.1 + miss.1));
        layout.tiles[0].pos = first;
        let mut state = PuzzleState::from_layout(&layout).expect("layout");
        let mut session = InteractionSession::new();
        assert!(grab(&mut state, &mut session, TileId(0), first));
        assert!(matches!(
            release(&mut state, &mut session),
            ReleaseOutcome::Connected { .. }
        ));
        let a = state.tile_by_id(TileId(0)).expect("tile");
        let b = state.tile_by_id(TileId(1)).expect("tile");
        assert_eq!(can_connect(a, b, &exact), Some(Edge::Right), "from {first:?}");
        assert_relative_eq!(b.pos.0 - a.pos.0, SIZE, max_relative = 1e-5);
        assert_relative_eq!(b.pos.1 - a.pos.1, 0.0, epsilon = 1e-3);
    }
}

#[test]
fn loaded_art_size_drives_hits_and_fits() {
    let mut state = PuzzleState::from_layout(&pair_layout((50.0, 50.0))).expect("layout");
    let mut session = InteractionSession::new();
    let outcome = apply_action(
        &mut state,
        &mut session,
        &CoreAction::TileArtLoaded {
            id: TileId(0),
            width: 150.0,
            height: 80.0,
        },
    );
    assert_eq!(outcome, ActionOutcome::Resized { tile: TileId(0) });

    let first = state.handle_of(TileId(0));
    assert_eq!(state.hit_test(540.0, 320.0), first);
    assert_eq!(state.hit_test(420.0, 390.0), None);

    // The old 100 px fit is now 50 px short.
    let dropped = move_tile(&mut state, &mut session, 1, (501.0, 299.0));
    assert_eq!(dropped, ReleaseOutcome::Dropped { group: GroupId(1) });

    let outcome = move_tile(&mut state, &mut session, 1, (551.0, 301.0));
    assert!(matches!(
        outcome,
        ReleaseOutcome::Connected {
            edge: Edge::Left,
            ..
        }
    ));
    assert_eq!(pos(&state, 1), (550.0, 300.0));
}

#[test]
fn drag_translates_the_whole_group() {
    let mut state = PuzzleState::from_layout(&row_layout()).expect("layout");
    let mut session = InteractionSession::new();
    move_tile(&mut state, &mut session, 1, (100.0, 0.0));
    assert_eq!(group(&state, 1), GroupId(0));

    let before: Vec<_> = [0, 1].iter().map(|id| pos(&state, *id)).collect();
    let pointer = (150.0, 30.0);
    assert!(grab(&mut state, &mut session, TileId(1), pointer));
    assert_eq!(session.grab_offset(), (50.0, 30.0));
    assert!(drag(&mut state, &mut session, (170.0, 75.0)));
    assert!(drag(&mut state, &mut session, (190.0, 130.0)));
    let after: Vec<_> = [0, 1].iter().map(|id| pos(&state, *id)).collect();
    for (start, end) in before.iter().zip(&after) {
        assert_eq!((end.0 - start.0, end.1 - start.1), (40.0, 100.0));
    }
    assert_eq!(pos(&state, 2), (600.0, 300.0));
}

#[test]
fn drag_without_grab_is_a_no_op() {
    let mut state = PuzzleState::from_layout(&row_layout()).expect("layout");
    let mut session = InteractionSession::new();
    assert!(!drag(&mut state, &mut session, (999.0, 999.0)));
    assert_eq!(release(&mut state, &mut session), ReleaseOutcome::Idle);
    assert!(!grab(&mut state, &mut session, TileId(42), (0.0, 0.0)));
    assert_eq!(pos(&state, 0), (0.0, 0.0));
}

#[test]
fn grab_raises_group_to_the_top() {
    let mut state = PuzzleState::from_layout(&row_layout()).expect("layout");
    let mut session = InteractionSession::new();
    assert!(grab(&mut state, &mut session, TileId(0), (10.0, 10.0)));
    assert_eq!(state.layer_order(), &[GroupId(1), GroupId(2), GroupId(0)]);
}

#[test]
fn one_release_makes_at_most_one_connection() {
    // Tile 1 is dropped where it fits both of its neighbors at once.
    let mut layout = row_layout();
    layout.tiles[2].pos = (200.0, 0.0);
    let mut state = PuzzleState::from_layout(&layout).expect("layout");
    let mut session = InteractionSession::new();
    let outcome = move_tile(&mut state, &mut session, 1, (100.0, 0.0));

    assert_eq!(
        outcome,
        ReleaseOutcome::Connected {
            tile: TileId(1),
            neighbor: TileId(0),
            edge: Edge::Left,
            group: GroupId(0),
        }
    );
    assert_eq!(state.group_count(), 2);
    assert_eq!(group(&state, 2), GroupId(2));

    // Releasing the merged group again picks up the remaining fit.
    let outcome = move_tile(&mut state, &mut session, 1, (100.0, 0.0));
    assert_eq!(
        outcome,
        ReleaseOutcome::Connected {
            tile: TileId(1),
            neighbor: TileId(2),
            edge: Edge::Right,
            group: GroupId(0),
        }
    );
    assert_eq!(state.group_count(), 1);
    assert_symmetric(&state);
}

#[test]
fn repeated_release_never_splits_or_duplicates() {
    let mut state = PuzzleState::from_layout(&pair_layout((500.0, 300.0))).expect("layout");
    let mut session = InteractionSession::new();
    for _ in 0..3 {
        let at = pos(&state, 1);
        assert!(grab(&mut state, &mut session, TileId(1), at));
        release(&mut state, &mut session);
        assert_eq!(state.group_count(), 1);
        assert_eq!(state.tiles().len(), 2);
        assert_eq!(state.group_members(GroupId(0)), &[0, 1]);
        assert_eq!(state.tile_by_id(TileId(0)).expect("tile").connected_to.len(), 1);
        assert_symmetric(&state);
    }
}

#[test]
fn reset_restores_the_initial_puzzle() {
    let layout = grid_layout(&GridSpec::new(3, 3));
    let mut state = PuzzleState::from_layout(&layout).expect("layout");
    let mut session = InteractionSession::new();

    // Walk tile 1 to its ideal spot next to tile 0, then tile 3 below tile 0.
    let origin = pos(&state, 0);
    move_tile(&mut state, &mut session, 1, (origin.0 + SIZE, origin.1));
    move_tile(&mut state, &mut session, 3, (origin.0, origin.1 + SIZE));
    assert_eq!(state.group_count(), 7);
    assert!(grab(&mut state, &mut session, TileId(4), (0.0, 0.0)));

    reset(&mut state, &mut session);
    assert!(!session.is_dragging());
    assert_eq!(state.group_count(), 9);
    assert_eq!(
        state.layer_order(),
        &(0..9).map(GroupId).collect::<Vec<_>>()[..]
    );
    for (tile, spec) in state.tiles().iter().zip(&layout.tiles) {
        assert_eq!(tile.pos, spec.pos);
        assert!(tile.connected_to.is_empty());
        assert_eq!(tile.group, GroupId(spec.id.0));
    }
}

#[test]
fn tabbed_tiles_fit_by_their_bodies() {
    let layout = grid_layout(&GridSpec {
        tabs: true,
        ..GridSpec::new(2, 1)
    });
    let mut state = PuzzleState::from_layout(&layout).expect("layout");
    let mut session = InteractionSession::new();

    let left = state.tile_by_id(TileId(0)).expect("tile").clone();
    let right = state.tile_by_id(TileId(1)).expect("tile").clone();
    let left_profile = left.profile.unwrap_or(EdgeProfile::FLAT);
    let right_profile = right.profile.unwrap_or(EdgeProfile::FLAT);
    assert_eq!(left_profile.right, -right_profile.left);

    // Bodies abut when the right tile's body starts one cell after the left body.
    let body_x = left.pos.0 + left_profile.tab(Edge::Left) + SIZE;
    let ideal = (body_x - right_profile.tab(Edge::Left), left.pos.1);
    let outcome = move_tile(&mut state, &mut session, 1, (ideal.0 + 3.0, ideal.1 - 3.0));
    assert!(matches!(outcome, ReleaseOutcome::Connected { edge: Edge::Left, .. }));
    assert_relative_eq!(pos(&state, 1).0, ideal.0);
    assert_relative_eq!(pos(&state, 1).1, ideal.1);
}

#[test]
fn pointer_actions_drive_the_controller() {
    let mut state = PuzzleState::from_layout(&pair_layout((50.0, 50.0))).expect("layout");
    let mut session = InteractionSession::new();

    assert_eq!(
        apply_action(&mut state, &mut session, &CoreAction::PointerDown { x: 5.0, y: 5.0 }),
        ActionOutcome::Ignored
    );
    assert_eq!(
        apply_action(&mut state, &mut session, &CoreAction::PointerDown { x: 60.0, y: 70.0 }),
        ActionOutcome::Grabbed {
            tile: TileId(1),
            group: GroupId(1),
        }
    );
    assert_eq!(
        apply_action(&mut state, &mut session, &CoreAction::PointerMove { x: 512.0, y: 318.0 }),
        ActionOutcome::Moved
    );
    assert_eq!(pos(&state, 1), (502.0, 298.0));
    assert!(matches!(
        apply_action(&mut state, &mut session, &CoreAction::PointerLeave),
        ActionOutcome::Released(ReleaseOutcome::Connected { .. })
    ));
    assert_eq!(pos(&state, 1), (500.0, 300.0));
    assert_eq!(
        apply_action(&mut state, &mut session, &CoreAction::PointerUp),
        ActionOutcome::Released(ReleaseOutcome::Idle)
    );

    assert_eq!(
        apply_action(
            &mut state,
            &mut session,
            &CoreAction::TileArtLoaded {
                id: TileId(0),
                width: 96.0,
                height: 96.0,
            }
        ),
        ActionOutcome::Resized { tile: TileId(0) }
    );
    assert_eq!(
        apply_action(&mut state, &mut session, &CoreAction::Reset),
        ActionOutcome::Reset
    );
    assert_eq!(pos(&state, 1), (50.0, 50.0));
    assert_eq!(state.group_count(), 2);
}
