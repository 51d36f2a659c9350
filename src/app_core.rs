use std::cell::RefCell;
use std::rc::Rc;

use tessera_core::{
    apply_action, ActionOutcome, CoreAction, GroupId, InteractionSession, LayoutError,
    PuzzleLayout, PuzzleState, RenderTile, TileId,
};

pub(crate) type AppSubscriber = Rc<dyn Fn()>;

#[derive(Clone, Debug, Default)]
pub(crate) struct AppSnapshot {
    pub(crate) tiles: Vec<RenderTile>,
    pub(crate) dragging: Option<GroupId>,
}

pub(crate) struct AppCore {
    state: RefCell<AppState>,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

struct AppState {
    puzzle: PuzzleState,
    session: InteractionSession,
}

impl AppCore {
    pub(crate) fn new(layout: &PuzzleLayout) -> Result<Rc<Self>, LayoutError> {
        let puzzle = PuzzleState::from_layout(layout)?;
        Ok(Rc::new(Self {
            state: RefCell::new(AppState {
                puzzle,
                session: InteractionSession::new(),
            }),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }))
    }

    pub(crate) fn subscribe(&self, subscriber: AppSubscriber) -> AppSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        AppSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    /// Re-runs every subscriber without touching puzzle state.
    pub(crate) fn refresh(&self) {
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }

    pub(crate) fn snapshot(&self) -> AppSnapshot {
        let state = self.state.borrow();
        let dragging = state
            .session
            .grabbed()
            .and_then(|handle| state.puzzle.tile(handle))
            .map(|tile| tile.group);
        AppSnapshot {
            tiles: state.puzzle.render_list(),
            dragging,
        }
    }

    pub(crate) fn tile_art(&self) -> Vec<(TileId, String)> {
        let state = self.state.borrow();
        state
            .puzzle
            .tiles()
            .iter()
            .filter_map(|tile| tile.art.clone().map(|art| (tile.id, art)))
            .collect()
    }

    pub(crate) fn apply_action(&self, action: CoreAction) -> ActionOutcome {
        let outcome = {
            let mut state = self.state.borrow_mut();
            let AppState { puzzle, session } = &mut *state;
            apply_action(puzzle, session, &action)
        };
        if outcome.needs_render() {
            self.refresh();
        }
        outcome
    }
}

pub(crate) struct AppSubscription {
    subscriber: AppSubscriber,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

impl Drop for AppSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}
