use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use tessera_core::{ActionOutcome, CoreAction, PuzzleLayout, ReleaseOutcome};

use crate::app_core::{AppCore, AppSnapshot, AppSubscription};
use crate::puzzle_image::{load_tile_art, new_art_cache};
use crate::renderer::CanvasView;

#[derive(Clone)]
pub(crate) struct ViewHooks {
    pub(crate) on_action: Rc<dyn Fn(CoreAction)>,
}

pub(crate) trait GameView {
    fn init(&mut self, hooks: ViewHooks);
    fn render(&mut self, snapshot: &AppSnapshot);
    fn shutdown(&mut self);
}

struct Runtime {
    _core: Rc<AppCore>,
    view: Rc<RefCell<CanvasView>>,
    _subscription: AppSubscription,
    _art_listeners: Vec<EventListener>,
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

pub(crate) fn run() {
    let layout: PuzzleLayout = match toml::from_str(crate::PUZZLE_LAYOUT) {
        Ok(layout) => layout,
        Err(err) => {
            gloo::console::error!("puzzle layout does not parse", err.to_string());
            return;
        }
    };
    let core = match AppCore::new(&layout) {
        Ok(core) => core,
        Err(err) => {
            gloo::console::error!("puzzle layout rejected", err.to_string());
            return;
        }
    };
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        gloo::console::error!("no document to mount into");
        return;
    };
    let art = new_art_cache();
    let Some(mut view) = CanvasView::mount(&document, crate::CANVAS_ID, art.clone()) else {
        gloo::console::error!("canvas missing or without 2d context", crate::CANVAS_ID);
        return;
    };

    let core_for_hooks = core.clone();
    view.init(ViewHooks {
        on_action: Rc::new(move |action| dispatch(&core_for_hooks, action)),
    });
    let view = Rc::new(RefCell::new(view));

    let core_for_render = core.clone();
    let view_for_render = view.clone();
    let subscription = core.subscribe(Rc::new(move || {
        let snapshot = core_for_render.snapshot();
        view_for_render.borrow_mut().render(&snapshot);
    }));
    let art_listeners = load_tile_art(&core, &art);
    view.borrow_mut().render(&core.snapshot());
    gloo::console::log!("puzzle ready", layout.tiles.len() as u32);

    RUNTIME.with(|slot| {
        let previous = slot.borrow_mut().replace(Runtime {
            _core: core,
            view,
            _subscription: subscription,
            _art_listeners: art_listeners,
        });
        if let Some(previous) = previous {
            previous.view.borrow_mut().shutdown();
        }
    });
}

fn dispatch(core: &AppCore, action: CoreAction) {
    match core.apply_action(action) {
        ActionOutcome::Released(ReleaseOutcome::Connected {
            tile,
            neighbor,
            edge,
            group,
        }) => {
            gloo::console::log!(
                "connected",
                tile.to_string(),
                neighbor.to_string(),
                edge.label(),
                group.to_string()
            );
        }
        ActionOutcome::Reset => gloo::console::log!("puzzle reset"),
        _ => {}
    }
}
