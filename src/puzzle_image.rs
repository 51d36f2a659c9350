use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tessera_core::TileId;

pub(crate) const ART_BASE: &str = "puzzles";

#[cfg(target_arch = "wasm32")]
pub(crate) type ArtCache = Rc<RefCell<HashMap<TileId, web_sys::HtmlImageElement>>>;
#[cfg(not(target_arch = "wasm32"))]
pub(crate) type ArtCache = Rc<RefCell<HashMap<TileId, ()>>>;

pub(crate) fn new_art_cache() -> ArtCache {
    Rc::new(RefCell::new(HashMap::new()))
}

pub(crate) fn resolve_art_src(art: &str) -> String {
    let art = art.trim();
    if art.starts_with('/') || art.contains("://") || art.starts_with("data:") {
        art.to_string()
    } else {
        format!("{ART_BASE}/{}", art.trim_start_matches("./"))
    }
}

/// Starts loading every tile's art. Loaded images land in `cache` and report
/// their real size to the core; failures keep the fallback drawing.
#[cfg(target_arch = "wasm32")]
pub(crate) fn load_tile_art(
    core: &Rc<crate::app_core::AppCore>,
    cache: &ArtCache,
) -> Vec<gloo::events::EventListener> {
    use gloo::events::EventListener;
    use tessera_core::CoreAction;
    use web_sys::HtmlImageElement;

    let mut listeners = Vec::new();
    for (id, art) in core.tile_art() {
        let Ok(image) = HtmlImageElement::new() else {
            gloo::console::warn!("tile art: cannot create image element", id.0);
            continue;
        };
        let src = resolve_art_src(&art);

        let core_for_load = core.clone();
        let cache_for_load = cache.clone();
        let image_for_load = image.clone();
        listeners.push(EventListener::once(&image, "load", move |_| {
            let width = image_for_load.natural_width() as f32;
            let height = image_for_load.natural_height() as f32;
            cache_for_load
                .borrow_mut()
                .insert(id, image_for_load.clone());
            let outcome = core_for_load.apply_action(CoreAction::TileArtLoaded {
                id,
                width,
                height,
            });
            if !outcome.needs_render() {
                core_for_load.refresh();
            }
        }));

        let src_for_error = src.clone();
        listeners.push(EventListener::once(&image, "error", move |_| {
            gloo::console::warn!("tile art failed to load", id.0, src_for_error.clone());
        }));

        image.set_src(&src);
    }
    listeners
}
