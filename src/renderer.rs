use tessera_core::TileId;

pub(crate) const BACKGROUND: &str = "#1f2328";
pub(crate) const OUTLINE: &str = "rgba(0, 0, 0, 0.45)";
pub(crate) const CONNECTED_OUTLINE: &str = "#f5c542";
pub(crate) const DRAGGING_OUTLINE: &str = "#ffffff";
pub(crate) const LABEL_COLOR: &str = "#10151a";
pub(crate) const LABEL_FONT: &str = "bold 20px sans-serif";

/// Placeholder color for tiles whose art is missing.
pub(crate) fn fallback_color(id: TileId) -> String {
    let hue = (id.0.wrapping_mul(47)) % 360;
    format!("hsl({hue}, 55%, 62%)")
}

#[cfg(target_arch = "wasm32")]
pub(crate) use canvas::CanvasView;

#[cfg(target_arch = "wasm32")]
mod canvas {
    use gloo::events::EventListener;
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

    use super::*;
    use crate::app_core::AppSnapshot;
    use crate::input::bind_pointer_events;
    use crate::puzzle_image::ArtCache;
    use crate::runtime::{GameView, ViewHooks};
    use tessera_core::CoreAction;

    pub(crate) struct CanvasView {
        document: Document,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        art: ArtCache,
        listeners: Vec<EventListener>,
    }

    impl CanvasView {
        pub(crate) fn mount(document: &Document, canvas_id: &str, art: ArtCache) -> Option<Self> {
            let canvas = document
                .get_element_by_id(canvas_id)
                .and_then(|node| node.dyn_into::<HtmlCanvasElement>().ok())?;
            let ctx = canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())?;
            Some(Self {
                document: document.clone(),
                canvas,
                ctx,
                art,
                listeners: Vec::new(),
            })
        }

        fn draw_tile(&self, tile: &tessera_core::RenderTile, dragging: bool) {
            let ctx = &self.ctx;
            let (x, y) = (tile.pos.0 as f64, tile.pos.1 as f64);
            let (w, h) = (tile.size.0 as f64, tile.size.1 as f64);
            let art = self.art.borrow();
            let drawn = match art.get(&tile.id) {
                Some(image) if image.complete() => ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, w, h)
                    .is_ok(),
                _ => false,
            };
            if !drawn {
                ctx.set_fill_style_str(&fallback_color(tile.id));
                ctx.fill_rect(x, y, w, h);
                ctx.set_fill_style_str(LABEL_COLOR);
                ctx.set_font(LABEL_FONT);
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                let _ = ctx.fill_text(&tile.id.0.to_string(), x + w * 0.5, y + h * 0.5);
            }
            let outline = if dragging {
                DRAGGING_OUTLINE
            } else if tile.connected {
                CONNECTED_OUTLINE
            } else {
                OUTLINE
            };
            ctx.set_stroke_style_str(outline);
            ctx.set_line_width(if tile.connected || dragging { 2.0 } else { 1.0 });
            ctx.stroke_rect(x + 0.5, y + 0.5, w - 1.0, h - 1.0);
        }
    }

    impl GameView for CanvasView {
        fn init(&mut self, hooks: ViewHooks) {
            self.listeners = bind_pointer_events(&self.canvas, hooks.on_action.clone());
            if let Some(button) = self.document.get_element_by_id(crate::RESET_BUTTON_ID) {
                let on_action = hooks.on_action.clone();
                self.listeners.push(EventListener::new(&button, "click", move |_| {
                    on_action(CoreAction::Reset);
                }));
            } else {
                gloo::console::warn!("reset button missing", crate::RESET_BUTTON_ID);
            }
        }

        fn render(&mut self, snapshot: &AppSnapshot) {
            let width = self.canvas.width() as f64;
            let height = self.canvas.height() as f64;
            self.ctx.set_fill_style_str(BACKGROUND);
            self.ctx.fill_rect(0.0, 0.0, width, height);
            for tile in &snapshot.tiles {
                self.draw_tile(tile, snapshot.dragging == Some(tile.group));
            }
        }

        fn shutdown(&mut self) {
            self.listeners.clear();
        }
    }
}
