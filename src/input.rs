use tessera_core::CoreAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputEventKind {
    Down,
    Move,
    Up,
    Leave,
}

impl InputEventKind {
    pub(crate) const ALL: [InputEventKind; 4] = [
        InputEventKind::Down,
        InputEventKind::Move,
        InputEventKind::Up,
        InputEventKind::Leave,
    ];

    pub(crate) fn dom_name(self) -> &'static str {
        match self {
            InputEventKind::Down => "pointerdown",
            InputEventKind::Move => "pointermove",
            InputEventKind::Up => "pointerup",
            InputEventKind::Leave => "pointerleave",
        }
    }

    pub(crate) fn to_action(self, x: f32, y: f32) -> CoreAction {
        match self {
            InputEventKind::Down => CoreAction::PointerDown { x, y },
            InputEventKind::Move => CoreAction::PointerMove { x, y },
            InputEventKind::Up => CoreAction::PointerUp,
            InputEventKind::Leave => CoreAction::PointerLeave,
        }
    }
}

/// Maps a client-space point into canvas pixels, undoing CSS scaling.
pub(crate) fn client_to_canvas(
    client: (f32, f32),
    rect_origin: (f32, f32),
    rect_size: (f32, f32),
    canvas_size: (f32, f32),
) -> (f32, f32) {
    let scale_x = if rect_size.0 > 0.0 {
        canvas_size.0 / rect_size.0
    } else {
        1.0
    };
    let scale_y = if rect_size.1 > 0.0 {
        canvas_size.1 / rect_size.1
    } else {
        1.0
    };
    (
        (client.0 - rect_origin.0) * scale_x,
        (client.1 - rect_origin.1) * scale_y,
    )
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn bind_pointer_events(
    canvas: &web_sys::HtmlCanvasElement,
    on_action: std::rc::Rc<dyn Fn(CoreAction)>,
) -> Vec<gloo::events::EventListener> {
    use gloo::events::{EventListener, EventListenerOptions};
    use wasm_bindgen::JsCast;
    use web_sys::{Event, PointerEvent};

    InputEventKind::ALL
        .into_iter()
        .map(|kind| {
            let canvas_for_event = canvas.clone();
            let on_action = on_action.clone();
            EventListener::new_with_options(
                canvas,
                kind.dom_name(),
                EventListenerOptions::enable_prevent_default(),
                move |event: &Event| {
                    let Some(event) = event.dyn_ref::<PointerEvent>() else {
                        return;
                    };
                    if !event.is_primary() {
                        return;
                    }
                    if kind != InputEventKind::Move {
                        event.prevent_default();
                    }
                    let rect = canvas_for_event.get_bounding_client_rect();
                    let (x, y) = client_to_canvas(
                        (event.client_x() as f32, event.client_y() as f32),
                        (rect.left() as f32, rect.top() as f32),
                        (rect.width() as f32, rect.height() as f32),
                        (
                            canvas_for_event.width() as f32,
                            canvas_for_event.height() as f32,
                        ),
                    );
                    on_action(kind.to_action(x, y));
                },
            )
        })
        .collect()
}
