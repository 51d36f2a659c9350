#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod app_core;
mod input;
mod puzzle_image;
mod renderer;
#[cfg(target_arch = "wasm32")]
mod runtime;

pub(crate) const PUZZLE_LAYOUT: &str = include_str!("../assets/puzzle.toml");
pub(crate) const CANVAS_ID: &str = "puzzle-canvas";
pub(crate) const RESET_BUTTON_ID: &str = "puzzle-reset";

fn main() {
    #[cfg(target_arch = "wasm32")]
    runtime::run();

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("tessera runs in the browser; build it for wasm32 (for example with `trunk serve`)");
}
