extern crate nalgebra_glm as glm;

mod animator;
mod color;
mod config;
mod field;
mod particle;
mod pointer;
mod surface;
mod utils;

use wasm_bindgen::prelude::*;

pub use animator::AetherFlow;
pub use color::Color;
pub use config::FieldConfig;
pub use field::{Link, ParticleField};
pub use particle::Particle;
pub use pointer::PointerState;
pub use surface::Surface;

// Call once from JS before mounting. Safe to call again.
#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already installed");
    }
}
