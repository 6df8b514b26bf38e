//! Birthday Journey core crate.
//!
//! A staged birthday greeting rendered on a single canvas: an intro, four
//! mini-games (memory, balloon pop, catch the hearts, Simon says) each followed
//! by a themed quote, and a final note with confetti. `start_greeting()` mounts
//! it into the page; everything below the shell is plain Rust and testable
//! natively.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod content;
pub mod error;
pub mod games;
pub mod stage;
pub mod timer;

mod shell;

pub use config::GreetingConfig;
pub use content::{ContentSource, Quote, StaticContent, Theme};
pub use error::ShellError;
pub use games::{ActiveGame, GameKind, Point};
pub use shell::{route_key, route_pointer_down};
pub use stage::{Stage, StageController};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    tracing_wasm::set_as_global_default();
}

/// Mount the greeting with the shipped pacing and content.
#[wasm_bindgen]
pub fn start_greeting() -> Result<(), JsValue> {
    shell::start(GreetingConfig::default())?;
    Ok(())
}

/// Mount the greeting with a JSON config; omitted fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_greeting_with_config(json: &str) -> Result<(), JsValue> {
    let cfg = GreetingConfig::from_json(json).map_err(ShellError::from)?;
    shell::start(cfg)?;
    Ok(())
}
