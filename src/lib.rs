//! Browser-side behavior for the Omen annotation server's pages.
//!
//! The server renders every page; this crate makes it interactive: fragment swaps,
//! list editors, hotkeys, tri-state filters, alerts, dialogs and the overview chart.

mod account;
mod alerts;
mod annotate;
mod api;
mod app;
mod chart;
mod comments;
mod components;
mod config;
mod dataset;
mod delegate;
mod dom;
mod editors;
mod filters;
mod fragment;
mod history;
mod labels;
mod markdown;
mod models;
mod mount;
mod sidebar;
mod state;
mod storage;
mod util;

use crate::config::PageConfig;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = PageConfig::load();
    // A second init (hot reload) is harmless; keep going with the existing logger.
    let _ = console_log::init_with_level(config.log_level);

    app::start(config);
}
