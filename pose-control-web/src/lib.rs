//! Pose Control Web - body-pose fighting game controller
//!
//! Turns MediaPipe pose landmarks into debounced key chords.
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! Everything outside `bridge` is plain Rust and runs natively.

pub mod actuation;
pub mod classifier;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod features;
pub mod pose;
pub mod session;

mod bridge;


use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    configure, decode_landmarks, get_config, get_features, get_last_event, get_phase, get_session_stats,
    on_key, process_landmarks, pump_keys, release_all_keys, reset_session, take_key_commands, use_preset,
    JsActuator,
};

pub use config::EngineConfig;
pub use error::{ConfigError, FrameError};
pub use session::{drive, ControlSession, TickOutcome};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Route `log` output to the browser console.
/// Level: "trace", "debug", "info", "warn", "error" (default info).
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "warn" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    };

    // A second call keeps the first logger
    wasm_logger::init(wasm_logger::Config::new(log_level));
    log::info!("pose-control-web {} logging at {}", env!("CARGO_PKG_VERSION"), log_level);
}

#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// `performance.now()` in milliseconds, or 0 outside a browser window
#[wasm_bindgen]
pub fn get_timestamp() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or(0.0)
}
