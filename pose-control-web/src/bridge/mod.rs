//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod actuator;
mod landmarks;
mod session;

pub use actuator::JsActuator;

pub use landmarks::decode_landmarks;

pub use session::{
    configure,
    get_config,
    get_features,
    get_last_event,
    get_phase,
    get_session_stats,
    on_key,
    process_landmarks,
    pump_keys,
    release_all_keys,
    reset_session,
    take_key_commands,
    use_preset,
};
