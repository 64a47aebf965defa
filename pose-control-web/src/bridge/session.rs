//! Session storage and JS entry points
//!
//! One `ControlSession` per page. JavaScript calls `process_landmarks` once per
//! video frame; key presses go to the `on_key` callback, or are queued for
//! `take_key_commands` when no callback is registered.

use std::cell::RefCell;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::actuator::JsActuator;
use super::landmarks::decode_landmarks;
use crate::actuation::{Actuator, ChordScheduler, KeyCommand};
use crate::config::EngineConfig;
use crate::cooldown::CooldownPhase;
use crate::error::{ConfigError, FrameError};
use crate::features::FeatureSnapshot;
use crate::session::{ActionEvent, ControlSession};

/// Queued commands kept when nobody drains them
const MAX_QUEUED_COMMANDS: usize = 256;

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> Self {
        JsValue::from_str(&format!("Config error: {}", err))
    }
}

impl From<FrameError> for JsValue {
    fn from(err: FrameError) -> Self {
        JsValue::from_str(&format!("Frame error: {}", err))
    }
}

// ============================================================================
// BRIDGE STATE
// ============================================================================

#[derive(Default)]
struct BridgeState {
    session: ControlSession,
    scheduler: ChordScheduler,
    actuator: Option<JsActuator>,
    queued: Vec<KeyCommand>,
    last_event: Option<ActionEvent>,
    last_features: Option<FeatureSnapshot>,
}

impl BridgeState {
    /// Send due key commands to the callback, or queue them
    fn pump(&mut self, now: f64) -> usize {
        match self.actuator.as_mut() {
            Some(actuator) => self.scheduler.dispatch(now, actuator),
            None => {
                let commands = self.scheduler.poll(now);
                let sent = commands.len();
                self.queue(commands);
                sent
            }
        }
    }

    fn queue(&mut self, commands: Vec<KeyCommand>) {
        self.queued.extend(commands);
        if self.queued.len() > MAX_QUEUED_COMMANDS {
            let excess = self.queued.len() - MAX_QUEUED_COMMANDS;
            self.queued.drain(..excess);
        }
    }

    fn release_keys(&mut self) {
        let commands = self.scheduler.release_all();
        match self.actuator.as_mut() {
            Some(actuator) => {
                for command in commands {
                    actuator.apply(command);
                }
            }
            None => self.queue(commands),
        }
    }

    fn replace_session(&mut self, session: ControlSession) {
        self.release_keys();
        self.session = session;
        self.last_event = None;
        self.last_features = None;
    }
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static BRIDGE: RefCell<BridgeState> = RefCell::new(BridgeState::default());
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Replace the session with one built from a JSON config
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = EngineConfig::from_json(json)?;
    let session = ControlSession::new(config)?;
    BRIDGE.with(|cell| cell.borrow_mut().replace_session(session));
    log::info!("configured from JSON");
    Ok(())
}

/// Replace the session with a named preset: combined, punch, kick, move
#[wasm_bindgen]
pub fn use_preset(name: &str) -> Result<(), JsValue> {
    let session = ControlSession::from_preset(name)?;
    BRIDGE.with(|cell| cell.borrow_mut().replace_session(session));
    log::info!("using preset '{}'", name);
    Ok(())
}

/// Current config as JSON
#[wasm_bindgen]
pub fn get_config() -> Result<String, JsValue> {
    let json = BRIDGE.with(|cell| cell.borrow().session.config().to_json())?;
    Ok(json)
}

/// Register `callback(key: string, pressed: boolean)` as the key backend
#[wasm_bindgen]
pub fn on_key(callback: js_sys::Function) {
    BRIDGE.with(|cell| cell.borrow_mut().actuator = Some(JsActuator::new(callback)));
}

/// Called from JavaScript with a flat Float32Array of 132 values
/// (33 landmarks × x, y, z, visibility) or 99 values (x, y, z), or an empty
/// array when no person was detected. Returns the accepted action name.
#[wasm_bindgen]
pub fn process_landmarks(data: &[f32], timestamp_ms: f64) -> Result<Option<String>, JsValue> {
    let now = timestamp_ms / 1000.0;
    let frame = decode_landmarks(data, now).map_err(|err| {
        log::warn!("rejected landmarks: {}", err);
        err
    })?;

    BRIDGE.with(|cell| {
        let mut bridge = cell.borrow_mut();
        let outcome = bridge.session.tick(frame.as_ref(), now);
        if outcome.features.is_some() {
            bridge.last_features = outcome.features;
        }

        let accepted = outcome.event.map(|event| {
            bridge.scheduler.schedule(&event.chord, now);
            let name = event.action.as_str().to_string();
            bridge.last_event = Some(event);
            name
        });
        bridge.pump(now);
        Ok(accepted)
    })
}

/// Release keys whose hold time has passed. Call from requestAnimationFrame
/// so releases are not delayed until the next pose frame.
#[wasm_bindgen]
pub fn pump_keys(timestamp_ms: f64) -> usize {
    BRIDGE.with(|cell| cell.borrow_mut().pump(timestamp_ms / 1000.0))
}

/// Release every held key now
#[wasm_bindgen]
pub fn release_all_keys() {
    BRIDGE.with(|cell| cell.borrow_mut().release_keys());
}

/// Queued key commands (only filled when no callback is registered)
#[wasm_bindgen]
pub fn take_key_commands() -> JsValue {
    BRIDGE.with(|cell| {
        let commands = std::mem::take(&mut cell.borrow_mut().queued);
        to_js(&commands)
    })
}

/// Start over with the current config
#[wasm_bindgen]
pub fn reset_session() {
    BRIDGE.with(|cell| {
        let mut bridge = cell.borrow_mut();
        bridge.release_keys();
        bridge.session.reset();
        bridge.last_event = None;
        bridge.last_features = None;
    });
}

#[wasm_bindgen]
pub fn get_last_event() -> JsValue {
    BRIDGE.with(|cell| to_js(&cell.borrow().last_event))
}

/// Feature snapshot of the last detected frame
#[wasm_bindgen]
pub fn get_features() -> JsValue {
    BRIDGE.with(|cell| to_js(&cell.borrow().last_features))
}

#[wasm_bindgen]
pub fn get_session_stats() -> JsValue {
    BRIDGE.with(|cell| to_js(cell.borrow().session.stats()))
}

/// "idle" or the name of the held action
#[wasm_bindgen]
pub fn get_phase() -> String {
    BRIDGE.with(|cell| match cell.borrow().session.phase() {
        CooldownPhase::Idle => "idle".to_string(),
        CooldownPhase::Suppressing(action) => action.as_str().to_string(),
    })
}
