//! Key backend that calls back into JavaScript

use wasm_bindgen::prelude::*;

use crate::actuation::{Actuator, Key};

/// Calls `callback(key, pressed)` for every press and release.
/// `key` is a `KeyboardEvent.key` name.
pub struct JsActuator {
    callback: js_sys::Function,
}

impl JsActuator {
    pub fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }

    fn send(&self, key: Key, pressed: bool) {
        let this = JsValue::NULL;
        if let Err(err) = self
            .callback
            .call2(&this, &JsValue::from_str(key.as_str()), &JsValue::from_bool(pressed))
        {
            log::warn!("key callback failed for {}: {:?}", key, err);
        }
    }
}

impl Actuator for JsActuator {
    fn press(&mut self, key: Key) {
        self.send(key, true);
    }

    fn release(&mut self, key: Key) {
        self.send(key, false);
    }
}
