//! Push Channel
//!
//! Thin binding over the page's socket.io client (`window.io`).

use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::events::{ClientEmit, CONSUMED_EVENTS};

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    type Socket;

    #[wasm_bindgen(js_name = io)]
    fn io_same_origin() -> Socket;

    #[wasm_bindgen(js_name = io)]
    fn io_url(url: &str) -> Socket;

    #[wasm_bindgen(method)]
    fn on(this: &Socket, event: &str, callback: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(method)]
    fn emit(this: &Socket, event: &str, data: JsValue);

    #[wasm_bindgen(method, js_name = emit)]
    fn emit_with_ack(this: &Socket, event: &str, data: JsValue, ack: &js_sys::Function);

    #[wasm_bindgen(method, getter)]
    fn id(this: &Socket) -> Option<String>;

    #[wasm_bindgen(method, getter)]
    fn connected(this: &Socket) -> bool;
}

fn to_js(value: &Value) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| e.to_string())
}

#[derive(Clone)]
pub struct PushClient {
    socket: Socket,
}

impl PushClient {
    /// Open the connection; same origin unless `url` is given
    pub fn connect(url: Option<&str>) -> Self {
        let socket = match url {
            Some(url) => io_url(url),
            None => io_same_origin(),
        };
        Self { socket }
    }

    /// Our session id while connected
    pub fn sid(&self) -> Option<String> {
        self.socket.id()
    }

    pub fn is_connected(&self) -> bool {
        self.socket.connected()
    }

    /// Run `handler` on every (re)connect
    pub fn on_connect(&self, mut handler: impl FnMut() + 'static) {
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| handler());
        self.socket.on("connect", &callback);
        callback.forget();

        let on_disconnect = Closure::<dyn FnMut(JsValue)>::new(move |reason: JsValue| {
            log::warn!("[PUSH] disconnected: {:?}", reason.as_string());
        });
        self.socket.on("disconnect", &on_disconnect);
        on_disconnect.forget();
    }

    /// Subscribe `handler` to every consumed event name
    pub fn on_push(&self, handler: impl Fn(&str, Value) + 'static) {
        let handler = Rc::new(handler);
        for name in CONSUMED_EVENTS {
            let handler = Rc::clone(&handler);
            let callback = Closure::<dyn FnMut(JsValue)>::new(move |data: JsValue| {
                match serde_wasm_bindgen::from_value::<Value>(data) {
                    Ok(value) => handler(name, value),
                    Err(e) => log::warn!("[PUSH] unreadable `{}` payload: {}", name, e),
                }
            });
            self.socket.on(name, &callback);
            callback.forget();
        }
    }

    /// Fire-and-forget emit. Returns false when not connected.
    pub fn emit(&self, message: &ClientEmit) -> bool {
        if !self.is_connected() {
            log::warn!("[PUSH] not connected, dropping `{}`", message.name());
            return false;
        }
        match to_js(&message.payload()) {
            Ok(data) => {
                log::debug!("[PUSH] emit {}", message.name());
                self.socket.emit(message.name(), data);
                true
            }
            Err(e) => {
                log::error!("[PUSH] could not encode `{}`: {}", message.name(), e);
                false
            }
        }
    }

    /// Emit and wait for the server's acknowledgement value
    pub async fn request(&self, message: &ClientEmit) -> Result<Value, String> {
        if !self.is_connected() {
            return Err("not connected".to_string());
        }
        let data = to_js(&message.payload())?;
        let socket = self.socket.clone();
        let name = message.name();
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            socket.emit_with_ack(name, data.clone(), &resolve);
        });
        let reply = JsFuture::from(promise).await.map_err(|e| format!("{:?}", e))?;
        serde_wasm_bindgen::from_value(reply).map_err(|e| e.to_string())
    }
}
