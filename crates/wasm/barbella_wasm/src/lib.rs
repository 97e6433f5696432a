//! WebAssembly bindings for the browser chat widget.
//!
//! The widget keeps its conversation in a [`ChatSession`] and does the
//! `fetch` itself: `submit()` hands back the JSON body to post, and the
//! widget reports the outcome with `completeOk` / `completeErr`.
//! Rendering decisions come back as JSON (`{"kind": "table", "value": ...}`).

use barbella_core::render::{render, render_turn};
use barbella_core::view::{ConversationView, TransportError, ViewState};
use wasm_bindgen::prelude::*;

/// Returns the version of the barbella_wasm package.
#[wasm_bindgen]
pub fn version() -> String {
    barbella_core::version().to_string()
}

/// Rendering decision for assistant `content`, as JSON.
#[wasm_bindgen(js_name = renderContent)]
pub fn render_content(content: &str) -> String {
    to_json(&render(content))
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// One chat session held by the widget.
#[wasm_bindgen]
pub struct ChatSession {
    view: ConversationView,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ChatSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ChatSession {
        ChatSession {
            view: ConversationView::new(),
        }
    }

    #[wasm_bindgen(js_name = setInput)]
    pub fn set_input(&mut self, text: &str) {
        self.view.set_input(text);
    }

    /// JSON array of turns to `POST /api/chat`, or `undefined` when the
    /// submit is ignored.
    pub fn submit(&mut self) -> Option<String> {
        self.view.submit().map(|turns| to_json(&turns))
    }

    #[wasm_bindgen(js_name = completeOk)]
    pub fn complete_ok(&mut self, text: String) {
        self.view.complete(Ok(text));
    }

    /// `status` is the HTTP status for non-2xx replies, `0` for network
    /// failures described by `message`.
    #[wasm_bindgen(js_name = completeErr)]
    pub fn complete_err(&mut self, status: u16, message: String) {
        let err = if status == 0 {
            TransportError::Network(message)
        } else {
            TransportError::Status(status)
        };
        self.view.complete(Err(err));
    }

    #[wasm_bindgen(js_name = isSending)]
    pub fn is_sending(&self) -> bool {
        self.view.state() == ViewState::Sending
    }

    /// Turns with their rendering decision, as a JSON array of
    /// `{"role": ..., "rendered": ...}`.
    #[wasm_bindgen(js_name = renderedTurns)]
    pub fn rendered_turns(&self) -> String {
        let entries: Vec<serde_json::Value> = self
            .view
            .turns()
            .iter()
            .map(|turn| {
                serde_json::json!({
                    "role": turn.role,
                    "rendered": render_turn(turn),
                })
            })
            .collect();
        to_json(&entries)
    }
}
