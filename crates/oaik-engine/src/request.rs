//! Request assembly for the active mode.
//!
//! Pure functions of the session state and the cell text: no validation
//! and no side effects.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::session::{Mode, SessionState};
use crate::Message;

pub const IMAGE_RESPONSE_FORMAT: &str = "b64_json";

/// Keys the chat request sets itself; `chat_kwargs` cannot override them.
const RESERVED_CHAT_KEYS: &[&str] = &["model", "messages", "temperature"];

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: Value,
    pub messages: Vec<Message>,
    pub temperature: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /images/generations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub n: Value,
    pub size: Value,
    pub response_format: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Chat(ChatRequest),
    Image(ImageRequest),
}

pub fn build_request(state: &SessionState, cell: &str) -> Request {
    match state.mode() {
        Mode::Chat => Request::Chat(build_chat_request(state, cell)),
        Mode::Image => Request::Image(build_image_request(state, cell)),
    }
}

pub fn build_chat_request(state: &SessionState, cell: &str) -> ChatRequest {
    let mut messages = state.effective_history();
    messages.push(Message::user(cell));

    let mut extra = match state.variable("chat_kwargs") {
        Some(Value::Object(kwargs)) => kwargs.clone(),
        Some(Value::Null) | None => Map::new(),
        Some(other) => {
            warn!(chat_kwargs = %other, "chat_kwargs is not a mapping, ignoring");
            Map::new()
        }
    };
    for key in RESERVED_CHAT_KEYS {
        if extra.remove(*key).is_some() {
            warn!(key, "chat_kwargs cannot override {key}, dropping it");
        }
    }

    ChatRequest {
        model: variable(state, "model"),
        messages,
        temperature: variable(state, "temperature"),
        extra,
    }
}

pub fn build_image_request(state: &SessionState, cell: &str) -> ImageRequest {
    ImageRequest {
        prompt: cell.to_string(),
        n: variable(state, "n"),
        size: variable(state, "size"),
        response_format: IMAGE_RESPONSE_FORMAT.to_string(),
    }
}

fn variable(state: &SessionState, name: &str) -> Value {
    state.variable(name).cloned().unwrap_or(Value::Null)
}
