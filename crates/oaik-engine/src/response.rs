//! Interpretation of successful API responses.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::output::{DisplayEvent, RichText};
use crate::session::SessionState;
use crate::Message;

/// Prefixed to a reply cut off by the token limit.
pub const TRUNCATION_ADVISORY: &str = "This response was truncated due to the token limit. To get a complete response, you can try clearing the chat history with `%clear_history`, setting the history manually with `%set history [{\"role\": \"user\", \"content\": \"your content here\"}, {\"role\": \"assistant\", \"content\": \"example response\"}]`, or turning off history with `%set use_history False`. You can view history with `%history`\n";

/// Replaces a reply withheld by content filtering.
pub const CONTENT_FILTER_NOTICE: &str = "This message was flagged for inappropriate content";

pub const IMAGE_FORMAT: &str = "png";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub finish_reason: Option<String>,
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// A single-choice completion, as the API returns by default.
    pub fn single(content: impl Into<String>, finish_reason: &str) -> Self {
        Self {
            choices: vec![ChatChoice {
                finish_reason: Some(finish_reason.to_string()),
                message: ChoiceMessage {
                    content: Some(content.into()),
                },
            }],
            model: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub data: Vec<ImageDatum>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDatum {
    #[serde(default)]
    pub b64_json: Option<String>,
}

/// Turn a chat completion into the cell's output and record the exchange.
///
/// A `length` finish gets the truncation advisory prefixed and is
/// recorded. A `content_filter` finish is replaced by a notice and is
/// not recorded. History is only touched after the response has been
/// fully read.
pub fn interpret_chat(
    state: &mut SessionState,
    user: Message,
    completion: ChatCompletion,
) -> Result<RichText, ApiError> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Parse("no choices in response".to_string()))?;
    let content = choice.message.content.unwrap_or_default();

    let (content, record) = match choice.finish_reason.as_deref() {
        Some("length") => {
            warn!("reply truncated by the token limit");
            (format!("{TRUNCATION_ADVISORY}{content}"), true)
        }
        Some("content_filter") => {
            warn!("reply withheld by content filter");
            (CONTENT_FILTER_NOTICE.to_string(), false)
        }
        _ => (content, true),
    };

    if record {
        state.append_exchange(user, Message::assistant(content.clone()));
    }
    Ok(RichText::plain(content))
}

/// Decode every generated image. Nothing is returned unless all decode.
pub fn interpret_images(
    prompt: &str,
    response: ImageResponse,
) -> Result<Vec<DisplayEvent>, ApiError> {
    debug!(count = response.data.len(), "decoding generated images");
    response
        .data
        .into_iter()
        .enumerate()
        .map(|(i, datum)| {
            let encoded = datum
                .b64_json
                .ok_or_else(|| ApiError::Parse(format!("image {i} has no b64_json data")))?;
            Ok(DisplayEvent {
                data: STANDARD.decode(encoded)?,
                format: IMAGE_FORMAT,
                alt: format!("{prompt} generated image {i}"),
            })
        })
        .collect()
}
