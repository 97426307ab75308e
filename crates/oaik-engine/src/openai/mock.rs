//! Offline stand-in for the OpenAI API.
//!
//! With nothing queued, chat echoes the last user message, a message
//! containing `no_api_key` fails with a missing-key authentication
//! error, and one containing `connection_error` fails with a connection
//! error. Image requests return `n` copies of a 1x1 PNG. Replies can be
//! queued to script specific outcomes.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::error::ApiError;
use crate::request::{ChatRequest, ImageRequest};
use crate::response::{ChatCompletion, ImageDatum, ImageResponse};
use crate::CompletionClient;

use super::client::NO_API_KEY_MESSAGE;
use super::config::ClientConfig;

const PIXEL_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// The API accepts 1-10 images per request.
const MAX_IMAGES: u64 = 10;

#[derive(Default)]
pub struct MockClient {
    chat_replies: Mutex<VecDeque<Result<ChatCompletion, ApiError>>>,
    image_replies: Mutex<VecDeque<Result<ImageResponse, ApiError>>>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    image_requests: Mutex<Vec<ImageRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chat(&self, reply: Result<ChatCompletion, ApiError>) {
        lock(&self.chat_replies).push_back(reply);
    }

    pub fn push_image(&self, reply: Result<ImageResponse, ApiError>) {
        lock(&self.image_replies).push_back(reply);
    }

    /// Every chat request received so far.
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        lock(&self.chat_requests).clone()
    }

    pub fn image_requests(&self) -> Vec<ImageRequest> {
        lock(&self.image_requests).clone()
    }

    fn echo(request: &ChatRequest) -> Result<ChatCompletion, ApiError> {
        let content = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        if content.contains("no_api_key") {
            return Err(ApiError::Authentication(NO_API_KEY_MESSAGE.to_string()));
        }
        if content.contains("connection_error") {
            return Err(ApiError::Connection(
                "mock connection refused".to_string(),
            ));
        }
        Ok(ChatCompletion::single(format!("you said '{content}'"), "stop"))
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    async fn chat_completion(
        &self,
        _config: &ClientConfig,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, ApiError> {
        debug!(messages = request.messages.len(), "mock chat completion");
        lock(&self.chat_requests).push(request.clone());
        let queued = lock(&self.chat_replies).pop_front();
        queued.unwrap_or_else(|| Self::echo(request))
    }

    async fn create_image(
        &self,
        _config: &ClientConfig,
        request: &ImageRequest,
    ) -> Result<ImageResponse, ApiError> {
        debug!(prompt = %request.prompt, "mock image generation");
        lock(&self.image_requests).push(request.clone());
        let queued = lock(&self.image_replies).pop_front();
        queued.unwrap_or_else(|| {
            let n = request.n.as_u64().unwrap_or(1).clamp(1, MAX_IMAGES) as usize;
            Ok(ImageResponse {
                data: (0..n)
                    .map(|_| ImageDatum {
                        b64_json: Some(PIXEL_PNG_B64.to_string()),
                    })
                    .collect(),
            })
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;
    use serde_json::{json, Map};

    fn chat(content: &str) -> ChatRequest {
        ChatRequest {
            model: json!("gpt-3.5-turbo"),
            messages: vec![Message::user(content)],
            temperature: json!(1),
            extra: Map::new(),
        }
    }

    #[tokio::test]
    async fn echoes_last_message() {
        let client = MockClient::new();
        let reply = client
            .chat_completion(&ClientConfig::default(), &chat("its high noon"))
            .await
            .unwrap();
        assert_eq!(
            reply.choices[0].message.content.as_deref(),
            Some("you said 'its high noon'")
        );
        assert_eq!(client.chat_requests().len(), 1);
    }

    #[tokio::test]
    async fn image_count_stays_within_api_limits() {
        let client = MockClient::new();
        for (n, expected) in [(json!(100_000_000), 10), (json!(0), 1), (json!("three"), 1)] {
            let request = ImageRequest {
                prompt: "a cat".into(),
                n,
                size: json!("256x256"),
                response_format: "b64_json".into(),
            };
            let reply = client
                .create_image(&ClientConfig::default(), &request)
                .await
                .unwrap();
            assert_eq!(reply.data.len(), expected);
        }
    }

    #[tokio::test]
    async fn trigger_words_raise_errors() {
        let client = MockClient::new();
        let config = ClientConfig::default();

        let err = client.chat_completion(&config, &chat("no_api_key")).await.unwrap_err();
        assert!(matches!(err, ApiError::Authentication(_)));

        let err = client
            .chat_completion(&config, &chat("connection_error please"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Connection(_)));
    }

    #[tokio::test]
    async fn queued_replies_come_first() {
        let client = MockClient::new();
        client.push_chat(Ok(ChatCompletion::single("scripted", "length")));

        let config = ClientConfig::default();
        let first = client.chat_completion(&config, &chat("a")).await.unwrap();
        assert_eq!(first.choices[0].finish_reason.as_deref(), Some("length"));

        let second = client.chat_completion(&config, &chat("b")).await.unwrap();
        assert_eq!(second.choices[0].message.content.as_deref(), Some("you said 'b'"));
    }

    #[tokio::test]
    async fn images_follow_requested_count() {
        let client = MockClient::new();
        let request = ImageRequest {
            prompt: "fox".into(),
            n: json!(3),
            size: json!("256x256"),
            response_format: "b64_json".into(),
        };
        let response = client
            .create_image(&ClientConfig::default(), &request)
            .await
            .unwrap();
        assert_eq!(response.data.len(), 3);
    }
}
