//! CompletionClient implementation for OpenAiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::error::ApiError;
use crate::request::{ChatRequest, ImageRequest};
use crate::response::{ChatCompletion, ImageResponse};
use crate::CompletionClient;

use super::client::{OpenAiClient, CHAT_COMPLETIONS_PATH, IMAGE_GENERATIONS_PATH};
use super::config::ClientConfig;

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn chat_completion(
        &self,
        config: &ClientConfig,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, ApiError> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "chat completion request"
        );
        self.post_json(config, CHAT_COMPLETIONS_PATH, request).await
    }

    async fn create_image(
        &self,
        config: &ClientConfig,
        request: &ImageRequest,
    ) -> Result<ImageResponse, ApiError> {
        debug!(n = %request.n, size = %request.size, "image generation request");
        self.post_json(config, IMAGE_GENERATIONS_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, ErrorCategory};
    use crate::session::SessionState;
    use crate::{request, Message};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ClientConfig {
        let mut config = ClientConfig::default().with_api_base(format!("{}/v1", server.uri()));
        config.set_api_key(Some("sk-test".into()));
        config
    }

    #[tokio::test]
    async fn chat_completion_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "gpt-3.5-turbo", "temperature": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "model": "gpt-3.5-turbo-0301",
                "choices": [{
                    "index": 0,
                    "finish_reason": "stop",
                    "message": {"role": "assistant", "content": "you said 'hi'"}
                }],
                "usage": {"prompt_tokens": 18, "completion_tokens": 9, "total_tokens": 27}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = SessionState::default();
        let body = request::build_chat_request(&state, "hi");
        let client = OpenAiClient::new().unwrap();
        let completion = client
            .chat_completion(&config_for(&server), &body)
            .await
            .unwrap();

        assert_eq!(completion.choices.len(), 1);
        assert_eq!(
            completion.choices[0].message.content.as_deref(),
            Some("you said 'hi'")
        );
        assert_eq!(body.messages.last(), Some(&Message::user("hi")));
    }

    #[tokio::test]
    async fn organization_header_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(header("OpenAI-Organization", "org-7"))
            .and(body_partial_json(json!({"response_format": "b64_json"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "created": 1,
                "data": [{"b64_json": "aGk="}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.organization = Some("org-7".into());
        let mut state = SessionState::default();
        state.set_mode("image");

        let client = OpenAiClient::new().unwrap();
        let response = client
            .create_image(&config, &request::build_image_request(&state, "fox"))
            .await
            .unwrap();
        assert_eq!(response.data.len(), 1);
    }

    #[tokio::test]
    async fn unauthorized_maps_to_rejected_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided: sk-test", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new().unwrap();
        let body = request::build_chat_request(&SessionState::default(), "hi");
        let err = client
            .chat_completion(&config_for(&server), &body)
            .await
            .unwrap_err();

        let diagnosis = classify(&err);
        assert_eq!(diagnosis.category, ErrorCategory::AuthenticationRejected);
        assert_eq!(diagnosis.message, "Incorrect API key provided: sk-test");
    }

    #[tokio::test]
    async fn server_error_is_unclassified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = OpenAiClient::new().unwrap();
        let body = request::build_chat_request(&SessionState::default(), "hi");
        let err = client
            .chat_completion(&config_for(&server), &body)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Api { status: 503, .. }));
        assert_eq!(classify(&err).category, ErrorCategory::Unclassified);
    }

    #[tokio::test]
    async fn refused_connection_is_network_failure() {
        let mut config = ClientConfig::default().with_api_base("http://127.0.0.1:9/v1");
        config.set_api_key(Some("sk-test".into()));

        let client = OpenAiClient::new().unwrap();
        let body = request::build_chat_request(&SessionState::default(), "hi");
        let err = client.chat_completion(&config, &body).await.unwrap_err();

        assert!(matches!(err, ApiError::Connection(_)));
        assert_eq!(classify(&err).category, ErrorCategory::NetworkUnavailable);
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let config = ClientConfig::default().with_api_base("http://127.0.0.1:9/v1");
        let client = OpenAiClient::new().unwrap();
        let body = request::build_chat_request(&SessionState::default(), "hi");
        let err = client.chat_completion(&config, &body).await.unwrap_err();

        assert_eq!(classify(&err).category, ErrorCategory::MissingCredential);
    }
}
