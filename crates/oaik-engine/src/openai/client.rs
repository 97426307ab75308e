//! OpenAI HTTP client struct, authentication, and error mapping.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::credential::Credential;
use crate::error::ApiError;

use super::config::ClientConfig;

pub(crate) const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
pub(crate) const IMAGE_GENERATIONS_PATH: &str = "images/generations";

/// Message of the authentication error raised when no key is configured.
pub const NO_API_KEY_MESSAGE: &str = "No API key provided. Set one with `%api_key API_KEY`, point `%api_key_path` at a file holding it, or set the OPENAI_API_KEY environment variable.";

/// OpenAI API client.
///
/// Requests are sent without a client-side timeout and are never retried.
pub struct OpenAiClient {
    pub(crate) http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new() -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        Ok(Self { http })
    }

    pub(crate) fn endpoint(config: &ClientConfig, path: &str) -> String {
        format!("{}/{}", config.api_base.trim_end_matches('/'), path)
    }

    /// The key to send, read from the key file at call time if needed.
    pub(crate) fn bearer_token(config: &ClientConfig) -> Result<String, ApiError> {
        let key = match config.credential() {
            Some(Credential::Key(key)) => key,
            Some(Credential::KeyPath(path)) => std::fs::read_to_string(&path)
                .map_err(|source| ApiError::KeyFile { path, source })?
                .trim()
                .to_string(),
            None => String::new(),
        };
        if key.is_empty() {
            return Err(ApiError::Authentication(NO_API_KEY_MESSAGE.to_string()));
        }
        Ok(key)
    }

    /// POST a JSON body and decode the JSON reply.
    pub(crate) async fn post_json<B, R>(
        &self,
        config: &ClientConfig,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let token = Self::bearer_token(config)?;
        let url = Self::endpoint(config, path);

        let mut request = self.http.post(&url).bearer_auth(token).json(body);
        if let Some(org) = config.organization.as_deref() {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "OpenAI API response");
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text);
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(ApiError::Authentication(message));
            }
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// The service's `error.message`, or the start of the raw body.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
