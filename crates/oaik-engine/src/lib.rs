//! Session execution engine for oaik.
//!
//! Turns a stream of user cells into calls against the OpenAI chat and
//! image APIs while keeping per-session configuration and conversation
//! history:
//! - Credential resolution from config, environment, or `~/.openai_api_key`
//! - Session state with first-class settings and free-form variables
//! - `%`-prefixed commands that change state without a model call
//! - Request building, response interpretation, and error classification
//! - A [`Kernel`] that ties them together per cell

pub mod classify;
pub mod commands;
pub mod credential;
pub mod error;
pub mod executor;
pub mod literal;
pub mod openai;
pub mod output;
pub mod request;
pub mod response;
pub mod session;

use async_trait::async_trait;

pub use classify::{classify, Diagnosis, ErrorCategory};
pub use commands::{dispatch, CommandSpec, COMMANDS};
pub use credential::{Credential, CredentialSources};
pub use error::{ApiError, CommandError, SessionError};
pub use executor::Kernel;
pub use openai::{ClientConfig, MockClient, OpenAiClient};
pub use output::{CellFailure, CellResult, DisplayEvent, DisplaySink, Payload, RichText};
pub use request::{build_request, ChatRequest, ImageRequest, Request};
pub use response::{ChatCompletion, ImageResponse};
pub use session::{Mode, SessionState, Setting};

/// The remote inference API, seen from the session.
///
/// Client settings are passed per call; implementations hold no
/// credential state of their own.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn chat_completion(
        &self,
        config: &ClientConfig,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, ApiError>;

    async fn create_image(
        &self,
        config: &ClientConfig,
        request: &ImageRequest,
    ) -> Result<ImageResponse, ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "role": self.role.as_str(),
            "content": self.content,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}
