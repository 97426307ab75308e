//! OpenAI API access: client settings, the HTTP client, and a mock.
//!
//! Chat completions go to `{api_base}/chat/completions` and image
//! generations to `{api_base}/images/generations`, authenticated with a
//! bearer key taken from [`ClientConfig`].

mod api;
mod client;
mod config;
mod mock;

pub use client::{OpenAiClient, NO_API_KEY_MESSAGE};
pub use config::ClientConfig;
pub use mock::MockClient;
