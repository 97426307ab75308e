//! Config file schema. Missing fields fall back to the defaults below.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OaikConfig {
    pub session: SessionDefaults,
    pub api: ApiConfig,
}

/// Initial values for the session's settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    /// Empty string disables the system message.
    pub system_prompt: String,
    pub model: String,
    pub temperature: f64,
    /// Extra parameters merged into every chat request.
    pub chat_kwargs: serde_json::Map<String, serde_json::Value>,
    /// Image size, e.g. "512x512".
    pub size: String,
    /// Number of images per generation request.
    pub n: u32,
    /// "chat" or "image".
    pub mode: String,
    pub use_history: bool,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            system_prompt: "You are a helpful assistant.".into(),
            model: "gpt-3.5-turbo".into(),
            temperature: 1.0,
            chat_kwargs: serde_json::Map::new(),
            size: "512x512".into(),
            n: 1,
            mode: "chat".into(),
            use_history: true,
        }
    }
}

/// Remote API client settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub api_key_path: Option<String>,
    pub organization: Option<String>,
    pub api_base: String,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_key_path", &self.api_key_path)
            .field("organization", &self.organization)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_path: None,
            organization: None,
            api_base: DEFAULT_API_BASE.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = OaikConfig::default();
        assert_eq!(config.session.system_prompt, "You are a helpful assistant.");
        assert_eq!(config.session.model, "gpt-3.5-turbo");
        assert_eq!(config.session.temperature, 1.0);
        assert_eq!(config.session.size, "512x512");
        assert_eq!(config.session.n, 1);
        assert_eq!(config.session.mode, "chat");
        assert!(config.session.use_history);
        assert!(config.session.chat_kwargs.is_empty());
        assert_eq!(config.api.api_base, DEFAULT_API_BASE);
        assert!(config.api.api_key.is_none());
    }

    #[test]
    fn api_config_debug_redacts_key() {
        let api = ApiConfig {
            api_key: Some("sk-secret".into()),
            ..ApiConfig::default()
        };
        let dbg = format!("{api:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn chat_kwargs_accept_nested_tables() {
        let config: OaikConfig = toml::from_str(
            r#"
[session.chat_kwargs]
frequency_penalty = 1
stop = ["\n\n"]
"#,
        )
        .unwrap();
        assert_eq!(config.session.chat_kwargs["frequency_penalty"], 1);
        assert_eq!(config.session.chat_kwargs["stop"][0], "\n\n");
    }
}
