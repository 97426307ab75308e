//! OpenAI client settings owned by the session.

use std::fmt;
use std::path::{Path, PathBuf};

use oaik_config::{ApiConfig, DEFAULT_API_BASE};

use crate::credential::Credential;

/// Settings for one API call: where to send it and how to authenticate.
///
/// The inline key and the key file path are mutually exclusive; setting
/// either one clears the other.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: Option<String>,
    api_key_path: Option<PathBuf>,
    pub organization: Option<String>,
    pub api_base: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_key_path", &self.api_key_path)
            .field("organization", &self.organization)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_path: None,
            organization: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Build from the `[api]` config section. An inline key wins over a
    /// key path when both are present.
    pub fn from_config(api: &ApiConfig) -> Self {
        let mut config = Self {
            organization: api.organization.clone(),
            api_base: api.api_base.clone(),
            ..Self::default()
        };
        if let Some(path) = &api.api_key_path {
            config.set_api_key_path(Some(PathBuf::from(path)));
        }
        if let Some(key) = &api.api_key {
            config.set_api_key(Some(key.clone()));
        }
        config
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn api_key_path(&self) -> Option<&Path> {
        self.api_key_path.as_deref()
    }

    pub fn set_api_key(&mut self, key: Option<String>) {
        self.api_key_path = None;
        self.api_key = key;
    }

    pub fn set_api_key_path(&mut self, path: Option<PathBuf>) {
        self.api_key = None;
        self.api_key_path = path;
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some() || self.api_key_path.is_some()
    }

    pub fn credential(&self) -> Option<Credential> {
        if let Some(key) = &self.api_key {
            return Some(Credential::Key(key.clone()));
        }
        self.api_key_path.clone().map(Credential::KeyPath)
    }

    pub fn apply(&mut self, credential: Credential) {
        match credential {
            Credential::Key(key) => self.set_api_key(Some(key)),
            Credential::KeyPath(path) => self.set_api_key_path(Some(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_and_path_are_mutually_exclusive() {
        let mut config = ClientConfig::default();

        config.set_api_key_path(Some("/path/to/sekrit".into()));
        assert_eq!(config.api_key_path(), Some(Path::new("/path/to/sekrit")));
        assert_eq!(config.api_key(), None);

        config.set_api_key(Some("bother".into()));
        assert_eq!(config.api_key(), Some("bother"));
        assert_eq!(config.api_key_path(), None);

        config.set_api_key_path(Some("/other".into()));
        assert_eq!(config.api_key(), None);
        assert!(config.has_credential());
    }

    #[test]
    fn from_config_prefers_inline_key() {
        let api = ApiConfig {
            api_key: Some("sk-inline".into()),
            api_key_path: Some("/tmp/key".into()),
            organization: Some("org-1".into()),
            ..ApiConfig::default()
        };
        let config = ClientConfig::from_config(&api);
        assert_eq!(config.credential(), Some(Credential::Key("sk-inline".into())));
        assert_eq!(config.api_key_path(), None);
        assert_eq!(config.organization.as_deref(), Some("org-1"));
    }

    #[test]
    fn debug_redacts_key() {
        let mut config = ClientConfig::default();
        config.set_api_key(Some("sk-secret".into()));
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("sk-secret"));
    }
}
