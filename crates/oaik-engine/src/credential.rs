//! Credential resolution for a new session.
//!
//! Resolution order, applied only when the session has no key or key path:
//! 1. `OPENAI_API_KEY` env var (inline key)
//! 2. `OPENAI_API_KEY_PATH` env var (key file)
//! 3. `~/.openai_api_key`, if the file exists
//!
//! Finding nothing is not an error; the first API call then fails with
//! a missing-key authentication error.

use std::path::PathBuf;

use oaik_config::DEFAULT_API_BASE;
use tracing::debug;

use crate::openai::ClientConfig;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const API_KEY_PATH_ENV: &str = "OPENAI_API_KEY_PATH";
pub const ORGANIZATION_ENV: &str = "OPENAI_ORGANIZATION";
pub const API_BASE_ENV: &str = "OPENAI_API_BASE";
pub const DEFAULT_KEY_FILE: &str = ".openai_api_key";

/// An API key, or a file holding one.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Key(String),
    KeyPath(PathBuf),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Key(_) => f.write_str("Key([REDACTED])"),
            Credential::KeyPath(path) => f.debug_tuple("KeyPath").field(path).finish(),
        }
    }
}

/// Snapshot of the places a credential may come from.
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    pub api_key: Option<String>,
    pub api_key_path: Option<PathBuf>,
    pub organization: Option<String>,
    pub api_base: Option<String>,
    pub home_dir: Option<PathBuf>,
}

impl CredentialSources {
    /// Read the process environment and home directory.
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var(API_KEY_ENV),
            api_key_path: non_empty_var(API_KEY_PATH_ENV).map(PathBuf::from),
            organization: non_empty_var(ORGANIZATION_ENV),
            api_base: non_empty_var(API_BASE_ENV),
            home_dir: dirs::home_dir(),
        }
    }

    /// `~/.openai_api_key`, if it exists right now.
    pub fn default_key_file(&self) -> Option<PathBuf> {
        let path = self.home_dir.as_ref()?.join(DEFAULT_KEY_FILE);
        path.is_file().then_some(path)
    }

    /// Fill in a credential if `config` has none, and return the
    /// credential in effect afterwards.
    pub fn resolve(&self, config: &mut ClientConfig) -> Option<Credential> {
        if config.organization.is_none() {
            config.organization = self.organization.clone();
        }
        if let Some(base) = &self.api_base {
            if config.api_base == DEFAULT_API_BASE {
                config.api_base = base.clone();
            }
        }

        if config.has_credential() {
            return config.credential();
        }

        let found = if let Some(key) = &self.api_key {
            debug!(source = API_KEY_ENV, "using API key from environment");
            Some(Credential::Key(key.clone()))
        } else if let Some(path) = &self.api_key_path {
            debug!(source = API_KEY_PATH_ENV, path = %path.display(), "using API key file");
            Some(Credential::KeyPath(path.clone()))
        } else if let Some(path) = self.default_key_file() {
            debug!(path = %path.display(), "using default API key file");
            Some(Credential::KeyPath(path))
        } else {
            debug!("no API key configured");
            None
        };

        if let Some(credential) = &found {
            config.apply(credential.clone());
        }
        found
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
