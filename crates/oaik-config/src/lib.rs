//! Configuration for the oaik session shim.
//!
//! An optional TOML file seeds the session defaults (model, sampling
//! temperature, system prompt, image settings) and the API client
//! settings. Every field has a serde default, so partial files work.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! let config = oaik_config::load_config().expect("failed to load config");
//! println!("model: {}", config.session.model);
//! ```

pub mod schema;
pub mod toml_loader;

pub use schema::{ApiConfig, OaikConfig, SessionDefaults, DEFAULT_API_BASE};

use oaik_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it if missing.
pub fn load_config() -> Result<OaikConfig, ConfigError> {
    toml_loader::load_default()
}

/// Load config from an explicit path. A missing file is an error here.
pub fn load_config_from(path: &Path) -> Result<OaikConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    toml_loader::load_from_path(path)
}
