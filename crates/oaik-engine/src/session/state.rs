//! SessionState struct: settings, history, and first-class setters.

use std::path::PathBuf;

use oaik_config::OaikConfig;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::credential::CredentialSources;
use crate::error::SessionError;
use crate::literal::truthy;
use crate::openai::ClientConfig;
use crate::Message;

use super::mode::Mode;
use super::setting::Setting;

/// Everything one session remembers between cells.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Free-form settings: system_prompt, model, temperature, chat_kwargs,
    /// size, n, and anything set with `%set`.
    variables: Map<String, Value>,
    /// Stored user/assistant exchanges, oldest first.
    history: Vec<Message>,
    mode: Mode,
    use_history: bool,
    client: ClientConfig,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&OaikConfig::default(), &CredentialSources::default())
    }
}

impl SessionState {
    /// Seed a session from the config file, then resolve a credential
    /// from `sources` if the config supplied none.
    pub fn new(config: &OaikConfig, sources: &CredentialSources) -> Self {
        let defaults = &config.session;
        let mut variables = Map::new();
        let system_prompt = if defaults.system_prompt.is_empty() {
            Value::Null
        } else {
            Value::String(defaults.system_prompt.clone())
        };
        variables.insert("system_prompt".into(), system_prompt);
        variables.insert("model".into(), Value::String(defaults.model.clone()));
        variables.insert("temperature".into(), number(defaults.temperature));
        variables.insert(
            "chat_kwargs".into(),
            Value::Object(defaults.chat_kwargs.clone()),
        );
        variables.insert("size".into(), Value::String(defaults.size.clone()));
        variables.insert("n".into(), Value::from(defaults.n));

        let mut client = ClientConfig::from_config(&config.api);
        sources.resolve(&mut client);

        let mut state = Self {
            variables,
            history: Vec::new(),
            mode: Mode::default(),
            use_history: defaults.use_history,
            client,
        };
        state.set_mode(&defaults.mode);
        state
    }

    /// Read a setting by name. First-class settings come first, then
    /// session variables; unknown names read as `Null`.
    pub fn get(&self, name: &str) -> Value {
        match Setting::lookup(name) {
            Some(Setting::ApiKey) => optional_string(self.client.api_key()),
            Some(Setting::ApiKeyPath) => self
                .client
                .api_key_path()
                .map(|p| Value::String(p.display().to_string()))
                .unwrap_or(Value::Null),
            Some(Setting::Organization) => optional_string(self.client.organization.as_deref()),
            Some(Setting::UseHistory) => Value::Bool(self.use_history),
            Some(Setting::History) => Value::Array(
                self.effective_history()
                    .iter()
                    .map(Message::to_value)
                    .collect(),
            ),
            Some(Setting::Mode) => Value::String(self.mode.as_str().to_string()),
            None => self.variables.get(name).cloned().unwrap_or(Value::Null),
        }
    }

    /// Write a setting by name. Reserved names go through their
    /// setters; anything else is stored verbatim.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), SessionError> {
        match Setting::lookup(name) {
            Some(Setting::ApiKey) => self.set_api_key(value_to_string(value)),
            Some(Setting::ApiKeyPath) => {
                self.set_api_key_path(value_to_string(value).map(PathBuf::from))
            }
            Some(Setting::Organization) => self.set_organization(value_to_string(value)),
            Some(Setting::UseHistory) => self.set_use_history(truthy(&value)),
            Some(Setting::History) => {
                let history: Vec<Message> = serde_json::from_value(value)
                    .map_err(|e| SessionError::InvalidHistory(e.to_string()))?;
                self.replace_history(history);
            }
            Some(Setting::Mode) => match value {
                Value::String(mode) => self.set_mode(&mode),
                other => warn!(value = %other, "ignoring non-string mode"),
            },
            None => {
                debug!(name, "set session variable");
                self.variables.insert(name.to_string(), value);
            }
        }
        Ok(())
    }

    /// A session variable, without first-class lookup.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// The configured system prompt, if set and non-empty.
    pub fn system_prompt(&self) -> Option<&str> {
        self.variables
            .get("system_prompt")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The message list sent ahead of a new user message: the system
    /// message (if any), then stored history when `use_history` is on.
    pub fn effective_history(&self) -> Vec<Message> {
        let mut msgs = Vec::new();
        if let Some(system) = self.system_prompt() {
            msgs.push(Message::system(system));
        }
        if self.use_history {
            msgs.extend(self.history.iter().cloned());
        }
        msgs
    }

    /// Stored history, without the system message.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Record one completed exchange.
    pub fn append_exchange(&mut self, user: Message, assistant: Message) {
        self.history.reserve(2);
        self.history.push(user);
        self.history.push(assistant);
    }

    pub fn replace_history(&mut self, history: Vec<Message>) {
        debug!(len = history.len(), "history replaced");
        self.history = history;
    }

    /// Drop stored history. Settings and mode are untouched.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode. Unrecognised values leave the mode unchanged.
    pub fn set_mode(&mut self, value: &str) {
        match value.parse::<Mode>() {
            Ok(mode) => {
                if mode != self.mode {
                    info!(mode = %mode, "mode changed");
                }
                self.mode = mode;
            }
            Err(e) => warn!("ignoring mode change: {e}"),
        }
    }

    pub fn use_history(&self) -> bool {
        self.use_history
    }

    pub fn set_use_history(&mut self, enabled: bool) {
        self.use_history = enabled;
    }

    pub fn client(&self) -> &ClientConfig {
        &self.client
    }

    pub fn set_api_key(&mut self, key: Option<String>) {
        self.client.set_api_key(key);
    }

    pub fn set_api_key_path(&mut self, path: Option<PathBuf>) {
        self.client.set_api_key_path(path);
    }

    pub fn set_organization(&mut self, organization: Option<String>) {
        self.client.organization = organization;
    }
}

fn number(value: f64) -> Value {
    // Whole numbers stay integers so `temperature = 1` is sent as `1`.
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn optional_string(value: Option<&str>) -> Value {
    value
        .map(|s| Value::String(s.to_string()))
        .unwrap_or(Value::Null)
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
