/// Settings with dedicated storage and setter behaviour. Every other
/// name is a free-form session variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    ApiKey,
    ApiKeyPath,
    Organization,
    UseHistory,
    History,
    Mode,
}

const SETTINGS: &[(&str, Setting)] = &[
    ("api_key", Setting::ApiKey),
    ("api_key_path", Setting::ApiKeyPath),
    ("organization", Setting::Organization),
    ("use_history", Setting::UseHistory),
    ("history", Setting::History),
    ("mode", Setting::Mode),
];

impl Setting {
    /// Case-sensitive lookup by name.
    pub fn lookup(name: &str) -> Option<Self> {
        SETTINGS
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, setting)| *setting)
    }

    pub fn name(&self) -> &'static str {
        SETTINGS
            .iter()
            .find(|(_, setting)| setting == self)
            .map(|(key, _)| *key)
            .unwrap_or_default()
    }

    pub fn all() -> impl Iterator<Item = Setting> {
        SETTINGS.iter().map(|(_, setting)| *setting)
    }
}
