//! Per-session state: settings, conversation history, mode, and the
//! API client settings.

mod mode;
mod setting;
mod state;

#[cfg(test)]
mod tests;

pub use mode::Mode;
pub use setting::Setting;
pub use state::SessionState;
