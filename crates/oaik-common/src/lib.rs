pub mod errors;
pub mod id;

pub use errors::{ConfigError, OaikError};
pub use id::{new_correlation_id, SessionId};
