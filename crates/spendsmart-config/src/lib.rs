//! spendsmart-config
//!
//! User preferences for the SpendSmart shell and assistant, plus their
//! on-disk persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{AssistantSettings, Config, CONFIG_KEYS};
