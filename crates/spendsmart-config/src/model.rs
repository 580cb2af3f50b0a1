use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Keys accepted by [`Config::set_value`], in display order.
pub const CONFIG_KEYS: &[&str] = &[
    "currency",
    "locale",
    "default_alert_threshold",
    "seed_sample_data",
    "ui_color_enabled",
    "data_dir",
    "assistant.endpoint",
    "assistant.model",
    "assistant.api_key_env",
    "assistant.timeout_secs",
    "assistant.insight_window",
    "assistant.chat_context_limit",
];

/// Stores user-configurable preferences for the shell and assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    /// Threshold used by `set-budget` when none is given.
    #[serde(default = "Config::default_alert_threshold")]
    pub default_alert_threshold: f64,
    /// Populate demo expenses and budgets on the first run.
    #[serde(default = "Config::default_true")]
    pub seed_sample_data: bool,
    #[serde(default = "Config::default_true")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_friends")]
    pub friends: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional directory for the expense and budget files. Defaults to `{home}/data`.
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub assistant: AssistantSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            locale: Self::default_locale(),
            default_alert_threshold: Self::default_alert_threshold(),
            seed_sample_data: true,
            ui_color_enabled: true,
            friends: Self::default_friends(),
            data_dir: None,
            assistant: AssistantSettings::default(),
        }
    }
}

impl Config {
    fn default_currency() -> String {
        "USD".into()
    }

    fn default_locale() -> String {
        "en-US".into()
    }

    fn default_alert_threshold() -> f64 {
        80.0
    }

    fn default_true() -> bool {
        true
    }

    fn default_friends() -> Vec<String> {
        vec!["Alice".into(), "Bob".into()]
    }

    pub fn resolve_data_dir(&self, home: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => home.join("data"),
        }
    }

    /// Renders the value behind `key` the way `set_value` accepts it.
    pub fn value(&self, key: &str) -> Result<String, ConfigError> {
        let assistant = &self.assistant;
        let value = match key {
            "currency" => self.currency.clone(),
            "locale" => self.locale.clone(),
            "default_alert_threshold" => self.default_alert_threshold.to_string(),
            "seed_sample_data" => self.seed_sample_data.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "data_dir" => self
                .data_dir
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(default)".into()),
            "assistant.endpoint" => assistant.endpoint.clone(),
            "assistant.model" => assistant.model.clone(),
            "assistant.api_key_env" => assistant.api_key_env.clone(),
            "assistant.timeout_secs" => assistant.timeout_secs.to_string(),
            "assistant.insight_window" => assistant.insight_window.to_string(),
            "assistant.chat_context_limit" => assistant.chat_context_limit.to_string(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let raw = raw.trim();
        match key {
            "currency" => self.currency = non_empty(key, raw)?.to_ascii_uppercase(),
            "locale" => self.locale = non_empty(key, raw)?.to_string(),
            "default_alert_threshold" => {
                let value: f64 = parse(key, raw)?;
                if !(1.0..=100.0).contains(&value) {
                    return Err(invalid(key, "expected a percentage between 1 and 100"));
                }
                self.default_alert_threshold = value;
            }
            "seed_sample_data" => self.seed_sample_data = parse_flag(key, raw)?,
            "ui_color_enabled" => self.ui_color_enabled = parse_flag(key, raw)?,
            "data_dir" => {
                self.data_dir = match raw {
                    "" | "default" => None,
                    path => Some(PathBuf::from(path)),
                }
            }
            "assistant.endpoint" => {
                self.assistant.endpoint = non_empty(key, raw)?.trim_end_matches('/').to_string()
            }
            "assistant.model" => self.assistant.model = non_empty(key, raw)?.to_string(),
            "assistant.api_key_env" => {
                self.assistant.api_key_env = non_empty(key, raw)?.to_string()
            }
            "assistant.timeout_secs" => self.assistant.timeout_secs = positive(key, raw)?,
            "assistant.insight_window" => {
                self.assistant.insight_window = positive::<u64>(key, raw)? as usize
            }
            "assistant.chat_context_limit" => {
                self.assistant.chat_context_limit = positive::<u64>(key, raw)? as usize
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Connection and prompt sizing for the generative-language service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key. The key itself is never stored.
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Number of most recent expenses sent for insights.
    pub insight_window: usize,
    /// Number of expenses included in chat context.
    pub chat_context_limit: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-2.5-flash".into(),
            api_key_env: "API_KEY".into(),
            timeout_secs: 30,
            insight_window: 50,
            chat_context_limit: 100,
        }
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty<'a>(key: &str, raw: &'a str) -> Result<&'a str, ConfigError> {
    if raw.is_empty() {
        Err(invalid(key, "value cannot be empty"))
    } else {
        Ok(raw)
    }
}

fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse()
        .map_err(|_| invalid(key, &format!("cannot parse `{raw}`")))
}

fn positive<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let value: T = parse(key, raw)?;
    if value <= T::default() {
        return Err(invalid(key, "expected a positive number"));
    }
    Ok(value)
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(invalid(key, "expected on/off")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"currency":"EUR"}"#).unwrap();
        assert_eq!(cfg.currency, "EUR");
        assert_eq!(cfg.locale, "en-US");
        assert!(cfg.seed_sample_data);
        assert_eq!(cfg.assistant.model, "gemini-2.5-flash");
        assert_eq!(cfg.friends, vec!["Alice", "Bob"]);
    }

    #[test]
    fn set_value_validates_input() {
        let mut cfg = Config::default();
        cfg.set_value("seed_sample_data", "off").unwrap();
        cfg.set_value("assistant.insight_window", "20").unwrap();
        assert!(!cfg.seed_sample_data);
        assert_eq!(cfg.assistant.insight_window, 20);

        assert!(matches!(
            cfg.set_value("default_alert_threshold", "150"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set_value("assistant.timeout_secs", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set_value("theme", "dark"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn every_listed_key_is_readable() {
        let cfg = Config::default();
        for key in CONFIG_KEYS {
            assert!(cfg.value(key).is_ok(), "key {key}");
        }
    }
}
