//! Budget notifications raised by the evaluator.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub severity: AlertSeverity,
    pub message: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

impl Alert {
    pub fn new(
        id: impl Into<String>,
        severity: AlertSeverity,
        message: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            date,
            is_read: false,
        }
    }
}

impl Identifiable for Alert {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Alert {
    fn display_label(&self) -> String {
        format!("[{}] {}", self.severity, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Danger,
    Info,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertSeverity::Warning => "warning",
            AlertSeverity::Danger => "danger",
            AlertSeverity::Info => "info",
        };
        f.write_str(label)
    }
}
