//! Monthly spending limits per category.

use serde::{Deserialize, Serialize};

use crate::{category::Category, common::*};

/// Threshold applied when a persisted budget predates the field.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 80.0;

/// A spending guardrail for one category in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: Category,
    pub month: YearMonth,
    pub limit: f64,
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,
}

fn default_alert_threshold() -> f64 {
    DEFAULT_ALERT_THRESHOLD
}

impl Budget {
    pub fn new(category: Category, month: YearMonth, limit: f64, alert_threshold: f64) -> Self {
        Self {
            id: format!("{category}-{month}"),
            category,
            month,
            limit,
            alert_threshold,
        }
    }

    /// Returns `true` when this budget occupies the given (category, month) slot.
    pub fn matches(&self, category: Category, month: YearMonth) -> bool {
        self.category == category && self.month == month
    }
}

impl Identifiable for Budget {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Budget {
    fn display_label(&self) -> String {
        format!(
            "{} {}: ${} (alert at {}%)",
            self.category,
            self.month,
            format_amount(self.limit),
            format_amount(self.alert_threshold)
        )
    }
}
