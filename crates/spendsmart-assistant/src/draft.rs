use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use spendsmart_domain::{Category, NewExpense};

use crate::AssistantError;

/// Expense fields recognised in free text. Any of them may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseDraft {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct RawDraft {
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl ExpenseDraft {
    /// Schema handed to the model in JSON response mode.
    pub fn schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "amount": {"type": "NUMBER"},
                "category": {"type": "STRING"},
                "description": {"type": "STRING"},
                "date": {"type": "STRING"}
            },
            "required": ["amount", "category", "description"]
        })
    }

    /// Reads model output, dropping values that do not fit the domain.
    pub fn from_json(raw: &str) -> Result<Self, AssistantError> {
        let parsed: RawDraft = serde_json::from_str(raw.trim())
            .map_err(|err| AssistantError::InvalidResponse(err.to_string()))?;
        Ok(Self {
            amount: parsed.amount.filter(|amount| amount.is_finite() && *amount >= 0.0),
            category: parsed.category.and_then(|name| name.parse().ok()),
            description: parsed
                .description
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            date: parsed
                .date
                .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()),
        })
    }

    /// Completes the draft: date defaults to `today`, category to the default one.
    pub fn into_new_expense(self, today: NaiveDate) -> Result<NewExpense, AssistantError> {
        let amount = self.amount.ok_or(AssistantError::IncompleteDraft("amount"))?;
        let description = self
            .description
            .ok_or(AssistantError::IncompleteDraft("description"))?;
        Ok(NewExpense::new(
            self.date.unwrap_or(today),
            amount,
            self.category.unwrap_or_default(),
            description,
        ))
    }
}
