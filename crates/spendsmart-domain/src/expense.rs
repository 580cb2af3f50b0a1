//! Recorded spending entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{category::Category, common::*};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_group_id: Option<String>,
}

impl Expense {
    /// Materializes a new expense with a freshly generated identifier.
    pub fn from_new(data: NewExpense) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: data.date,
            amount: data.amount,
            category: data.category,
            description: data.description,
            split_group_id: data.split_group_id,
        }
    }
}

impl Identifiable for Expense {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!(
            "{}: {} (${}) - {}",
            self.date,
            self.description,
            format_amount(self.amount),
            self.category
        )
    }
}

/// Expense payload supplied by callers before an identifier is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub split_group_id: Option<String>,
}

impl NewExpense {
    pub fn new(
        date: NaiveDate,
        amount: f64,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            category,
            description: description.into(),
            split_group_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_shape_uses_camel_case_and_iso_dates() {
        let mut expense = Expense::from_new(NewExpense::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            85.0,
            Category::Food,
            "Groceries",
        ));
        expense.split_group_id = Some("trip".into());
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["category"], "Food");
        assert_eq!(json["splitGroupId"], "trip");
    }

    #[test]
    fn legacy_entries_without_optional_fields_load() {
        let raw = r#"{"id":"e1","date":"2024-05-02","amount":12.5,"category":"Transport"}"#;
        let expense: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(expense.description, "");
        assert!(expense.split_group_id.is_none());
    }
}
