//! The closed set of expense classifications.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Expense category. Variants are listed in canonical display order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    #[default]
    Food,
    Transport,
    Entertainment,
    Housing,
    Utilities,
    Health,
    Shopping,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Housing,
        Category::Utilities,
        Category::Health,
        Category::Shopping,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Health => "Health",
            Category::Shopping => "Shopping",
            Category::Other => "Other",
        }
    }

    /// Comma separated list of every category name.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::UnknownCategory(needle.to_string()))
    }
}
