use spendsmart_domain::{Category, Expense};

/// Description search plus optional category restriction, as used by expense listings.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub search: Option<String>,
    pub category: Option<Category>,
}

impl ExpenseFilter {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        let matches_search = match &self.search {
            Some(term) => expense
                .description
                .to_lowercase()
                .contains(&term.to_lowercase()),
            None => true,
        };
        let matches_category = self.category.map_or(true, |c| expense.category == c);
        matches_search && matches_category
    }

    /// Returns the matching expenses in their original order.
    pub fn apply<'a>(&self, expenses: &'a [Expense]) -> Vec<&'a Expense> {
        expenses.iter().filter(|e| self.matches(e)).collect()
    }
}
