//! The single in-memory source of truth for expenses, budgets, and alerts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use spendsmart_domain::{Alert, Budget, Category, Expense, NewExpense, YearMonth};

use crate::{
    evaluator::{merge_alerts, BudgetEvaluator},
    sample,
    storage::{FinanceStorage, BUDGETS_KEY, EXPENSES_KEY},
    Clock, CoreError,
};

/// Startup behaviour for [`FinanceState::load`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Populate demo data for collections that have never been stored.
    pub seed_sample_data: bool,
}

/// Outcome of a mutation: the operation's value plus its side effects.
#[derive(Debug, Clone)]
pub struct Mutation<T> {
    pub value: T,
    /// Alerts newly added by the re-evaluation that followed the mutation.
    pub raised_alerts: Vec<Alert>,
    /// `false` when writing the collection failed; the in-memory change still stands.
    pub persisted: bool,
}

/// What was found in storage for one collection.
enum Stored<T> {
    Present(Vec<T>),
    Absent,
    Corrupt,
}

/// Owns the finance collections and keeps storage and alerts in step with them.
pub struct FinanceState {
    expenses: Vec<Expense>,
    budgets: Vec<Budget>,
    alerts: Vec<Alert>,
    storage: Box<dyn FinanceStorage>,
    clock: Arc<dyn Clock>,
}

impl FinanceState {
    /// Reads both collections and runs an initial evaluation.
    ///
    /// Unparseable entries are quarantined and replaced with an empty list.
    pub fn load(
        storage: Box<dyn FinanceStorage>,
        clock: Arc<dyn Clock>,
        options: LoadOptions,
    ) -> Result<Self, CoreError> {
        let today = clock.today();
        let current = YearMonth::from(today);

        let (expenses, seeded_expenses) =
            match read_collection::<Expense>(storage.as_ref(), EXPENSES_KEY)? {
                Stored::Present(items) => (items, false),
                Stored::Absent if options.seed_sample_data => {
                    (sample::sample_expenses(current), true)
                }
                Stored::Absent | Stored::Corrupt => (Vec::new(), false),
            };
        let (budgets, seeded_budgets) =
            match read_collection::<Budget>(storage.as_ref(), BUDGETS_KEY)? {
                Stored::Present(items) => (items, false),
                Stored::Absent if options.seed_sample_data => {
                    (sample::sample_budgets(current), true)
                }
                Stored::Absent | Stored::Corrupt => (Vec::new(), false),
            };

        let mut state = Self {
            expenses,
            budgets,
            alerts: Vec::new(),
            storage,
            clock,
        };
        if seeded_expenses {
            state.persist(EXPENSES_KEY, &state.expenses);
        }
        if seeded_budgets {
            state.persist(BUDGETS_KEY, &state.budgets);
        }
        state.reevaluate();
        tracing::info!(
            expenses = state.expenses.len(),
            budgets = state.budgets.len(),
            alerts = state.alerts.len(),
            "finance state loaded"
        );
        Ok(state)
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn current_month(&self) -> YearMonth {
        YearMonth::from(self.clock.now())
    }

    pub fn expense(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    /// Records a new expense at the front of the list.
    pub fn add_expense(&mut self, data: NewExpense) -> Result<Mutation<Expense>, CoreError> {
        validate_new_expense(&data)?;
        let expense = Expense::from_new(data);
        self.expenses.insert(0, expense.clone());
        tracing::info!(id = %expense.id, category = %expense.category, "expense added");
        let persisted = self.persist(EXPENSES_KEY, &self.expenses);
        let raised_alerts = self.reevaluate();
        Ok(Mutation {
            value: expense,
            raised_alerts,
            persisted,
        })
    }

    /// Removes the expense with `id`. Returns `false` in `value` when nothing matched.
    pub fn delete_expense(&mut self, id: &str) -> Mutation<bool> {
        let before = self.expenses.len();
        self.expenses.retain(|expense| expense.id != id);
        let removed = self.expenses.len() != before;
        if removed {
            tracing::info!(id, "expense deleted");
        } else {
            tracing::debug!(id, "delete requested for unknown expense");
        }
        let persisted = self.persist(EXPENSES_KEY, &self.expenses);
        let raised_alerts = self.reevaluate();
        Mutation {
            value: removed,
            raised_alerts,
            persisted,
        }
    }

    /// Inserts or replaces the budget for the budget's (category, month).
    ///
    /// Returns `true` in `value` when an existing budget was replaced.
    pub fn set_budget(&mut self, budget: Budget) -> Result<Mutation<bool>, CoreError> {
        validate_budget(&budget)?;
        let slot = self
            .budgets
            .iter()
            .position(|existing| existing.matches(budget.category, budget.month));
        let replaced = match slot {
            Some(index) => {
                self.budgets[index] = budget.clone();
                true
            }
            None => {
                self.budgets.push(budget.clone());
                false
            }
        };
        tracing::info!(
            category = %budget.category,
            month = %budget.month,
            limit = budget.limit,
            replaced,
            "budget set"
        );
        let persisted = self.persist(BUDGETS_KEY, &self.budgets);
        let raised_alerts = self.reevaluate();
        Ok(Mutation {
            value: replaced,
            raised_alerts,
            persisted,
        })
    }

    /// Drops the alert from the in-memory list. Alerts are never persisted.
    pub fn dismiss_alert(&mut self, id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|alert| alert.id != id);
        self.alerts.len() != before
    }

    pub fn get_budget_for_category(&self, category: Category, month: YearMonth) -> Option<&Budget> {
        self.budgets
            .iter()
            .find(|budget| budget.matches(category, month))
    }

    /// Re-runs the evaluator against the current clock and merges new alerts.
    pub fn reevaluate(&mut self) -> Vec<Alert> {
        let candidates = BudgetEvaluator::evaluate(&self.expenses, &self.budgets, self.clock.now());
        let raised = merge_alerts(&mut self.alerts, candidates);
        for alert in &raised {
            tracing::info!(id = %alert.id, severity = %alert.severity, "alert raised");
        }
        raised
    }

    fn persist<T: Serialize>(&self, key: &str, items: &[T]) -> bool {
        let result = serde_json::to_string(items)
            .map_err(CoreError::from)
            .and_then(|json| self.storage.write_entry(key, &json));
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(key, error = %err, "failed to persist collection");
                false
            }
        }
    }
}

fn read_collection<T: DeserializeOwned>(
    storage: &dyn FinanceStorage,
    key: &str,
) -> Result<Stored<T>, CoreError> {
    let Some(raw) = storage.read_entry(key)? else {
        return Ok(Stored::Absent);
    };
    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => Ok(Stored::Present(items)),
        Err(err) => {
            tracing::warn!(key, error = %err, "stored collection is unreadable; starting empty");
            match storage.quarantine_entry(key, &raw) {
                Ok(kept_as) => tracing::warn!(key, %kept_as, "unreadable collection kept aside"),
                Err(err) => {
                    tracing::error!(key, error = %err, "failed to quarantine unreadable collection")
                }
            }
            Ok(Stored::Corrupt)
        }
    }
}

fn validate_new_expense(data: &NewExpense) -> Result<(), CoreError> {
    if !data.amount.is_finite() || data.amount < 0.0 {
        return Err(CoreError::Validation(
            "amount must be a non-negative number".into(),
        ));
    }
    if data.description.trim().is_empty() {
        return Err(CoreError::Validation("description is required".into()));
    }
    Ok(())
}

fn validate_budget(budget: &Budget) -> Result<(), CoreError> {
    if !budget.limit.is_finite() || budget.limit < 0.0 {
        return Err(CoreError::Validation(
            "budget limit must be a non-negative number".into(),
        ));
    }
    if !budget.alert_threshold.is_finite() || !(1.0..=100.0).contains(&budget.alert_threshold) {
        return Err(CoreError::Validation(
            "alert threshold must be between 1 and 100".into(),
        ));
    }
    Ok(())
}
