//! Month-scoped budget checks that turn spending into alert records.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use spendsmart_domain::{
    format_amount, Alert, AlertSeverity, Budget, Category, Expense, YearMonth,
};

/// Where a budget stands relative to its limit and alert threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetStatus {
    /// Spending is below the alert threshold.
    OnTrack { percent_used: Option<f64> },
    /// Spending reached the alert threshold without exceeding the limit.
    NearLimit { percent_used: f64 },
    /// Spending is strictly above the limit.
    OverLimit { overage: f64 },
}

impl BudgetStatus {
    /// Classifies `spent` against a limit and threshold.
    ///
    /// A zero limit never yields a percentage: any spend is over the limit,
    /// no spend is on track.
    pub fn assess(limit: f64, alert_threshold: f64, spent: f64) -> Self {
        if spent > limit {
            return BudgetStatus::OverLimit {
                overage: spent - limit,
            };
        }
        if limit <= 0.0 {
            return BudgetStatus::OnTrack { percent_used: None };
        }
        let percent_used = spent / limit * 100.0;
        if percent_used >= alert_threshold {
            BudgetStatus::NearLimit { percent_used }
        } else {
            BudgetStatus::OnTrack {
                percent_used: Some(percent_used),
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack { .. } => "On track",
            BudgetStatus::NearLimit { .. } => "Near limit",
            BudgetStatus::OverLimit { .. } => "Over budget",
        }
    }
}

/// Stateless evaluator comparing month-to-date spending with budgets.
pub struct BudgetEvaluator;

impl BudgetEvaluator {
    /// Produces alert candidates for every budget of the month containing `now`.
    pub fn evaluate(expenses: &[Expense], budgets: &[Budget], now: DateTime<Utc>) -> Vec<Alert> {
        let month = YearMonth::from(now);
        let spent = Self::spent_by_category(expenses, month);
        let alerts: Vec<Alert> = budgets
            .iter()
            .filter(|budget| budget.month == month)
            .filter_map(|budget| {
                let spent = spent.get(&budget.category).copied().unwrap_or(0.0);
                Self::alert_for(budget, spent, now)
            })
            .collect();
        tracing::debug!(
            month = %month,
            budgets = budgets.len(),
            candidates = alerts.len(),
            "evaluated budgets"
        );
        alerts
    }

    /// Sums expense amounts per category for the given month.
    pub fn spent_by_category(expenses: &[Expense], month: YearMonth) -> HashMap<Category, f64> {
        let mut totals: HashMap<Category, f64> = HashMap::new();
        for expense in expenses.iter().filter(|e| month.contains(e.date)) {
            *totals.entry(expense.category).or_insert(0.0) += expense.amount;
        }
        totals
    }

    fn alert_for(budget: &Budget, spent: f64, now: DateTime<Utc>) -> Option<Alert> {
        let stamp = now.timestamp_millis();
        match BudgetStatus::assess(budget.limit, budget.alert_threshold, spent) {
            BudgetStatus::OverLimit { .. } => Some(Alert::new(
                format!("over-{}-{}", budget.id, stamp),
                AlertSeverity::Danger,
                over_budget_message(budget, spent),
                now,
            )),
            BudgetStatus::NearLimit { percent_used } => Some(Alert::new(
                format!("warn-{}-{}", budget.id, stamp),
                AlertSeverity::Warning,
                near_limit_message(budget, spent, percent_used),
                now,
            )),
            BudgetStatus::OnTrack { .. } => None,
        }
    }
}

fn over_budget_message(budget: &Budget, spent: f64) -> String {
    format!(
        "Over Budget: You've spent ${} on {}, exceeding your limit of ${}.",
        format_amount(spent),
        budget.category,
        format_amount(budget.limit)
    )
}

fn near_limit_message(budget: &Budget, spent: f64, percent_used: f64) -> String {
    format!(
        "Budget Alert: Only {:.1}% remaining for {}. Used ${} of ${}.",
        100.0 - percent_used,
        budget.category,
        format_amount(spent),
        format_amount(budget.limit)
    )
}

/// Prepends candidates whose message is not already live and returns the ones added.
///
/// Deduplication is by exact message text, so an alert whose numbers changed
/// is added next to the older one rather than replacing it. An added alert whose
/// id is already taken gets a `-2`, `-3`, ... suffix so every live id is unique.
pub fn merge_alerts(existing: &mut Vec<Alert>, candidates: Vec<Alert>) -> Vec<Alert> {
    let mut seen: HashSet<String> = existing.iter().map(|a| a.message.clone()).collect();
    let mut taken: HashSet<String> = existing.iter().map(|a| a.id.clone()).collect();
    let fresh: Vec<Alert> = candidates
        .into_iter()
        .filter(|alert| seen.insert(alert.message.clone()))
        .map(|mut alert| {
            alert.id = unique_id(&alert.id, &taken);
            taken.insert(alert.id.clone());
            alert
        })
        .collect();
    if fresh.is_empty() {
        return fresh;
    }
    existing.splice(0..0, fresh.iter().cloned());
    fresh
}

fn unique_id(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
