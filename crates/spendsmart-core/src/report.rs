//! Aggregations behind the dashboard and report views.

use spendsmart_domain::{Budget, Category, Expense, YearMonth};

use crate::evaluator::{BudgetEvaluator, BudgetStatus};

/// Month-level totals across every category.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub month: YearMonth,
    pub total_spent: f64,
    pub total_budget: f64,
    pub expense_count: usize,
    /// Share of the combined budget already spent; zero when nothing is budgeted.
    pub percent_spent: f64,
    pub over_budget: bool,
    /// Absolute distance between budget and spend.
    pub difference: f64,
}

/// Spend and limit for one category in one month.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryReport {
    pub category: Category,
    pub spent: f64,
    pub budget: Option<f64>,
    pub status: Option<BudgetStatus>,
}

/// A category's portion of the month's spending.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingShare {
    pub category: Category,
    pub spent: f64,
    pub share_percent: f64,
}

pub struct ReportService;

impl ReportService {
    pub fn month_summary(expenses: &[Expense], budgets: &[Budget], month: YearMonth) -> MonthSummary {
        let in_month: Vec<&Expense> = expenses.iter().filter(|e| month.contains(e.date)).collect();
        let total_spent: f64 = in_month.iter().map(|e| e.amount).sum();
        let total_budget: f64 = budgets
            .iter()
            .filter(|b| b.month == month)
            .map(|b| b.limit)
            .sum();
        let percent_spent = if total_budget > 0.0 {
            total_spent / total_budget * 100.0
        } else {
            0.0
        };
        MonthSummary {
            month,
            total_spent,
            total_budget,
            expense_count: in_month.len(),
            percent_spent,
            over_budget: total_spent > total_budget,
            difference: (total_budget - total_spent).abs(),
        }
    }

    /// Lists categories with spending or a budget in `month`, in canonical order.
    pub fn category_breakdown(
        expenses: &[Expense],
        budgets: &[Budget],
        month: YearMonth,
    ) -> Vec<CategoryReport> {
        let spent = BudgetEvaluator::spent_by_category(expenses, month);
        Category::ALL
            .iter()
            .filter_map(|category| {
                let budget = budgets.iter().find(|b| b.matches(*category, month));
                let amount = spent.get(category).copied();
                if budget.is_none() && amount.is_none() {
                    return None;
                }
                let amount = amount.unwrap_or(0.0);
                Some(CategoryReport {
                    category: *category,
                    spent: amount,
                    budget: budget.map(|b| b.limit),
                    status: budget.map(|b| BudgetStatus::assess(b.limit, b.alert_threshold, amount)),
                })
            })
            .collect()
    }

    /// Categories with positive spend and their share of the month's total.
    pub fn spending_shares(expenses: &[Expense], month: YearMonth) -> Vec<SpendingShare> {
        let spent = BudgetEvaluator::spent_by_category(expenses, month);
        let total: f64 = spent.values().sum();
        Category::ALL
            .iter()
            .filter_map(|category| {
                let amount = spent.get(category).copied().unwrap_or(0.0);
                (amount > 0.0).then(|| SpendingShare {
                    category: *category,
                    spent: amount,
                    share_percent: amount / total * 100.0,
                })
            })
            .collect()
    }
}
