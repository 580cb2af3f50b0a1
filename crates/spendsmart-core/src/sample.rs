//! Demonstration data used when a store is opened for the first time.

use spendsmart_domain::{Budget, Category, Expense, YearMonth};

pub fn sample_budgets(month: YearMonth) -> Vec<Budget> {
    [
        ("b1", Category::Food, 600.0, 80.0),
        ("b2", Category::Transport, 300.0, 90.0),
        ("b3", Category::Entertainment, 200.0, 75.0),
        ("b4", Category::Housing, 1500.0, 90.0),
        ("b5", Category::Utilities, 250.0, 85.0),
        ("b6", Category::Shopping, 150.0, 80.0),
    ]
    .into_iter()
    .map(|(id, category, limit, alert_threshold)| Budget {
        id: id.into(),
        category,
        month,
        limit,
        alert_threshold,
    })
    .collect()
}

pub fn sample_expenses(month: YearMonth) -> Vec<Expense> {
    [
        ("e1", 2, 1200.0, Category::Housing, "Monthly Rent"),
        ("e2", 5, 85.50, Category::Food, "Grocery Haul"),
        ("e3", 6, 45.00, Category::Transport, "Weekly Gas"),
        ("e4", 8, 120.00, Category::Utilities, "Electric Bill"),
        ("e5", 10, 25.00, Category::Entertainment, "Cinema"),
        ("e6", 12, 15.90, Category::Food, "Lunch"),
        ("e7", 15, 210.00, Category::Transport, "Car Service"),
        ("e8", 18, 160.00, Category::Entertainment, "Concert Tickets"),
        ("e9", 20, 350.00, Category::Food, "Fancy Dinner & Drinks"),
        ("e10", 22, 180.00, Category::Shopping, "New Shoes"),
    ]
    .into_iter()
    .map(|(id, day, amount, category, description)| Expense {
        id: id.into(),
        date: month.day(day),
        amount,
        category,
        description: description.into(),
        split_group_id: None,
    })
    .collect()
}
