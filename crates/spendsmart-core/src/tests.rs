use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use spendsmart_domain::{AlertSeverity, Budget, Category, Expense, NewExpense, YearMonth};

use crate::{
    merge_alerts, BudgetEvaluator, BudgetStatus, Clock, CoreError, ExpenseFilter, FinanceState,
    FinanceStorage, FixedClock, LoadOptions, MemoryStorage, ReportService, BUDGETS_KEY,
    EXPENSES_KEY,
};

fn may(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

fn may_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at_date(may(15)))
}

fn month(raw: &str) -> YearMonth {
    raw.parse().unwrap()
}

fn expense(id: &str, date: NaiveDate, amount: f64, category: Category) -> Expense {
    Expense {
        id: id.into(),
        date,
        amount,
        category,
        description: format!("expense {id}"),
        split_group_id: None,
    }
}

fn food_budget() -> Budget {
    Budget::new(Category::Food, month("2024-05"), 100.0, 80.0)
}

fn empty_state(clock: Arc<FixedClock>) -> FinanceState {
    FinanceState::load(Box::new(MemoryStorage::new()), clock, LoadOptions::default())
        .expect("load state")
}

struct FailingStorage;

impl FinanceStorage for FailingStorage {
    fn read_entry(&self, _key: &str) -> Result<Option<String>, CoreError> {
        Ok(None)
    }

    fn write_entry(&self, key: &str, _value: &str) -> Result<(), CoreError> {
        Err(CoreError::Storage(format!("disk full while writing {key}")))
    }
}

#[test]
fn spending_near_threshold_raises_single_warning() {
    let now = may_clock().now();
    let expenses = vec![expense("e1", may(1), 85.0, Category::Food)];
    let alerts = BudgetEvaluator::evaluate(&expenses, &[food_budget()], now);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, AlertSeverity::Warning);
    insta::assert_snapshot!(
        alerts[0].message,
        @"Budget Alert: Only 15.0% remaining for Food. Used $85 of $100."
    );
    assert!(alerts[0].id.starts_with("warn-Food-2024-05-"));
    assert!(!alerts[0].is_read);
}

#[test]
fn spending_over_limit_raises_danger_only() {
    let now = may_clock().now();
    let expenses = vec![
        expense("e1", may(1), 70.0, Category::Food),
        expense("e2", may(9), 50.0, Category::Food),
    ];
    let alerts = BudgetEvaluator::evaluate(&expenses, &[food_budget()], now);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, AlertSeverity::Danger);
    insta::assert_snapshot!(
        alerts[0].message,
        @"Over Budget: You've spent $120 on Food, exceeding your limit of $100."
    );
}

#[test]
fn spending_below_threshold_raises_nothing() {
    let now = may_clock().now();
    let expenses = vec![expense("e1", may(1), 50.0, Category::Food)];
    assert!(BudgetEvaluator::evaluate(&expenses, &[food_budget()], now).is_empty());
}

#[test]
fn severity_follows_limit_and_threshold_across_amounts() {
    let now = may_clock().now();
    for cents in (0..=15_000).step_by(250) {
        let amount = cents as f64 / 100.0;
        let expenses = vec![expense("e1", may(3), amount, Category::Food)];
        let alerts = BudgetEvaluator::evaluate(&expenses, &[food_budget()], now);
        let severities: Vec<_> = alerts.iter().map(|a| a.severity).collect();
        if amount > 100.0 {
            assert_eq!(severities, vec![AlertSeverity::Danger], "amount {amount}");
        } else if amount >= 80.0 {
            assert_eq!(severities, vec![AlertSeverity::Warning], "amount {amount}");
        } else {
            assert!(severities.is_empty(), "amount {amount}");
        }
    }
}

#[test]
fn only_current_month_expenses_and_budgets_count() {
    let now = may_clock().now();
    let expenses = vec![
        expense("april", NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(), 500.0, Category::Food),
        expense("june", NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 500.0, Category::Food),
        expense("may", may(2), 10.0, Category::Food),
        expense("transport", may(2), 500.0, Category::Transport),
    ];
    let april_budget = Budget::new(Category::Food, month("2024-04"), 10.0, 80.0);
    let alerts = BudgetEvaluator::evaluate(&expenses, &[food_budget(), april_budget], now);
    assert!(alerts.is_empty());
}

#[test]
fn zero_limit_is_exceeded_by_any_spend_and_silent_otherwise() {
    let now = may_clock().now();
    let zero = Budget::new(Category::Health, month("2024-05"), 0.0, 80.0);

    assert!(BudgetEvaluator::evaluate(&[], &[zero.clone()], now).is_empty());
    assert_eq!(
        BudgetStatus::assess(0.0, 80.0, 0.0),
        BudgetStatus::OnTrack { percent_used: None }
    );

    let expenses = vec![expense("e1", may(4), 5.0, Category::Health)];
    let alerts = BudgetEvaluator::evaluate(&expenses, &[zero], now);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, AlertSeverity::Danger);
    assert!(!alerts[0].message.contains("NaN") && !alerts[0].message.contains("inf"));
}

#[test]
fn merging_identical_evaluations_adds_nothing() {
    let now = may_clock().now();
    let expenses = vec![expense("e1", may(1), 85.0, Category::Food)];
    let mut live = Vec::new();

    let first = merge_alerts(&mut live, BudgetEvaluator::evaluate(&expenses, &[food_budget()], now));
    let second = merge_alerts(&mut live, BudgetEvaluator::evaluate(&expenses, &[food_budget()], now));

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(live.len(), 1);
}

#[test]
fn changed_amount_adds_a_second_alert_instead_of_updating() {
    let clock = may_clock();
    let mut live = Vec::new();
    let mut expenses = vec![expense("e1", may(1), 85.0, Category::Food)];
    merge_alerts(
        &mut live,
        BudgetEvaluator::evaluate(&expenses, &[food_budget()], clock.now()),
    );

    expenses.push(expense("e2", may(2), 0.5, Category::Food));
    let added = merge_alerts(
        &mut live,
        BudgetEvaluator::evaluate(&expenses, &[food_budget()], clock.now()),
    );

    assert_eq!(added.len(), 1);
    assert_eq!(live.len(), 2);
    assert!(live[0].message.contains("Used $85.5 of $100"));
    assert!(live[1].message.contains("Used $85 of $100"));
}

#[test]
fn add_expense_prepends_persists_and_raises_alert() {
    let storage = Arc::new(MemoryStorage::new());
    let mut state = FinanceState::load(
        Box::new(storage.clone()),
        may_clock(),
        LoadOptions::default(),
    )
    .unwrap();
    state.set_budget(food_budget()).unwrap();

    let first = state
        .add_expense(NewExpense::new(may(1), 10.0, Category::Food, "Snacks"))
        .unwrap();
    assert!(first.raised_alerts.is_empty());
    assert!(first.persisted);

    let second = state
        .add_expense(NewExpense::new(may(2), 75.0, Category::Food, "Groceries"))
        .unwrap();
    assert_eq!(second.raised_alerts.len(), 1);
    assert_eq!(state.expenses()[0].id, second.value.id);
    assert_ne!(first.value.id, second.value.id);

    let stored = storage.read_entry(EXPENSES_KEY).unwrap().expect("expenses entry");
    let persisted: Vec<Expense> = serde_json::from_str(&stored).unwrap();
    assert_eq!(persisted, state.expenses());
}

#[test]
fn invalid_expense_is_refused_without_side_effects() {
    let storage = Arc::new(MemoryStorage::new());
    let mut state =
        FinanceState::load(Box::new(storage.clone()), may_clock(), LoadOptions::default())
            .unwrap();

    let blank = state.add_expense(NewExpense::new(may(1), 10.0, Category::Food, "  "));
    let negative = state.add_expense(NewExpense::new(may(1), -1.0, Category::Food, "Refund"));

    assert!(matches!(blank, Err(CoreError::Validation(_))));
    assert!(matches!(negative, Err(CoreError::Validation(_))));
    assert!(state.expenses().is_empty());
    assert!(storage.read_entry(EXPENSES_KEY).unwrap().is_none());
}

#[test]
fn set_budget_upserts_by_category_and_month() {
    let mut state = empty_state(may_clock());
    state.set_budget(food_budget()).unwrap();
    state
        .set_budget(Budget::new(Category::Transport, month("2024-05"), 50.0, 90.0))
        .unwrap();
    let replaced = state
        .set_budget(Budget::new(Category::Food, month("2024-05"), 250.0, 60.0))
        .unwrap();

    assert!(replaced.value);
    assert_eq!(state.budgets().len(), 2);
    let food = state
        .get_budget_for_category(Category::Food, month("2024-05"))
        .expect("food budget");
    assert_eq!(food.limit, 250.0);
    assert_eq!(food.alert_threshold, 60.0);
    assert_eq!(state.budgets()[0].category, Category::Food);
    assert!(state
        .get_budget_for_category(Category::Food, month("2024-06"))
        .is_none());
}

#[test]
fn set_budget_rejects_out_of_range_threshold() {
    let mut state = empty_state(may_clock());
    let result = state.set_budget(Budget::new(Category::Food, month("2024-05"), 100.0, 0.0));
    assert!(matches!(result, Err(CoreError::Validation(_))));
    let result = state.set_budget(Budget::new(Category::Food, month("2024-05"), -5.0, 80.0));
    assert!(matches!(result, Err(CoreError::Validation(_))));
    assert!(state.budgets().is_empty());
}

#[test]
fn deleted_expense_no_longer_counts() {
    let mut state = empty_state(may_clock());
    state.set_budget(food_budget()).unwrap();
    let big = state
        .add_expense(NewExpense::new(may(3), 90.0, Category::Food, "Party"))
        .unwrap()
        .value;
    state
        .add_expense(NewExpense::new(may(4), 5.0, Category::Food, "Coffee"))
        .unwrap();

    let removed = state.delete_expense(&big.id);
    assert!(removed.value);
    assert!(state.expense(&big.id).is_none());

    let summary = ReportService::month_summary(state.expenses(), state.budgets(), month("2024-05"));
    assert_eq!(summary.total_spent, 5.0);
    let spent = BudgetEvaluator::spent_by_category(state.expenses(), month("2024-05"));
    assert_eq!(spent.get(&Category::Food).copied(), Some(5.0));
}

#[test]
fn deleting_unknown_expense_is_a_no_op() {
    let mut state = empty_state(may_clock());
    state
        .add_expense(NewExpense::new(may(3), 9.0, Category::Other, "Stamps"))
        .unwrap();
    let outcome = state.delete_expense("missing");
    assert!(!outcome.value);
    assert!(outcome.persisted);
    assert_eq!(state.expenses().len(), 1);
}

#[test]
fn dismissed_alert_returns_on_next_evaluation() {
    let mut state = empty_state(may_clock());
    state.set_budget(food_budget()).unwrap();
    state
        .add_expense(NewExpense::new(may(3), 120.0, Category::Food, "Feast"))
        .unwrap();
    let id = state.alerts()[0].id.clone();

    assert!(state.dismiss_alert(&id));
    assert!(!state.dismiss_alert(&id));
    assert!(state.alerts().is_empty());

    let outcome = state
        .add_expense(NewExpense::new(may(4), 1.0, Category::Transport, "Bus"))
        .unwrap();
    assert_eq!(outcome.raised_alerts.len(), 1);
    assert_eq!(state.alerts().len(), 1);
}

#[test]
fn repeated_warnings_under_a_fixed_clock_get_distinct_ids() {
    let mut state = empty_state(may_clock());
    state.set_budget(food_budget()).unwrap();
    state
        .add_expense(NewExpense::new(may(3), 85.0, Category::Food, "Groceries"))
        .unwrap();
    state
        .add_expense(NewExpense::new(may(4), 1.0, Category::Food, "Gum"))
        .unwrap();

    let ids: Vec<String> = state.alerts().iter().map(|a| a.id.clone()).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(ids.iter().all(|id| id.starts_with("warn-Food-2024-05-")));

    assert!(state.dismiss_alert(&ids[0]));
    assert_eq!(state.alerts().len(), 1);
    assert_eq!(state.alerts()[0].id, ids[1]);
}

#[test]
fn merge_suffixes_ids_already_in_use() {
    let now = may_clock().now();
    let mut live = vec![spendsmart_domain::Alert::new(
        "warn-x",
        AlertSeverity::Warning,
        "first",
        now,
    )];
    let added = merge_alerts(
        &mut live,
        vec![
            spendsmart_domain::Alert::new("warn-x", AlertSeverity::Warning, "second", now),
            spendsmart_domain::Alert::new("warn-x", AlertSeverity::Warning, "third", now),
        ],
    );
    let ids: Vec<&str> = added.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["warn-x-2", "warn-x-3"]);
    assert_eq!(live.len(), 3);
}

#[test]
fn evaluation_follows_the_clock_across_month_boundaries() {
    let clock = may_clock();
    let mut state = empty_state(clock.clone());
    state.set_budget(food_budget()).unwrap();
    state
        .add_expense(NewExpense::new(may(3), 95.0, Category::Food, "Catering"))
        .unwrap();
    assert_eq!(state.alerts().len(), 1);

    clock.set(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    let outcome = state
        .add_expense(NewExpense::new(may(20), 50.0, Category::Food, "Late receipt"))
        .unwrap();
    assert!(outcome.raised_alerts.is_empty());
    assert_eq!(state.current_month(), month("2024-06"));
}

#[test]
fn first_load_seeds_sample_data_when_requested() {
    let storage = Arc::new(MemoryStorage::new());
    let state = FinanceState::load(
        Box::new(storage.clone()),
        may_clock(),
        LoadOptions {
            seed_sample_data: true,
        },
    )
    .unwrap();

    assert_eq!(state.expenses().len(), 10);
    assert_eq!(state.budgets().len(), 6);
    assert!(storage.read_entry(BUDGETS_KEY).unwrap().is_some());
    // Shopping 180/150 is over; Food 451.4/600 stays under 80%.
    assert!(state
        .alerts()
        .iter()
        .any(|a| a.severity == AlertSeverity::Danger && a.message.contains("Shopping")));
    assert!(!state.alerts().iter().any(|a| a.message.contains("Food")));
}

#[test]
fn corrupt_entry_starts_empty_and_is_kept_aside() {
    let storage = Arc::new(MemoryStorage::with_entries([
        (EXPENSES_KEY, "{not json"),
        (BUDGETS_KEY, "[]"),
    ]));
    let state = FinanceState::load(
        Box::new(storage.clone()),
        may_clock(),
        LoadOptions {
            seed_sample_data: true,
        },
    )
    .unwrap();

    assert!(state.expenses().is_empty());
    assert!(state.budgets().is_empty());
    assert_eq!(
        storage.read_entry("expenses.corrupt").unwrap().as_deref(),
        Some("{not json")
    );
}

#[test]
fn repeated_corruption_keeps_every_earlier_copy() {
    let storage = Arc::new(MemoryStorage::with_entries([
        (EXPENSES_KEY, "{first"),
        ("expenses.corrupt", "{older"),
    ]));
    FinanceState::load(Box::new(storage.clone()), may_clock(), LoadOptions::default()).unwrap();

    storage.write_entry(EXPENSES_KEY, "{second").unwrap();
    FinanceState::load(Box::new(storage.clone()), may_clock(), LoadOptions::default()).unwrap();

    let kept = |key: &str| storage.read_entry(key).unwrap();
    assert_eq!(kept("expenses.corrupt").as_deref(), Some("{older"));
    assert_eq!(kept("expenses.corrupt-2").as_deref(), Some("{first"));
    assert_eq!(kept("expenses.corrupt-3").as_deref(), Some("{second"));
}

#[test]
fn persisted_expenses_reload_identically_and_in_order() {
    let storage = Arc::new(MemoryStorage::new());
    let clock = may_clock();
    let mut state =
        FinanceState::load(Box::new(storage.clone()), clock.clone(), LoadOptions::default())
            .unwrap();
    for (day, amount, category) in [
        (1, 12.34, Category::Food),
        (2, 0.0, Category::Other),
        (3, 1999.99, Category::Housing),
    ] {
        let mut data = NewExpense::new(may(day), amount, category, format!("item {day}"));
        if day == 2 {
            data.split_group_id = Some("dinner".into());
        }
        state.add_expense(data).unwrap();
    }

    let reloaded =
        FinanceState::load(Box::new(storage), clock, LoadOptions::default()).unwrap();
    assert_eq!(reloaded.expenses(), state.expenses());
}

#[test]
fn persistence_failure_is_logged_and_mutation_kept() {
    let mut state =
        FinanceState::load(Box::new(FailingStorage), may_clock(), LoadOptions::default())
            .unwrap();
    state.set_budget(food_budget()).unwrap();
    let outcome = state
        .add_expense(NewExpense::new(may(2), 99.0, Category::Food, "Wine"))
        .unwrap();

    assert!(!outcome.persisted);
    assert_eq!(state.expenses().len(), 1);
    assert_eq!(outcome.raised_alerts.len(), 1);
}

#[test]
fn category_breakdown_lists_spend_and_budgets_in_canonical_order() {
    let expenses = vec![
        expense("e1", may(1), 40.0, Category::Shopping),
        expense("e2", may(1), 85.0, Category::Food),
        expense("e3", NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(), 5.0, Category::Health),
    ];
    let budgets = vec![
        Budget::new(Category::Utilities, month("2024-05"), 200.0, 90.0),
        food_budget(),
    ];
    let rows = ReportService::category_breakdown(&expenses, &budgets, month("2024-05"));
    let categories: Vec<_> = rows.iter().map(|r| r.category).collect();
    assert_eq!(
        categories,
        vec![Category::Food, Category::Utilities, Category::Shopping]
    );
    assert!(matches!(
        rows[0].status,
        Some(BudgetStatus::NearLimit { percent_used }) if (percent_used - 85.0).abs() < 1e-9
    ));
    assert_eq!(rows[2].budget, None);

    let shares = ReportService::spending_shares(&expenses, month("2024-05"));
    assert_eq!(shares.len(), 2);
    let total: f64 = shares.iter().map(|s| s.share_percent).sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[test]
fn month_summary_handles_missing_budgets() {
    let expenses = vec![expense("e1", may(1), 40.0, Category::Shopping)];
    let summary = ReportService::month_summary(&expenses, &[], month("2024-05"));
    assert_eq!(summary.expense_count, 1);
    assert_eq!(summary.percent_spent, 0.0);
    assert!(summary.over_budget);
    assert_eq!(summary.difference, 40.0);
}

#[test]
fn filter_matches_description_and_category() {
    let mut lunch = expense("e1", may(1), 12.0, Category::Food);
    lunch.description = "Lunch at Burger King".into();
    let mut bus = expense("e2", may(1), 3.0, Category::Transport);
    bus.description = "Bus to lunch".into();
    let expenses = vec![lunch, bus];

    let by_text = ExpenseFilter::default().with_search("LUNCH").apply(&expenses);
    assert_eq!(by_text.len(), 2);

    let by_both = ExpenseFilter::default()
        .with_search("lunch")
        .with_category(Category::Transport)
        .apply(&expenses);
    assert_eq!(by_both.len(), 1);
    assert_eq!(by_both[0].id, "e2");
}
