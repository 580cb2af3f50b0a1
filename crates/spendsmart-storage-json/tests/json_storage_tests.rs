use std::{fs, sync::Arc};

use chrono::NaiveDate;
use spendsmart_core::{
    FinanceState, FinanceStorage, FixedClock, LoadOptions, BUDGETS_KEY, EXPENSES_KEY,
};
use spendsmart_domain::{Budget, Category, NewExpense};
use spendsmart_storage_json::JsonFileStorage;
use tempfile::tempdir;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at_date(
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
    ))
}

#[test]
fn missing_entry_reads_as_none() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFileStorage::new(dir.path().join("data")).expect("create storage");
    assert!(storage.read_entry(EXPENSES_KEY).expect("read").is_none());
    assert!(dir.path().join("data").is_dir());
}

#[test]
fn write_replaces_entry_without_leaving_temp_files() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFileStorage::new(dir.path()).expect("create storage");

    storage.write_entry(BUDGETS_KEY, "[1]").expect("first write");
    storage.write_entry(BUDGETS_KEY, "[2]").expect("second write");

    assert_eq!(
        storage.read_entry(BUDGETS_KEY).expect("read").as_deref(),
        Some("[2]")
    );
    let names: Vec<String> = fs::read_dir(dir.path())
        .expect("list dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["budgets.json".to_string()]);
}

#[test]
fn state_round_trips_through_files_in_order() {
    let dir = tempdir().expect("tempdir");
    let clock = clock();
    let mut state = FinanceState::load(
        Box::new(JsonFileStorage::new(dir.path()).expect("storage")),
        clock.clone(),
        LoadOptions::default(),
    )
    .expect("load");

    let month = "2024-05".parse().expect("month");
    state
        .set_budget(Budget::new(Category::Food, month, 300.0, 75.0))
        .expect("set budget");
    for (day, amount) in [(1, 10.5), (2, 42.0), (3, 7.25)] {
        state
            .add_expense(NewExpense::new(
                NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
                amount,
                Category::Food,
                format!("groceries {day}"),
            ))
            .expect("add expense");
    }

    let reloaded = FinanceState::load(
        Box::new(JsonFileStorage::new(dir.path()).expect("storage")),
        clock,
        LoadOptions {
            seed_sample_data: true,
        },
    )
    .expect("reload");

    assert_eq!(reloaded.expenses(), state.expenses());
    assert_eq!(reloaded.budgets(), state.budgets());
    assert_eq!(reloaded.expenses()[0].description, "groceries 3");
}

#[test]
fn unreadable_file_is_moved_aside_and_state_starts_empty() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("expenses.json"), "[{\"id\": 12").expect("write corrupt");
    fs::write(dir.path().join("budgets.json"), "[]").expect("write budgets");

    let state = FinanceState::load(
        Box::new(JsonFileStorage::new(dir.path()).expect("storage")),
        clock(),
        LoadOptions {
            seed_sample_data: true,
        },
    )
    .expect("load");

    assert!(state.expenses().is_empty());
    let kept = fs::read_to_string(dir.path().join("expenses.corrupt.json")).expect("quarantine");
    assert_eq!(kept, "[{\"id\": 12");
}

#[test]
fn stored_json_uses_camel_case_fields() {
    let dir = tempdir().expect("tempdir");
    let mut state = FinanceState::load(
        Box::new(JsonFileStorage::new(dir.path()).expect("storage")),
        clock(),
        LoadOptions::default(),
    )
    .expect("load");
    state
        .set_budget(Budget::new(
            Category::Transport,
            "2024-05".parse().expect("month"),
            120.0,
            90.0,
        ))
        .expect("set budget");

    let raw = fs::read_to_string(dir.path().join("budgets.json")).expect("read budgets");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(value[0]["id"], "Transport-2024-05");
    assert_eq!(value[0]["month"], "2024-05");
    assert_eq!(value[0]["alertThreshold"], 90.0);
}
