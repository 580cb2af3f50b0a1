//! spendsmart-core
//!
//! Business logic for SpendSmart: budget evaluation, the finance state
//! container, reporting, and bill splitting.
//! Depends on spendsmart-domain. No CLI, no terminal I/O, no filesystem access.

pub mod error;
pub mod evaluator;
pub mod filter;
pub mod report;
pub mod sample;
pub mod split;
pub mod state;
pub mod storage;
pub mod time;

pub use error::CoreError;
pub use evaluator::*;
pub use filter::ExpenseFilter;
pub use report::*;
pub use split::*;
pub use state::*;
pub use storage::{FinanceStorage, MemoryStorage, BUDGETS_KEY, EXPENSES_KEY};
pub use time::{Clock, FixedClock};

#[cfg(test)]
mod tests;
