//! spendsmart-domain
//!
//! Pure domain models (Expense, Budget, Alert, Category, YearMonth).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod alert;
pub mod budget;
pub mod category;
pub mod common;
pub mod error;
pub mod expense;

pub use alert::*;
pub use budget::*;
pub use category::*;
pub use common::*;
pub use error::DomainError;
pub use expense::*;
