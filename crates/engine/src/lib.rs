//! Expense splitting and settlement engine for shared travel costs.
//!
//! The engine records who paid for what, divides every expense among its
//! participants down to the cent, and recomputes balances and budget
//! utilisation from the stored expense history.

pub use budgets::{Budget, CategoryBudget};
pub use commands::{CreateExpenseCmd, UpdateExpenseCmd, UpsertBudgetCmd};
pub use error::EngineError;
pub use expense_categories::ExpenseCategory;
pub use expenses::Expense;
pub use gate::{AuthorizationGate, IdentityLookup, SqlTravelDirectory, TravelGroup};
pub use money::MoneyCents;
pub use ops::{
    BudgetUtilization, CategoryBudgetPolicy, CategoryUtilization, Engine, EngineBuilder,
    ExpenseAnalytics, ExpenseDetail,
};
pub use split::{Share, SplitKind, SplitMethod, allocate};
pub use store::{
    BudgetRepository, ExpenseRepository, SqlBudgetRepository, SqlExpenseRepository,
    with_transaction,
};
pub use users::UserIdentity;

mod budgets;
mod category_budgets;
mod commands;
mod error;
mod expense_categories;
mod expense_splits;
mod expenses;
mod gate;
mod group_members;
mod money;
mod ops;
mod split;
mod store;
mod travel_groups;
mod travels;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
