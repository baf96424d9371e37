//! Persistence seams.
//!
//! The engine talks to storage only through [`ExpenseRepository`] and
//! [`BudgetRepository`]. Every multi-row write goes through
//! [`with_transaction`], so an expense never becomes visible without its
//! splits and a budget never without its category caps.

use std::{future::Future, pin::Pin};

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use uuid::Uuid;

use crate::{Budget, Expense, ExpenseCategory, ResultEngine, Share};

mod budgets;
mod expenses;

pub use budgets::SqlBudgetRepository;
pub use expenses::SqlExpenseRepository;

/// Boxed future borrowed from an open transaction.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = ResultEngine<T>> + Send + 'a>>;

/// Runs `body` inside one database transaction.
///
/// Commits when `body` returns `Ok`, rolls back when it returns `Err`. If the
/// future is dropped before finishing, the transaction handle is dropped
/// uncommitted and the database rolls it back.
pub async fn with_transaction<T, F>(database: &DatabaseConnection, body: F) -> ResultEngine<T>
where
    T: Send,
    F: for<'tx> FnOnce(&'tx DatabaseTransaction) -> TxFuture<'tx, T> + Send,
{
    let db_tx = database.begin().await?;
    match body(&db_tx).await {
        Ok(value) => {
            db_tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = db_tx.rollback().await {
                tracing::error!(error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}

/// Storage for the Expense + ExpenseSplit aggregate and the category
/// reference data.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn categories(&self) -> ResultEngine<Vec<ExpenseCategory>>;

    async fn category(&self, category_id: &str) -> ResultEngine<Option<ExpenseCategory>>;

    async fn find(&self, expense_id: Uuid) -> ResultEngine<Option<Expense>>;

    /// Expenses of a travel, newest `date` first.
    async fn list_by_travel(&self, travel_id: &str) -> ResultEngine<Vec<Expense>>;

    /// Split rows stored for `expense_id`, in participant order.
    async fn shares_of(&self, expense_id: Uuid) -> ResultEngine<Vec<Share>>;

    /// Inserts the expense and all of its shares atomically.
    async fn insert(&self, expense: &Expense) -> ResultEngine<()>;

    /// Writes `expense` if the stored revision still equals
    /// `expected_revision`, otherwise fails with `Conflict`.
    ///
    /// With `replace_shares` the stored split rows are deleted and replaced by
    /// `expense.shares` in the same transaction.
    async fn update(
        &self,
        expense: &Expense,
        replace_shares: bool,
        expected_revision: i64,
    ) -> ResultEngine<()>;

    /// Deletes the expense and its splits. Returns `false` if nothing matched.
    async fn delete(&self, expense_id: Uuid) -> ResultEngine<bool>;
}

/// Storage for the Budget + CategoryBudget aggregate.
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    async fn find_by_travel(&self, travel_id: &str) -> ResultEngine<Option<Budget>>;

    /// Creates the travel's budget or updates it in place.
    ///
    /// With `replace_categories` the stored category caps are replaced by
    /// `budget.category_budgets`; otherwise they are left untouched.
    async fn upsert(&self, budget: &Budget, replace_categories: bool) -> ResultEngine<()>;
}
