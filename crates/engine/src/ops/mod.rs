use std::{collections::HashMap, fmt, sync::Arc};

use sea_orm::DatabaseConnection;

use crate::{
    AuthorizationGate, BudgetRepository, EngineError, Expense, ExpenseCategory, ExpenseRepository,
    IdentityLookup, ResultEngine, SqlBudgetRepository, SqlExpenseRepository, SqlTravelDirectory,
    UserIdentity,
};

mod analytics;
mod budgets;
mod expenses;

pub use analytics::{BudgetUtilization, CategoryUtilization, ExpenseAnalytics};

/// How category caps relate to the overall travel budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryBudgetPolicy {
    /// Category caps may add up to more than the total.
    #[default]
    Unchecked,
    /// Category caps must add up to at most the total, when a total is set.
    WithinTotal,
}

/// An expense together with the data shown next to it.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseDetail {
    pub expense: Expense,
    pub category: Option<ExpenseCategory>,
    /// Identities of the payer, the creator and every participant, by id.
    pub people: HashMap<String, UserIdentity>,
}

impl ExpenseDetail {
    pub fn person(&self, user_id: &str) -> Option<&UserIdentity> {
        self.people.get(user_id)
    }

    pub fn payer(&self) -> Option<&UserIdentity> {
        self.person(&self.expense.paid_by)
    }

    pub fn creator(&self) -> Option<&UserIdentity> {
        self.person(&self.expense.created_by)
    }
}

pub struct Engine {
    expenses: Arc<dyn ExpenseRepository>,
    budgets: Arc<dyn BudgetRepository>,
    gate: Arc<dyn AuthorizationGate>,
    identities: Arc<dyn IdentityLookup>,
    category_budget_policy: CategoryBudgetPolicy,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("category_budget_policy", &self.category_budget_policy)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn category_budget_policy(&self) -> CategoryBudgetPolicy {
        self.category_budget_policy
    }

    /// Looks up a user by id; `None` if unknown.
    pub async fn user_identity(&self, user_id: &str) -> ResultEngine<Option<UserIdentity>> {
        self.identities.identity(user_id).await
    }

    async fn detail(&self, expense: Expense) -> ResultEngine<ExpenseDetail> {
        let mut details = self.details(vec![expense]).await?;
        details
            .pop()
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))
    }

    /// Attaches category and identities with one lookup per kind.
    async fn details(&self, expenses: Vec<Expense>) -> ResultEngine<Vec<ExpenseDetail>> {
        let categories: HashMap<String, ExpenseCategory> = self
            .expenses
            .categories()
            .await?
            .into_iter()
            .map(|category| (category.id.clone(), category))
            .collect();

        let mut user_ids: Vec<String> = Vec::new();
        for expense in &expenses {
            user_ids.push(expense.paid_by.clone());
            user_ids.push(expense.created_by.clone());
            user_ids.extend(expense.participants());
        }
        user_ids.sort();
        user_ids.dedup();
        let identities = self.identities.identities(&user_ids).await?;

        Ok(expenses
            .into_iter()
            .map(|expense| {
                let people = std::iter::once(&expense.paid_by)
                    .chain(std::iter::once(&expense.created_by))
                    .chain(expense.shares.iter().map(|share| &share.user_id))
                    .filter_map(|id| identities.get(id).map(|found| (id.clone(), found.clone())))
                    .collect();
                ExpenseDetail {
                    category: categories.get(&expense.category_id).cloned(),
                    people,
                    expense,
                }
            })
            .collect())
    }
}

/// The builder for `Engine`
///
/// Repositories and collaborators default to the sea-orm implementations over
/// `database`; each can be replaced individually.
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    expenses: Option<Arc<dyn ExpenseRepository>>,
    budgets: Option<Arc<dyn BudgetRepository>>,
    gate: Option<Arc<dyn AuthorizationGate>>,
    identities: Option<Arc<dyn IdentityLookup>>,
    category_budget_policy: CategoryBudgetPolicy,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    pub fn expense_repository(mut self, repository: Arc<dyn ExpenseRepository>) -> EngineBuilder {
        self.expenses = Some(repository);
        self
    }

    pub fn budget_repository(mut self, repository: Arc<dyn BudgetRepository>) -> EngineBuilder {
        self.budgets = Some(repository);
        self
    }

    pub fn gate(mut self, gate: Arc<dyn AuthorizationGate>) -> EngineBuilder {
        self.gate = Some(gate);
        self
    }

    pub fn identities(mut self, identities: Arc<dyn IdentityLookup>) -> EngineBuilder {
        self.identities = Some(identities);
        self
    }

    pub fn category_budget_policy(mut self, policy: CategoryBudgetPolicy) -> EngineBuilder {
        self.category_budget_policy = policy;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let directory = Arc::new(SqlTravelDirectory::new(self.database.clone()));
        let expenses: Arc<dyn ExpenseRepository> = match self.expenses {
            Some(repository) => repository,
            None => Arc::new(SqlExpenseRepository::new(self.database.clone())),
        };
        let budgets: Arc<dyn BudgetRepository> = match self.budgets {
            Some(repository) => repository,
            None => Arc::new(SqlBudgetRepository::new(self.database.clone())),
        };
        let gate: Arc<dyn AuthorizationGate> = match self.gate {
            Some(gate) => gate,
            None => directory.clone(),
        };
        let identities: Arc<dyn IdentityLookup> = match self.identities {
            Some(identities) => identities,
            None => directory,
        };
        Ok(Engine {
            expenses,
            budgets,
            gate,
            identities,
            category_budget_policy: self.category_budget_policy,
        })
    }
}
