use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use crate::{Budget, EngineError, MoneyCents, ResultEngine, UpsertBudgetCmd};

use super::{CategoryBudgetPolicy, Engine};

impl Engine {
    /// Returns the budget of a travel, `None` if none was set yet.
    pub async fn budget(&self, travel_id: &str, user_id: &str) -> ResultEngine<Option<Budget>> {
        self.gate.require_member(travel_id, user_id).await?;
        self.budgets.find_by_travel(travel_id).await
    }

    /// Creates the travel budget or updates it in place.
    ///
    /// An absent total keeps the stored one. A supplied category list replaces
    /// the stored category caps as a whole.
    pub async fn upsert_budget(&self, cmd: UpsertBudgetCmd) -> ResultEngine<Budget> {
        self.gate.require_member(&cmd.travel_id, &cmd.user_id).await?;

        if let Some(total) = cmd.total_budget
            && total.is_negative()
        {
            return Err(EngineError::InvalidBudget(
                "total budget must be >= 0".to_string(),
            ));
        }
        if let Some(rows) = &cmd.category_budgets {
            let mut seen = HashSet::with_capacity(rows.len());
            for row in rows {
                if row.amount.is_negative() {
                    return Err(EngineError::InvalidBudget(format!(
                        "budget for category '{}' must be >= 0",
                        row.category_id
                    )));
                }
                if !seen.insert(row.category_id.as_str()) {
                    return Err(EngineError::InvalidBudget(format!(
                        "category '{}' listed more than once",
                        row.category_id
                    )));
                }
                if self.expenses.category(&row.category_id).await?.is_none() {
                    return Err(EngineError::InvalidBudget(format!(
                        "unknown category: {}",
                        row.category_id
                    )));
                }
            }
        }

        let existing = self.budgets.find_by_travel(&cmd.travel_id).await?;
        let now = Utc::now();
        let replace_categories = cmd.category_budgets.is_some();
        let budget = match existing {
            Some(stored) => Budget {
                total_budget: cmd.total_budget.or(stored.total_budget),
                category_budgets: cmd.category_budgets.unwrap_or(stored.category_budgets),
                updated_at: now,
                ..stored
            },
            None => Budget {
                id: Uuid::new_v4(),
                travel_id: cmd.travel_id.clone(),
                total_budget: cmd.total_budget,
                category_budgets: cmd.category_budgets.unwrap_or_default(),
                created_by: cmd.user_id.clone(),
                created_at: now,
                updated_at: now,
            },
        };
        self.check_category_total(&budget)?;

        self.budgets.upsert(&budget, replace_categories).await?;
        tracing::info!(
            travel_id = %cmd.travel_id,
            total = budget.total_budget.map(MoneyCents::cents),
            categories = budget.category_budgets.len(),
            "budget saved"
        );
        self.budgets
            .find_by_travel(&cmd.travel_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))
    }

    fn check_category_total(&self, budget: &Budget) -> ResultEngine<()> {
        if self.category_budget_policy != CategoryBudgetPolicy::WithinTotal {
            return Ok(());
        }
        let Some(total) = budget.total_budget else {
            return Ok(());
        };
        let categories = MoneyCents::checked_sum(budget.category_budgets.iter().map(|c| c.amount))?;
        if categories > total {
            return Err(EngineError::InvalidBudget(format!(
                "category budgets sum to {categories}, above total budget {total}"
            )));
        }
        Ok(())
    }
}
