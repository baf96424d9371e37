//! Balance & analytics aggregation.
//!
//! Everything here is recomputed from the full expense list on every call;
//! nothing is cached between calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Budget, Expense, MoneyCents, ResultEngine};

use super::Engine;

/// Totals and net balances of one travel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseAnalytics {
    pub total_amount: MoneyCents,
    pub category_totals: BTreeMap<String, MoneyCents>,
    pub payer_totals: BTreeMap<String, MoneyCents>,
    /// Paid minus owed, per user. Positive means the user is owed money.
    pub balances: BTreeMap<String, MoneyCents>,
    pub expense_count: usize,
}

fn accumulate(
    totals: &mut BTreeMap<String, MoneyCents>,
    key: &str,
    amount: MoneyCents,
) -> ResultEngine<()> {
    let slot = totals.entry(key.to_string()).or_default();
    *slot = slot.try_add(amount)?;
    Ok(())
}

impl ExpenseAnalytics {
    /// Aggregates `expenses`. Fails with [`EngineError::InvalidAmount`] if a
    /// total does not fit in `i64` cents.
    ///
    /// [`EngineError::InvalidAmount`]: crate::EngineError::InvalidAmount
    pub fn from_expenses(expenses: &[Expense]) -> ResultEngine<Self> {
        let mut analytics = Self::default();
        for expense in expenses {
            analytics.total_amount = analytics.total_amount.try_add(expense.amount)?;
            accumulate(
                &mut analytics.category_totals,
                &expense.category_id,
                expense.amount,
            )?;
            accumulate(&mut analytics.payer_totals, &expense.paid_by, expense.amount)?;
            accumulate(&mut analytics.balances, &expense.paid_by, expense.amount)?;
            for share in &expense.shares {
                let slot = analytics.balances.entry(share.user_id.clone()).or_default();
                *slot = slot.try_sub(share.amount)?;
            }
        }
        analytics.expense_count = expenses.len();
        Ok(analytics)
    }

    /// Sum of all balances. Zero whenever every expense's shares add up to its amount.
    pub fn balance_sum(&self) -> ResultEngine<MoneyCents> {
        MoneyCents::checked_sum(self.balances.values().copied())
    }
}

/// Budget versus actual spending, per category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUtilization {
    pub category_id: String,
    pub budgeted: MoneyCents,
    pub spent: MoneyCents,
    pub remaining: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetUtilization {
    pub total_budget: Option<MoneyCents>,
    pub total_spent: MoneyCents,
    pub remaining: Option<MoneyCents>,
    pub categories: Vec<CategoryUtilization>,
}

impl BudgetUtilization {
    pub fn compute(budget: &Budget, analytics: &ExpenseAnalytics) -> ResultEngine<Self> {
        let categories = budget
            .category_budgets
            .iter()
            .map(|cap| -> ResultEngine<CategoryUtilization> {
                let spent = analytics
                    .category_totals
                    .get(&cap.category_id)
                    .copied()
                    .unwrap_or_default();
                Ok(CategoryUtilization {
                    category_id: cap.category_id.clone(),
                    budgeted: cap.amount,
                    spent,
                    remaining: cap.amount.try_sub(spent)?,
                })
            })
            .collect::<ResultEngine<Vec<_>>>()?;
        let remaining = budget
            .total_budget
            .map(|total| total.try_sub(analytics.total_amount))
            .transpose()?;
        Ok(Self {
            total_budget: budget.total_budget,
            total_spent: analytics.total_amount,
            remaining,
            categories,
        })
    }
}

impl Engine {
    /// Recomputes totals and balances of a travel from its expenses.
    pub async fn expense_analytics(
        &self,
        travel_id: &str,
        user_id: &str,
    ) -> ResultEngine<ExpenseAnalytics> {
        self.gate.require_member(travel_id, user_id).await?;
        let expenses = self.expenses.list_by_travel(travel_id).await?;
        let analytics = ExpenseAnalytics::from_expenses(&expenses)?;
        tracing::debug!(
            travel_id,
            expenses = analytics.expense_count,
            total = analytics.total_amount.cents(),
            "analytics recomputed"
        );
        Ok(analytics)
    }

    /// Compares the travel budget with spending. `None` if no budget is set.
    pub async fn budget_utilization(
        &self,
        travel_id: &str,
        user_id: &str,
    ) -> ResultEngine<Option<BudgetUtilization>> {
        self.gate.require_member(travel_id, user_id).await?;
        let Some(budget) = self.budgets.find_by_travel(travel_id).await? else {
            return Ok(None);
        };
        let expenses = self.expenses.list_by_travel(travel_id).await?;
        let analytics = ExpenseAnalytics::from_expenses(&expenses)?;
        BudgetUtilization::compute(&budget, &analytics).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::{CategoryBudget, EngineError, Share, SplitKind};

    fn expense(category: &str, paid_by: &str, amount: i64, shares: &[(&str, i64)]) -> Expense {
        let now = Utc::now();
        Expense {
            id: Uuid::new_v4(),
            travel_id: "t1".to_string(),
            amount: MoneyCents::new(amount),
            title: "x".to_string(),
            category_id: category.to_string(),
            paid_by: paid_by.to_string(),
            split_kind: SplitKind::Custom,
            date: now,
            memo: None,
            receipt_image: None,
            itinerary_item_id: None,
            created_by: paid_by.to_string(),
            created_at: now,
            updated_at: now,
            revision: 0,
            shares: shares
                .iter()
                .map(|(user, cents)| Share::new(*user, MoneyCents::new(*cents)))
                .collect(),
        }
    }

    #[test]
    fn balances_follow_paid_minus_owed() {
        let expenses = vec![
            expense("food", "u1", 9999, &[("u1", 3333), ("u2", 3333), ("u3", 3333)]),
            expense("transport", "u2", 1000, &[("u1", 500), ("u2", 500)]),
        ];
        let analytics = ExpenseAnalytics::from_expenses(&expenses).unwrap();

        assert_eq!(analytics.total_amount, MoneyCents::new(10_999));
        assert_eq!(analytics.expense_count, 2);
        assert_eq!(analytics.category_totals["food"], MoneyCents::new(9999));
        assert_eq!(analytics.payer_totals["u2"], MoneyCents::new(1000));
        assert_eq!(analytics.balances["u1"], MoneyCents::new(6166));
        assert_eq!(analytics.balances["u2"], MoneyCents::new(-2833));
        assert_eq!(analytics.balances["u3"], MoneyCents::new(-3333));
        assert_eq!(analytics.balance_sum().unwrap(), MoneyCents::ZERO);
    }

    #[test]
    fn empty_travel_has_zero_totals() {
        let analytics = ExpenseAnalytics::from_expenses(&[]).unwrap();
        assert_eq!(analytics, ExpenseAnalytics::default());
    }

    #[test]
    fn utilization_reports_remaining_per_category() {
        let now = Utc::now();
        let budget = Budget {
            id: Uuid::new_v4(),
            travel_id: "t1".to_string(),
            total_budget: Some(MoneyCents::new(50_000)),
            category_budgets: vec![
                CategoryBudget::new("food", MoneyCents::new(10_000)),
                CategoryBudget::new("shopping", MoneyCents::new(5_000)),
            ],
            created_by: "u1".to_string(),
            created_at: now,
            updated_at: now,
        };
        let analytics = ExpenseAnalytics::from_expenses(&[expense(
            "food",
            "u1",
            12_000,
            &[("u1", 12_000)],
        )])
        .unwrap();

        let report = BudgetUtilization::compute(&budget, &analytics).unwrap();
        assert_eq!(report.total_spent, MoneyCents::new(12_000));
        assert_eq!(report.remaining, Some(MoneyCents::new(38_000)));
        assert_eq!(report.categories[0].remaining, MoneyCents::new(-2_000));
        assert_eq!(report.categories[1].spent, MoneyCents::ZERO);
    }

    #[test]
    fn totals_beyond_i64_are_rejected() {
        let half = i64::MAX / 2 + 1;
        let expenses = vec![
            expense("food", "u1", half, &[("u1", half)]),
            expense("food", "u1", half, &[("u1", half)]),
        ];
        assert!(matches!(
            ExpenseAnalytics::from_expenses(&expenses),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
