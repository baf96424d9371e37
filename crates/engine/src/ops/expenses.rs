use chrono::Utc;
use uuid::Uuid;

use crate::{
    CreateExpenseCmd, EngineError, Expense, ExpenseCategory, ResultEngine, Share, SplitKind,
    SplitMethod, TravelGroup, UpdateExpenseCmd, allocate,
    util::{normalize_optional_text, normalize_required_text},
};

use super::{Engine, ExpenseDetail};

impl Engine {
    /// Lists the seeded expense categories.
    pub async fn expense_categories(&self) -> ResultEngine<Vec<ExpenseCategory>> {
        self.expenses.categories().await
    }

    /// Lists the expenses of a travel, newest first.
    pub async fn expenses_by_travel(
        &self,
        travel_id: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<ExpenseDetail>> {
        self.gate.require_member(travel_id, user_id).await?;
        let expenses = self.expenses.list_by_travel(travel_id).await?;
        self.details(expenses).await
    }

    /// Returns a single expense.
    pub async fn expense(&self, expense_id: Uuid, user_id: &str) -> ResultEngine<ExpenseDetail> {
        let expense = self.require_expense(expense_id).await?;
        self.gate.require_member(&expense.travel_id, user_id).await?;
        self.detail(expense).await
    }

    /// Records an expense and its splits.
    ///
    /// Membership, payload and allocation are all checked before anything is
    /// written; the expense and its splits are then stored in one transaction.
    pub async fn create_expense(&self, cmd: CreateExpenseCmd) -> ResultEngine<ExpenseDetail> {
        let group = self.gate.require_member(&cmd.travel_id, &cmd.user_id).await?;

        let title = normalize_required_text(&cmd.title, "title")?;
        self.require_category(&cmd.category_id).await?;
        require_in_group(&group, &cmd.paid_by, "payer")?;
        for participant in &cmd.participants {
            require_in_group(&group, participant, "participant")?;
        }
        let shares = allocate(cmd.amount, &cmd.split, &cmd.participants)?;

        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            travel_id: cmd.travel_id,
            amount: cmd.amount,
            title,
            category_id: cmd.category_id,
            paid_by: cmd.paid_by,
            split_kind: cmd.split.kind(),
            date: cmd.date,
            memo: normalize_optional_text(cmd.memo.as_deref()),
            receipt_image: normalize_optional_text(cmd.receipt_image.as_deref()),
            itinerary_item_id: normalize_optional_text(cmd.itinerary_item_id.as_deref()),
            created_by: cmd.user_id,
            created_at: now,
            updated_at: now,
            revision: 0,
            shares,
        };
        self.expenses.insert(&expense).await?;
        tracing::info!(
            expense_id = %expense.id,
            travel_id = %expense.travel_id,
            amount = expense.amount.cents(),
            "expense created"
        );
        self.detail(expense).await
    }

    /// Applies a partial update.
    ///
    /// When the amount or any split input changes, the splits are re-allocated
    /// from the merged values and replaced as a whole. The write fails with
    /// [`EngineError::Conflict`] if another update committed in between.
    pub async fn update_expense(&self, cmd: UpdateExpenseCmd) -> ResultEngine<ExpenseDetail> {
        let stored = self.require_expense(cmd.expense_id).await?;
        let group = self.gate.require_member(&stored.travel_id, &cmd.user_id).await?;

        let replace_shares = cmd.touches_split();
        let mut updated = stored.clone();

        if let Some(title) = cmd.title.as_deref() {
            updated.title = normalize_required_text(title, "title")?;
        }
        if let Some(category_id) = cmd.category_id {
            self.require_category(&category_id).await?;
            updated.category_id = category_id;
        }
        if let Some(paid_by) = cmd.paid_by {
            require_in_group(&group, &paid_by, "payer")?;
            updated.paid_by = paid_by;
        }
        if let Some(date) = cmd.date {
            updated.date = date;
        }
        if let Some(memo) = cmd.memo {
            updated.memo = normalize_optional_text(memo.as_deref());
        }
        if let Some(reference) = cmd.receipt_image {
            updated.receipt_image = normalize_optional_text(reference.as_deref());
        }
        if let Some(item_id) = cmd.itinerary_item_id {
            updated.itinerary_item_id = normalize_optional_text(item_id.as_deref());
        }

        if replace_shares {
            let amount = cmd.amount.unwrap_or(stored.amount);
            let participants = cmd.participants.unwrap_or_else(|| stored.participants());
            for participant in &participants {
                require_in_group(&group, participant, "participant")?;
            }
            let method = merged_split(&stored, cmd.split_kind, cmd.custom_shares)?;
            updated.shares = allocate(amount, &method, &participants)?;
            updated.amount = amount;
            updated.split_kind = method.kind();
        }

        updated.revision = stored.revision + 1;
        updated.updated_at = Utc::now();
        self.expenses
            .update(&updated, replace_shares, stored.revision)
            .await?;
        tracing::info!(
            expense_id = %updated.id,
            travel_id = %updated.travel_id,
            revision = updated.revision,
            replaced_shares = replace_shares,
            "expense updated"
        );
        self.detail(updated).await
    }

    /// Deletes an expense together with its splits.
    pub async fn delete_expense(&self, expense_id: Uuid, user_id: &str) -> ResultEngine<()> {
        let stored = self.require_expense(expense_id).await?;
        self.gate.require_member(&stored.travel_id, user_id).await?;
        if !self.expenses.delete(expense_id).await? {
            return Err(EngineError::KeyNotFound("expense not exists".to_string()));
        }
        tracing::info!(
            expense_id = %expense_id,
            travel_id = %stored.travel_id,
            "expense deleted"
        );
        Ok(())
    }

    async fn require_expense(&self, expense_id: Uuid) -> ResultEngine<Expense> {
        self.expenses
            .find(expense_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))
    }

    async fn require_category(&self, category_id: &str) -> ResultEngine<ExpenseCategory> {
        self.expenses
            .category(category_id)
            .await?
            .ok_or_else(|| EngineError::InvalidInput(format!("unknown category: {category_id}")))
    }
}

fn require_in_group(group: &TravelGroup, user_id: &str, label: &str) -> ResultEngine<()> {
    if !group.admits(user_id) {
        return Err(EngineError::InvalidInput(format!(
            "{label} '{user_id}' is not a member of this travel group"
        )));
    }
    Ok(())
}

/// Final split method of an update: the new kind if given, else the stored one.
///
/// A custom split without new entries re-uses the stored shares, which are
/// then checked again against the final amount and participants.
fn merged_split(
    stored: &Expense,
    kind: Option<SplitKind>,
    custom_shares: Option<Vec<Share>>,
) -> ResultEngine<SplitMethod> {
    match kind.unwrap_or(stored.split_kind) {
        SplitKind::Equal => {
            if custom_shares.is_some() {
                return Err(EngineError::InvalidSplit(
                    "custom amounts require the custom split method".to_string(),
                ));
            }
            Ok(SplitMethod::Equal)
        }
        SplitKind::Custom => Ok(SplitMethod::Custom(
            custom_shares.unwrap_or_else(|| stored.shares.clone()),
        )),
    }
}
