use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveValue, DatabaseConnection, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseCategory, ResultEngine, Share, expense_categories,
    expense_splits, expenses,
};

use super::{ExpenseRepository, with_transaction};

/// sea-orm backed [`ExpenseRepository`].
#[derive(Clone, Debug)]
pub struct SqlExpenseRepository {
    database: DatabaseConnection,
}

impl SqlExpenseRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    async fn split_rows(&self, expense_ids: Vec<String>) -> ResultEngine<Vec<expense_splits::Model>> {
        if expense_ids.is_empty() {
            return Ok(Vec::new());
        }
        expense_splits::Entity::find()
            .filter(expense_splits::Column::ExpenseId.is_in(expense_ids))
            .order_by_asc(expense_splits::Column::Position)
            .all(&self.database)
            .await
            .map_err(Into::into)
    }
}

async fn insert_shares(
    db_tx: &DatabaseTransaction,
    expense_id: Uuid,
    shares: &[Share],
) -> ResultEngine<()> {
    for split in expense_splits::active_models(expense_id, shares) {
        split.insert(db_tx).await?;
    }
    Ok(())
}

async fn delete_shares(db_tx: &DatabaseTransaction, expense_id: Uuid) -> ResultEngine<u64> {
    let result = expense_splits::Entity::delete_many()
        .filter(expense_splits::Column::ExpenseId.eq(expense_id.to_string()))
        .exec(db_tx)
        .await?;
    Ok(result.rows_affected)
}

#[async_trait]
impl ExpenseRepository for SqlExpenseRepository {
    async fn categories(&self) -> ResultEngine<Vec<ExpenseCategory>> {
        let rows = expense_categories::Entity::find()
            .order_by_asc(expense_categories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(ExpenseCategory::from).collect())
    }

    async fn category(&self, category_id: &str) -> ResultEngine<Option<ExpenseCategory>> {
        let row = expense_categories::Entity::find_by_id(category_id.to_string())
            .one(&self.database)
            .await?;
        Ok(row.map(ExpenseCategory::from))
    }

    async fn find(&self, expense_id: Uuid) -> ResultEngine<Option<Expense>> {
        let Some(model) = expenses::Entity::find_by_id(expense_id.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        let splits = self.split_rows(vec![model.id.clone()]).await?;
        Expense::try_from((model, splits)).map(Some)
    }

    async fn list_by_travel(&self, travel_id: &str) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::TravelId.eq(travel_id.to_string()))
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;

        let ids = models.iter().map(|m| m.id.clone()).collect();
        let mut splits_by_expense: HashMap<String, Vec<expense_splits::Model>> = HashMap::new();
        for split in self.split_rows(ids).await? {
            splits_by_expense
                .entry(split.expense_id.clone())
                .or_default()
                .push(split);
        }

        models
            .into_iter()
            .map(|model| {
                let splits = splits_by_expense.remove(&model.id).unwrap_or_default();
                Expense::try_from((model, splits))
            })
            .collect()
    }

    async fn shares_of(&self, expense_id: Uuid) -> ResultEngine<Vec<Share>> {
        let rows = self.split_rows(vec![expense_id.to_string()]).await?;
        Ok(rows.into_iter().map(Share::from).collect())
    }

    async fn insert(&self, expense: &Expense) -> ResultEngine<()> {
        let expense = expense.clone();
        with_transaction(&self.database, move |db_tx| {
            Box::pin(async move {
                expenses::ActiveModel::from(&expense).insert(db_tx).await?;
                insert_shares(db_tx, expense.id, &expense.shares).await
            })
        })
        .await
    }

    async fn update(
        &self,
        expense: &Expense,
        replace_shares: bool,
        expected_revision: i64,
    ) -> ResultEngine<()> {
        let expense = expense.clone();
        with_transaction(&self.database, move |db_tx| {
            Box::pin(async move {
                let mut active = expenses::ActiveModel::from(&expense);
                active.id = ActiveValue::NotSet;
                active.created_at = ActiveValue::NotSet;
                active.created_by = ActiveValue::NotSet;
                let result = expenses::Entity::update_many()
                    .set(active)
                    .filter(expenses::Column::Id.eq(expense.id.to_string()))
                    .filter(expenses::Column::Revision.eq(expected_revision))
                    .exec(db_tx)
                    .await?;
                if result.rows_affected == 0 {
                    let still_there = expenses::Entity::find_by_id(expense.id.to_string())
                        .one(db_tx)
                        .await?
                        .is_some();
                    return Err(if still_there {
                        EngineError::Conflict("expense was modified concurrently".to_string())
                    } else {
                        EngineError::KeyNotFound("expense not exists".to_string())
                    });
                }

                if replace_shares {
                    delete_shares(db_tx, expense.id).await?;
                    insert_shares(db_tx, expense.id, &expense.shares).await?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn delete(&self, expense_id: Uuid) -> ResultEngine<bool> {
        with_transaction(&self.database, move |db_tx| {
            Box::pin(async move {
                delete_shares(db_tx, expense_id).await?;
                let result = expenses::Entity::delete_by_id(expense_id.to_string())
                    .exec(db_tx)
                    .await?;
                Ok(result.rows_affected > 0)
            })
        })
        .await
    }
}
