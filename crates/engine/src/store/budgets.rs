use async_trait::async_trait;
use sea_orm::{ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, prelude::*};

use crate::{Budget, ResultEngine, budgets, category_budgets, util::parse_uuid};

use super::{BudgetRepository, with_transaction};

/// sea-orm backed [`BudgetRepository`].
#[derive(Clone, Debug)]
pub struct SqlBudgetRepository {
    database: DatabaseConnection,
}

impl SqlBudgetRepository {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl BudgetRepository for SqlBudgetRepository {
    async fn find_by_travel(&self, travel_id: &str) -> ResultEngine<Option<Budget>> {
        let Some(model) = budgets::Entity::find()
            .filter(budgets::Column::TravelId.eq(travel_id.to_string()))
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        let categories = category_budgets::Entity::find()
            .filter(category_budgets::Column::BudgetId.eq(model.id.clone()))
            .order_by_asc(category_budgets::Column::CategoryId)
            .all(&self.database)
            .await?;
        Budget::try_from((model, categories)).map(Some)
    }

    async fn upsert(&self, budget: &Budget, replace_categories: bool) -> ResultEngine<()> {
        let budget = budget.clone();
        with_transaction(&self.database, move |db_tx| {
            Box::pin(async move {
                let existing = budgets::Entity::find()
                    .filter(budgets::Column::TravelId.eq(budget.travel_id.clone()))
                    .one(db_tx)
                    .await?;

                let budget_id = match existing {
                    Some(model) => {
                        let active = budgets::ActiveModel {
                            id: ActiveValue::Unchanged(model.id.clone()),
                            total_budget_minor: ActiveValue::Set(
                                budget.total_budget.map(|total| total.cents()),
                            ),
                            updated_at: ActiveValue::Set(budget.updated_at),
                            ..Default::default()
                        };
                        active.update(db_tx).await?;
                        model.id
                    }
                    None => {
                        budgets::ActiveModel::from(&budget).insert(db_tx).await?;
                        budget.id.to_string()
                    }
                };

                if replace_categories {
                    category_budgets::Entity::delete_many()
                        .filter(category_budgets::Column::BudgetId.eq(budget_id.clone()))
                        .exec(db_tx)
                        .await?;
                    let budget_uuid = parse_uuid(&budget_id, "budget")?;
                    for row in category_budgets::active_models(budget_uuid, &budget.category_budgets)
                    {
                        row.insert(db_tx).await?;
                    }
                }
                Ok(())
            })
        })
        .await
    }
}
