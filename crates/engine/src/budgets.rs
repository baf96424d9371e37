//! Travel budgets.
//!
//! A travel has at most one [`Budget`]: an optional overall total plus zero or
//! more per-category caps. Category caps are replaced wholesale on update.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, category_budgets, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category_id: String,
    pub amount: MoneyCents,
}

impl CategoryBudget {
    pub fn new(category_id: impl Into<String>, amount: MoneyCents) -> Self {
        Self {
            category_id: category_id.into(),
            amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub travel_id: String,
    pub total_budget: Option<MoneyCents>,
    pub category_budgets: Vec<CategoryBudget>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub travel_id: String,
    pub total_budget_minor: Option<i64>,
    pub created_by: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::category_budgets::Entity")]
    CategoryBudgets,
}

impl Related<super::category_budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryBudgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id.to_string()),
            travel_id: ActiveValue::Set(budget.travel_id.clone()),
            total_budget_minor: ActiveValue::Set(budget.total_budget.map(MoneyCents::cents)),
            created_by: ActiveValue::Set(budget.created_by.clone()),
            created_at: ActiveValue::Set(budget.created_at),
            updated_at: ActiveValue::Set(budget.updated_at),
        }
    }
}

impl TryFrom<(Model, Vec<category_budgets::Model>)> for Budget {
    type Error = EngineError;

    fn try_from((model, categories): (Model, Vec<category_budgets::Model>)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "budget")?,
            travel_id: model.travel_id,
            total_budget: model.total_budget_minor.map(MoneyCents::new),
            category_budgets: categories
                .into_iter()
                .map(|row| CategoryBudget::new(row.category_id, MoneyCents::new(row.amount_minor)))
                .collect(),
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
