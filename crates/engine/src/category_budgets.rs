use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::CategoryBudget;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "category_budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub budget_id: String,
    pub category_id: String,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Budgets,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn active_models(budget_id: Uuid, rows: &[CategoryBudget]) -> Vec<ActiveModel> {
    rows.iter()
        .map(|row| ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            budget_id: ActiveValue::Set(budget_id.to_string()),
            category_id: ActiveValue::Set(row.category_id.clone()),
            amount_minor: ActiveValue::Set(row.amount.cents()),
        })
        .collect()
}
