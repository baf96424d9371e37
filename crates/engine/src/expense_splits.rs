//! Expense splits.
//!
//! One row per participant of an expense. `position` keeps the participant
//! order the split was allocated with, so re-reads see the same order and an
//! equal split keeps its extra cents on the same participants.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{MoneyCents, Share};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_id: String,
    pub user_id: String,
    pub amount_minor: i64,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Builds the rows for `shares`, numbering them in order.
pub(crate) fn active_models(expense_id: Uuid, shares: &[Share]) -> Vec<ActiveModel> {
    shares
        .iter()
        .zip(0i32..)
        .map(|(share, position)| ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            expense_id: ActiveValue::Set(expense_id.to_string()),
            user_id: ActiveValue::Set(share.user_id.clone()),
            amount_minor: ActiveValue::Set(share.amount.cents()),
            position: ActiveValue::Set(position),
        })
        .collect()
}

impl From<Model> for Share {
    fn from(model: Model) -> Self {
        Share::new(model.user_id, MoneyCents::new(model.amount_minor))
    }
}
