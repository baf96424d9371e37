//! Expense primitives.
//!
//! An [`Expense`] is paid by one member and divided among one or more
//! participants through its [`Share`]s. The shares of a persisted expense
//! always add up to its amount.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine, Share, SplitKind, expense_splits, util::parse_uuid,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub travel_id: String,
    pub amount: MoneyCents,
    pub title: String,
    pub category_id: String,
    pub paid_by: String,
    pub split_kind: SplitKind,
    pub date: DateTime<Utc>,
    pub memo: Option<String>,
    pub receipt_image: Option<String>,
    pub itinerary_item_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped on every update; used to detect concurrent writers.
    pub revision: i64,
    pub shares: Vec<Share>,
}

impl Expense {
    /// Participant ids in allocation order.
    pub fn participants(&self) -> Vec<String> {
        self.shares.iter().map(|s| s.user_id.clone()).collect()
    }

    /// Sum of the shares. Equal to `amount` for any persisted expense.
    pub fn shares_total(&self) -> ResultEngine<MoneyCents> {
        MoneyCents::checked_sum(self.shares.iter().map(|s| s.amount))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub travel_id: String,
    pub amount_minor: i64,
    pub title: String,
    pub category_id: String,
    pub paid_by: String,
    pub split_method: String,
    pub date: DateTimeUtc,
    pub memo: Option<String>,
    pub receipt_image: Option<String>,
    pub itinerary_item_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub revision: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expense_splits::Entity")]
    Splits,
    #[sea_orm(
        belongs_to = "super::travels::Entity",
        from = "Column::TravelId",
        to = "super::travels::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Travels,
}

impl Related<super::expense_splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl Related<super::travels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Travels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            travel_id: ActiveValue::Set(expense.travel_id.clone()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            title: ActiveValue::Set(expense.title.clone()),
            category_id: ActiveValue::Set(expense.category_id.clone()),
            paid_by: ActiveValue::Set(expense.paid_by.clone()),
            split_method: ActiveValue::Set(expense.split_kind.as_str().to_string()),
            date: ActiveValue::Set(expense.date),
            memo: ActiveValue::Set(expense.memo.clone()),
            receipt_image: ActiveValue::Set(expense.receipt_image.clone()),
            itinerary_item_id: ActiveValue::Set(expense.itinerary_item_id.clone()),
            created_by: ActiveValue::Set(expense.created_by.clone()),
            created_at: ActiveValue::Set(expense.created_at),
            updated_at: ActiveValue::Set(expense.updated_at),
            revision: ActiveValue::Set(expense.revision),
        }
    }
}

impl TryFrom<(Model, Vec<expense_splits::Model>)> for Expense {
    type Error = EngineError;

    fn try_from((model, mut splits): (Model, Vec<expense_splits::Model>)) -> Result<Self, Self::Error> {
        splits.sort_by_key(|split| split.position);
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            travel_id: model.travel_id,
            amount: MoneyCents::new(model.amount_minor),
            title: model.title,
            category_id: model.category_id,
            paid_by: model.paid_by,
            split_kind: SplitKind::try_from(model.split_method.as_str())?,
            date: model.date,
            memo: model.memo,
            receipt_image: model.receipt_image,
            itinerary_item_id: model.itinerary_item_id,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
            revision: model.revision,
            shares: splits.into_iter().map(Share::from).collect(),
        })
    }
}
