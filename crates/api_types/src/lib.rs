//! Wire types of the HTTP API.
//!
//! Field names are camelCase on the wire. Money amounts are JSON integers in
//! minor units (`9999` is 99.99).

use serde::{Deserialize, Serialize};

/// Query string selecting a travel: `?travelId=...`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelQuery {
    pub travel_id: String,
}

/// Body of every error response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserSummary {
        pub id: String,
        pub name: String,
        pub email: String,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: String,
        pub name: String,
        pub color: String,
        pub icon: String,
    }
}

pub mod expense {
    use chrono::{DateTime, Utc};

    use super::{category::CategoryView, user::UserSummary, *};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum SplitMethod {
        Equal,
        Custom,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomSplit {
        pub user_id: String,
        pub amount: i64,
    }

    /// `POST /travels/{travelId}/expenses`
    ///
    /// `date` accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        pub amount: i64,
        pub title: String,
        pub category_id: String,
        pub paid_by: String,
        pub split_between: Vec<String>,
        pub split_method: SplitMethod,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub custom_splits: Option<Vec<CustomSplit>>,
        pub date: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub memo: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub receipt_image: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub itinerary_item_id: Option<String>,
    }

    /// `PATCH /expenses/{id}`: every field is optional.
    ///
    /// For `memo`, `receiptImage` and `itineraryItemId` an empty string clears
    /// the stored value.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub paid_by: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub split_between: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub split_method: Option<SplitMethod>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub custom_splits: Option<Vec<CustomSplit>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub date: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub memo: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub receipt_image: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub itinerary_item_id: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SplitView {
        pub user_id: String,
        pub amount: i64,
        pub user: Option<UserSummary>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: String,
        pub travel_id: String,
        pub amount: i64,
        pub title: String,
        pub category_id: String,
        pub category: Option<CategoryView>,
        pub paid_by: String,
        pub payer: Option<UserSummary>,
        pub created_by: String,
        pub creator: Option<UserSummary>,
        pub split_method: SplitMethod,
        pub split_between: Vec<String>,
        /// Present only for custom splits.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub custom_splits: Option<Vec<CustomSplit>>,
        pub splits: Vec<SplitView>,
        pub date: DateTime<Utc>,
        pub memo: Option<String>,
        pub receipt_image: Option<String>,
        pub itinerary_item_id: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub revision: i64,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DeleteMessage {
        pub message: String,
    }
}

pub mod budget {
    use chrono::{DateTime, Utc};

    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryBudgetView {
        pub category_id: String,
        pub amount: i64,
    }

    /// `POST /travels/{travelId}/budgets`
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetUpsert {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub total_budget: Option<i64>,
        /// Replaces every stored category budget when present.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category_budgets: Option<Vec<CategoryBudgetView>>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetView {
        pub id: String,
        pub travel_id: String,
        pub total_budget: Option<i64>,
        pub category_budgets: Vec<CategoryBudgetView>,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod analytics {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AnalyticsView {
        pub total_amount: i64,
        pub category_totals: BTreeMap<String, i64>,
        pub payer_totals: BTreeMap<String, i64>,
        pub balances: BTreeMap<String, i64>,
        pub expense_count: usize,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryUtilizationView {
        pub category_id: String,
        pub budgeted: i64,
        pub spent: i64,
        pub remaining: i64,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetUtilizationView {
        pub total_budget: Option<i64>,
        pub total_spent: i64,
        pub remaining: Option<i64>,
        pub categories: Vec<CategoryUtilizationView>,
    }
}
