//! Read-only aggregates over the expenses of a travel.

use std::collections::BTreeMap;

use api_types::analytics::{AnalyticsView, BudgetUtilizationView, CategoryUtilizationView};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{MoneyCents, UserIdentity};

use crate::{ServerError, server::ServerState};

fn to_cents(map: BTreeMap<String, MoneyCents>) -> BTreeMap<String, i64> {
    map.into_iter()
        .map(|(key, amount)| (key, amount.cents()))
        .collect()
}

pub async fn expense_analytics(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(travel_id): Path<String>,
) -> Result<Json<AnalyticsView>, ServerError> {
    let analytics = state.engine.expense_analytics(&travel_id, &user.id).await?;
    Ok(Json(AnalyticsView {
        total_amount: analytics.total_amount.cents(),
        category_totals: to_cents(analytics.category_totals),
        payer_totals: to_cents(analytics.payer_totals),
        balances: to_cents(analytics.balances),
        expense_count: analytics.expense_count,
    }))
}

/// Answers `null` when the travel has no budget.
pub async fn budget_utilization(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(travel_id): Path<String>,
) -> Result<Json<Option<BudgetUtilizationView>>, ServerError> {
    let utilization = state.engine.budget_utilization(&travel_id, &user.id).await?;
    Ok(Json(utilization.map(|utilization| BudgetUtilizationView {
        total_budget: utilization.total_budget.map(MoneyCents::cents),
        total_spent: utilization.total_spent.cents(),
        remaining: utilization.remaining.map(MoneyCents::cents),
        categories: utilization
            .categories
            .into_iter()
            .map(|row| CategoryUtilizationView {
                category_id: row.category_id,
                budgeted: row.budgeted.cents(),
                spent: row.spent.cents(),
                remaining: row.remaining.cents(),
            })
            .collect(),
    })))
}
