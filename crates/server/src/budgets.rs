use api_types::{
    TravelQuery,
    budget::{BudgetUpsert, BudgetView, CategoryBudgetView},
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use engine::{Budget, CategoryBudget, MoneyCents, UpsertBudgetCmd, UserIdentity};

use crate::{ServerError, server::ServerState};

fn map_budget(budget: Budget) -> BudgetView {
    BudgetView {
        id: budget.id.to_string(),
        travel_id: budget.travel_id,
        total_budget: budget.total_budget.map(MoneyCents::cents),
        category_budgets: budget
            .category_budgets
            .into_iter()
            .map(|row| CategoryBudgetView {
                category_id: row.category_id,
                amount: row.amount.cents(),
            })
            .collect(),
        created_by: budget.created_by,
        created_at: budget.created_at,
        updated_at: budget.updated_at,
    }
}

/// `GET /budgets?travelId=...`. Answers `null` when no budget is set.
pub async fn get(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    query: Result<Query<TravelQuery>, QueryRejection>,
) -> Result<Json<Option<BudgetView>>, ServerError> {
    let Query(query) = query?;
    let budget = state.engine.budget(&query.travel_id, &user.id).await?;
    Ok(Json(budget.map(map_budget)))
}

pub async fn upsert(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(travel_id): Path<String>,
    payload: Result<Json<BudgetUpsert>, JsonRejection>,
) -> Result<Json<BudgetView>, ServerError> {
    let Json(payload) = payload?;
    let mut cmd = UpsertBudgetCmd::new(travel_id, user.id);
    if let Some(total) = payload.total_budget {
        cmd = cmd.total_budget(MoneyCents::new(total));
    }
    if let Some(rows) = payload.category_budgets {
        cmd = cmd.category_budgets(
            rows.into_iter()
                .map(|row| CategoryBudget::new(row.category_id, MoneyCents::new(row.amount)))
                .collect(),
        );
    }

    let budget = state.engine.upsert_budget(cmd).await?;
    Ok(Json(map_budget(budget)))
}
