//! Expense category endpoints.

use api_types::category::CategoryView;
use axum::{Extension, Json, extract::State};
use engine::UserIdentity;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_category(category: engine::ExpenseCategory) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        color: category.color,
        icon: category.icon,
    }
}

/// Lists the categories. Open to every authenticated user.
pub async fn list(
    _: Extension<UserIdentity>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.expense_categories().await?;
    Ok(Json(categories.into_iter().map(map_category).collect()))
}
