//! Expense endpoints.

use api_types::{
    TravelQuery,
    expense::{
        CustomSplit, DeleteMessage, ExpenseNew, ExpenseUpdate, ExpenseView,
        SplitMethod as WireSplitMethod, SplitView,
    },
    user::UserSummary,
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use engine::{
    CreateExpenseCmd, EngineError, ExpenseDetail, MoneyCents, Share, SplitKind, SplitMethod,
    UpdateExpenseCmd, UserIdentity,
};
use uuid::Uuid;

use crate::{ServerError, categories::map_category, server::ServerState};

fn map_user(user: &UserIdentity) -> UserSummary {
    UserSummary {
        id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
    }
}

fn map_kind(kind: SplitKind) -> WireSplitMethod {
    match kind {
        SplitKind::Equal => WireSplitMethod::Equal,
        SplitKind::Custom => WireSplitMethod::Custom,
    }
}

fn unmap_kind(kind: WireSplitMethod) -> SplitKind {
    match kind {
        WireSplitMethod::Equal => SplitKind::Equal,
        WireSplitMethod::Custom => SplitKind::Custom,
    }
}

fn shares_from_wire(entries: Vec<CustomSplit>) -> Vec<Share> {
    entries
        .into_iter()
        .map(|entry| Share::new(entry.user_id, MoneyCents::new(entry.amount)))
        .collect()
}

/// Turns the flag + optional list of the wire format into a [`SplitMethod`].
fn split_from_wire(
    method: WireSplitMethod,
    custom_splits: Option<Vec<CustomSplit>>,
) -> Result<SplitMethod, EngineError> {
    match (method, custom_splits) {
        (WireSplitMethod::Equal, None) => Ok(SplitMethod::Equal),
        (WireSplitMethod::Equal, Some(_)) => Err(EngineError::InvalidSplit(
            "customSplits is only allowed with splitMethod \"custom\"".to_string(),
        )),
        (WireSplitMethod::Custom, Some(entries)) => {
            Ok(SplitMethod::Custom(shares_from_wire(entries)))
        }
        (WireSplitMethod::Custom, None) => Err(EngineError::InvalidSplit(
            "customSplits is required with splitMethod \"custom\"".to_string(),
        )),
    }
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn parse_date(value: &str) -> Result<DateTime<Utc>, EngineError> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| EngineError::InvalidInput(format!("invalid date: {value}")))
}

fn map_expense(detail: ExpenseDetail) -> ExpenseView {
    let ExpenseDetail {
        expense,
        category,
        people,
    } = detail;
    let person = |id: &str| people.get(id).map(map_user);

    let custom_splits = (expense.split_kind == SplitKind::Custom).then(|| {
        expense
            .shares
            .iter()
            .map(|share| CustomSplit {
                user_id: share.user_id.clone(),
                amount: share.amount.cents(),
            })
            .collect()
    });
    let splits = expense
        .shares
        .iter()
        .map(|share| SplitView {
            user_id: share.user_id.clone(),
            amount: share.amount.cents(),
            user: person(&share.user_id),
        })
        .collect();

    ExpenseView {
        id: expense.id.to_string(),
        split_between: expense.participants(),
        payer: person(&expense.paid_by),
        creator: person(&expense.created_by),
        travel_id: expense.travel_id,
        amount: expense.amount.cents(),
        title: expense.title,
        category_id: expense.category_id,
        category: category.map(map_category),
        paid_by: expense.paid_by,
        created_by: expense.created_by,
        split_method: map_kind(expense.split_kind),
        custom_splits,
        splits,
        date: expense.date,
        memo: expense.memo,
        receipt_image: expense.receipt_image,
        itinerary_item_id: expense.itinerary_item_id,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
        revision: expense.revision,
    }
}

pub async fn list(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    query: Result<Query<TravelQuery>, QueryRejection>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let Query(query) = query?;
    let expenses = state
        .engine
        .expenses_by_travel(&query.travel_id, &user.id)
        .await?;
    Ok(Json(expenses.into_iter().map(map_expense).collect()))
}

pub async fn get(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let Path(id) = id?;
    let detail = state.engine.expense(id, &user.id).await?;
    Ok(Json(map_expense(detail)))
}

pub async fn create(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    Path(travel_id): Path<String>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let Json(payload) = payload?;
    let split = split_from_wire(payload.split_method, payload.custom_splits)?;
    let date = parse_date(&payload.date)?;

    let mut cmd = CreateExpenseCmd::new(
        travel_id,
        user.id,
        MoneyCents::new(payload.amount),
        payload.title,
        payload.category_id,
        payload.paid_by,
        date,
    )
    .participants(payload.split_between)
    .split(split);
    if let Some(memo) = payload.memo {
        cmd = cmd.memo(memo);
    }
    if let Some(reference) = payload.receipt_image {
        cmd = cmd.receipt_image(reference);
    }
    if let Some(item_id) = payload.itinerary_item_id {
        cmd = cmd.itinerary_item_id(item_id);
    }

    let detail = state.engine.create_expense(cmd).await?;
    Ok((StatusCode::CREATED, Json(map_expense(detail))))
}

pub async fn update(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    if payload.split_method == Some(WireSplitMethod::Equal) && payload.custom_splits.is_some() {
        return Err(EngineError::InvalidSplit(
            "customSplits is only allowed with splitMethod \"custom\"".to_string(),
        )
        .into());
    }

    let mut cmd = UpdateExpenseCmd::new(id, user.id);
    cmd.amount = payload.amount.map(MoneyCents::new);
    cmd.title = payload.title;
    cmd.category_id = payload.category_id;
    cmd.paid_by = payload.paid_by;
    cmd.participants = payload.split_between;
    cmd.split_kind = payload.split_method.map(unmap_kind);
    cmd.custom_shares = payload.custom_splits.map(shares_from_wire);
    cmd.date = payload.date.as_deref().map(parse_date).transpose()?;
    cmd.memo = payload.memo.map(Some);
    cmd.receipt_image = payload.receipt_image.map(Some);
    cmd.itinerary_item_id = payload.itinerary_item_id.map(Some);

    let detail = state.engine.update_expense(cmd).await?;
    Ok(Json(map_expense(detail)))
}

pub async fn delete(
    Extension(user): Extension<UserIdentity>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeleteMessage>, ServerError> {
    let Path(id) = id?;
    state.engine.delete_expense(id, &user.id).await?;
    Ok(Json(DeleteMessage {
        message: "Expense deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_split_flags_must_agree_with_entries() {
        assert_eq!(
            split_from_wire(WireSplitMethod::Equal, None).unwrap(),
            SplitMethod::Equal
        );
        assert!(split_from_wire(WireSplitMethod::Equal, Some(Vec::new())).is_err());
        assert!(split_from_wire(WireSplitMethod::Custom, None).is_err());

        let method = split_from_wire(
            WireSplitMethod::Custom,
            Some(vec![CustomSplit {
                user_id: "a".to_string(),
                amount: 250,
            }]),
        )
        .unwrap();
        assert_eq!(
            method,
            SplitMethod::Custom(vec![Share::new("a", MoneyCents::new(250))])
        );
    }

    #[test]
    fn dates_accept_timestamps_and_plain_days() {
        let day = parse_date("2025-04-02").unwrap();
        assert_eq!(day.to_rfc3339(), "2025-04-02T00:00:00+00:00");

        let at = parse_date("2025-04-02T10:30:00+02:00").unwrap();
        assert_eq!(at.to_rfc3339(), "2025-04-02T08:30:00+00:00");

        assert!(parse_date("02/04/2025").is_err());
    }
}
