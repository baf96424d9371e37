mod common;

use engine::{EngineError, MoneyCents, Share, SplitMethod, UpsertBudgetCmd};

use common::{MEMBERS, STRANGER, TRAVEL, dinner, engine_with_db};

#[tokio::test]
async fn three_way_dinner_balances() {
    let (engine, _db) = engine_with_db().await;
    engine.create_expense(dinner(9999)).await.unwrap();

    let analytics = engine.expense_analytics(TRAVEL, "u3").await.unwrap();

    assert_eq!(analytics.total_amount, MoneyCents::new(9999));
    assert_eq!(analytics.expense_count, 1);
    assert_eq!(analytics.category_totals["food"], MoneyCents::new(9999));
    assert_eq!(analytics.payer_totals["u1"], MoneyCents::new(9999));
    assert_eq!(analytics.balances["u1"], MoneyCents::new(6666));
    assert_eq!(analytics.balances["u2"], MoneyCents::new(-3333));
    assert_eq!(analytics.balances["u3"], MoneyCents::new(-3333));
    assert_eq!(analytics.balance_sum().unwrap(), MoneyCents::ZERO);
}

#[tokio::test]
async fn balances_conserve_across_mixed_expenses() {
    let (engine, _db) = engine_with_db().await;

    let amounts = [1, 2, 101, 9_999, 10_000, 33_333, 77_777];
    for (idx, amount) in amounts.into_iter().enumerate() {
        let payer = MEMBERS[idx % MEMBERS.len()];
        let mut cmd = dinner(amount);
        cmd.paid_by = payer.to_string();
        cmd.category_id = if idx % 2 == 0 { "food" } else { "transport" }.to_string();
        engine.create_expense(cmd).await.unwrap();
    }
    let custom = dinner(5_000)
        .participants(["u2", "u3"])
        .split(SplitMethod::Custom(vec![
            Share::new("u2", MoneyCents::new(4_999)),
            Share::new("u3", MoneyCents::new(1)),
        ]));
    engine.create_expense(custom).await.unwrap();

    let analytics = engine.expense_analytics(TRAVEL, "u1").await.unwrap();
    let expected_total: i64 = amounts.iter().sum::<i64>() + 5_000;

    assert_eq!(analytics.total_amount, MoneyCents::new(expected_total));
    assert_eq!(analytics.expense_count, amounts.len() + 1);
    assert_eq!(analytics.balance_sum().unwrap(), MoneyCents::ZERO);
    let by_category = MoneyCents::checked_sum(analytics.category_totals.values().copied()).unwrap();
    let by_payer = MoneyCents::checked_sum(analytics.payer_totals.values().copied()).unwrap();
    assert_eq!(by_category, analytics.total_amount);
    assert_eq!(by_payer, analytics.total_amount);
}

#[tokio::test]
async fn deleted_expense_drops_out_of_analytics() {
    let (engine, _db) = engine_with_db().await;
    engine.create_expense(dinner(3_000)).await.unwrap();
    let doomed = engine.create_expense(dinner(1_500)).await.unwrap().expense.id;

    engine.delete_expense(doomed, "u1").await.unwrap();
    let analytics = engine.expense_analytics(TRAVEL, "u1").await.unwrap();

    assert_eq!(analytics.total_amount, MoneyCents::new(3_000));
    assert_eq!(analytics.expense_count, 1);
    assert_eq!(analytics.balances["u2"], MoneyCents::new(-1_000));
    assert_eq!(analytics.balance_sum().unwrap(), MoneyCents::ZERO);
}

#[tokio::test]
async fn analytics_of_empty_travel_are_zero() {
    let (engine, _db) = engine_with_db().await;
    let analytics = engine.expense_analytics(TRAVEL, "u1").await.unwrap();
    assert_eq!(analytics.total_amount, MoneyCents::ZERO);
    assert!(analytics.balances.is_empty());
}

#[tokio::test]
async fn analytics_require_membership() {
    let (engine, _db) = engine_with_db().await;
    assert!(matches!(
        engine.expense_analytics(TRAVEL, STRANGER).await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.expense_analytics("missing", "u1").await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn overflowing_travel_totals_are_reported_not_wrapped() {
    let (engine, _db) = engine_with_db().await;
    let half = i64::MAX / 2 + 1;
    engine.create_expense(dinner(half)).await.unwrap();
    engine.create_expense(dinner(half)).await.unwrap();
    engine
        .upsert_budget(UpsertBudgetCmd::new(TRAVEL, "u1").total_budget(MoneyCents::new(100)))
        .await
        .unwrap();

    assert!(matches!(
        engine.expense_analytics(TRAVEL, "u1").await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.budget_utilization(TRAVEL, "u1").await,
        Err(EngineError::InvalidAmount(_))
    ));
}
