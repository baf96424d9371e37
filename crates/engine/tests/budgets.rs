mod common;

use engine::{CategoryBudget, CategoryBudgetPolicy, EngineError, MoneyCents, UpsertBudgetCmd};

use common::{STRANGER, TRAVEL, dinner, engine_with_db, engine_with_policy};

fn caps(rows: &[(&str, i64)]) -> Vec<CategoryBudget> {
    rows.iter()
        .map(|(category, cents)| CategoryBudget::new(*category, MoneyCents::new(*cents)))
        .collect()
}

#[tokio::test]
async fn budget_is_absent_until_first_write() {
    let (engine, _db) = engine_with_db().await;
    assert_eq!(engine.budget(TRAVEL, "u1").await.unwrap(), None);
    assert_eq!(engine.budget_utilization(TRAVEL, "u1").await.unwrap(), None);
}

#[tokio::test]
async fn upsert_creates_then_updates_in_place() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .upsert_budget(
            UpsertBudgetCmd::new(TRAVEL, "u1")
                .total_budget(MoneyCents::new(100_000))
                .category_budgets(caps(&[("food", 30_000)])),
        )
        .await
        .unwrap();
    assert_eq!(created.total_budget, Some(MoneyCents::new(100_000)));
    assert_eq!(created.created_by, "u1");

    let updated = engine
        .upsert_budget(UpsertBudgetCmd::new(TRAVEL, "u2").total_budget(MoneyCents::new(120_000)))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_by, "u1");
    assert_eq!(updated.total_budget, Some(MoneyCents::new(120_000)));
    // No category list supplied: caps stay.
    assert_eq!(updated.category_budgets, caps(&[("food", 30_000)]));
}

#[tokio::test]
async fn absent_total_keeps_stored_total() {
    let (engine, _db) = engine_with_db().await;
    engine
        .upsert_budget(UpsertBudgetCmd::new(TRAVEL, "u1").total_budget(MoneyCents::new(5_000)))
        .await
        .unwrap();

    let budget = engine
        .upsert_budget(
            UpsertBudgetCmd::new(TRAVEL, "u1").category_budgets(caps(&[("transport", 1_000)])),
        )
        .await
        .unwrap();
    assert_eq!(budget.total_budget, Some(MoneyCents::new(5_000)));
}

#[tokio::test]
async fn category_list_is_replaced_wholesale() {
    let (engine, _db) = engine_with_db().await;
    engine
        .upsert_budget(
            UpsertBudgetCmd::new(TRAVEL, "u1")
                .category_budgets(caps(&[("food", 10_000), ("transport", 5_000)])),
        )
        .await
        .unwrap();

    let budget = engine
        .upsert_budget(
            UpsertBudgetCmd::new(TRAVEL, "u1")
                .category_budgets(caps(&[("accommodation", 40_000)])),
        )
        .await
        .unwrap();
    assert_eq!(budget.category_budgets, caps(&[("accommodation", 40_000)]));

    let cleared = engine
        .upsert_budget(UpsertBudgetCmd::new(TRAVEL, "u1").category_budgets(Vec::new()))
        .await
        .unwrap();
    assert!(cleared.category_budgets.is_empty());
}

#[tokio::test]
async fn invalid_budgets_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    for cmd in [
        UpsertBudgetCmd::new(TRAVEL, "u1").total_budget(MoneyCents::new(-1)),
        UpsertBudgetCmd::new(TRAVEL, "u1").category_budgets(caps(&[("food", -5)])),
        UpsertBudgetCmd::new(TRAVEL, "u1").category_budgets(caps(&[("food", 5), ("food", 6)])),
        UpsertBudgetCmd::new(TRAVEL, "u1").category_budgets(caps(&[("spaceflight", 5)])),
    ] {
        let err = engine.upsert_budget(cmd).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidBudget(_)), "{err:?}");
    }
    assert_eq!(engine.budget(TRAVEL, "u1").await.unwrap(), None);
}

#[tokio::test]
async fn category_total_policy_is_configurable() {
    let over = || {
        UpsertBudgetCmd::new(TRAVEL, "u1")
            .total_budget(MoneyCents::new(10_000))
            .category_budgets(caps(&[("food", 8_000), ("shopping", 4_000)]))
    };

    let (unchecked, _db) = engine_with_db().await;
    assert!(unchecked.upsert_budget(over()).await.is_ok());

    let (strict, _db) = engine_with_policy(CategoryBudgetPolicy::WithinTotal).await;
    assert!(matches!(
        strict.upsert_budget(over()).await,
        Err(EngineError::InvalidBudget(_))
    ));
    let within = UpsertBudgetCmd::new(TRAVEL, "u1")
        .total_budget(MoneyCents::new(10_000))
        .category_budgets(caps(&[("food", 6_000), ("shopping", 4_000)]));
    assert!(strict.upsert_budget(within).await.is_ok());
}

#[tokio::test]
async fn budget_mutation_requires_membership() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .upsert_budget(UpsertBudgetCmd::new(TRAVEL, STRANGER).total_budget(MoneyCents::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert!(matches!(
        engine.budget(TRAVEL, STRANGER).await,
        Err(EngineError::Forbidden(_))
    ));
}

#[tokio::test]
async fn utilization_combines_budget_and_spending() {
    let (engine, _db) = engine_with_db().await;
    engine
        .upsert_budget(
            UpsertBudgetCmd::new(TRAVEL, "u1")
                .total_budget(MoneyCents::new(20_000))
                .category_budgets(caps(&[("food", 5_000), ("transport", 3_000)])),
        )
        .await
        .unwrap();
    engine.create_expense(dinner(6_000)).await.unwrap();

    let report = engine.budget_utilization(TRAVEL, "u2").await.unwrap().unwrap();
    assert_eq!(report.total_spent, MoneyCents::new(6_000));
    assert_eq!(report.remaining, Some(MoneyCents::new(14_000)));

    let food = report
        .categories
        .iter()
        .find(|c| c.category_id == "food")
        .unwrap();
    assert_eq!(food.spent, MoneyCents::new(6_000));
    assert_eq!(food.remaining, MoneyCents::new(-1_000));
    let transport = report
        .categories
        .iter()
        .find(|c| c.category_id == "transport")
        .unwrap();
    assert_eq!(transport.remaining, MoneyCents::new(3_000));
}
