#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{CategoryBudgetPolicy, CreateExpenseCmd, Engine, MoneyCents};
use migration::MigratorTrait;

pub const TRAVEL: &str = "travel-kyoto";
pub const OTHER_TRAVEL: &str = "travel-lisbon";
pub const OWNER: &str = "owner";
pub const STRANGER: &str = "stranger";

/// Group members of `TRAVEL`; `OWNER` created the group but is not listed.
pub const MEMBERS: [&str; 3] = ["u1", "u2", "u3"];

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    engine_with_policy(CategoryBudgetPolicy::Unchecked).await
}

pub async fn engine_with_policy(policy: CategoryBudgetPolicy) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    seed(&db).await;
    let engine = Engine::builder()
        .database(db.clone())
        .category_budget_policy(policy)
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn exec(db: &DatabaseConnection, sql: &str, values: Vec<sea_orm::Value>) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(backend, sql, values))
        .await
        .unwrap();
}

async fn seed(db: &DatabaseConnection) {
    for user in MEMBERS.into_iter().chain([OWNER, STRANGER]) {
        exec(
            db,
            "INSERT INTO users (id, name, email) VALUES (?, ?, ?)",
            vec![
                user.into(),
                format!("User {user}").into(),
                format!("{user}@example.com").into(),
            ],
        )
        .await;
    }

    exec(
        db,
        "INSERT INTO travel_groups (id, name, created_by) VALUES (?, ?, ?)",
        vec!["group-1".into(), "Friends".into(), OWNER.into()],
    )
    .await;
    for user in MEMBERS {
        exec(
            db,
            "INSERT INTO group_members (group_id, user_id) VALUES (?, ?)",
            vec!["group-1".into(), user.into()],
        )
        .await;
    }
    exec(
        db,
        "INSERT INTO travels (id, group_id, title) VALUES (?, ?, ?)",
        vec![TRAVEL.into(), "group-1".into(), "Kyoto".into()],
    )
    .await;

    exec(
        db,
        "INSERT INTO travel_groups (id, name, created_by) VALUES (?, ?, ?)",
        vec!["group-2".into(), "Solo".into(), STRANGER.into()],
    )
    .await;
    exec(
        db,
        "INSERT INTO travels (id, group_id, title) VALUES (?, ?, ?)",
        vec![OTHER_TRAVEL.into(), "group-2".into(), "Lisbon".into()],
    )
    .await;
}

pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, d, 9, 0, 0).unwrap()
}

/// Equal split of `cents` among all members, paid and recorded by `u1`.
pub fn dinner(cents: i64) -> CreateExpenseCmd {
    CreateExpenseCmd::new(
        TRAVEL,
        "u1",
        MoneyCents::new(cents),
        "Dinner",
        "food",
        "u1",
        day(2),
    )
    .participants(MEMBERS)
}

pub async fn split_rows(db: &DatabaseConnection, expense_id: &str) -> Vec<(String, i64)> {
    let backend = db.get_database_backend();
    let rows = db
        .query_all(Statement::from_sql_and_values(
            backend,
            "SELECT user_id, amount_minor FROM expense_splits WHERE expense_id = ? ORDER BY position",
            vec![expense_id.into()],
        ))
        .await
        .unwrap();
    rows.iter()
        .map(|row| {
            (
                row.try_get::<String>("", "user_id").unwrap(),
                row.try_get::<i64>("", "amount_minor").unwrap(),
            )
        })
        .collect()
}
