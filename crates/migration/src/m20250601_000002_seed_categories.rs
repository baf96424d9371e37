//! Seeds the expense categories.

use sea_orm::{ConnectionTrait, Statement};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum ExpenseCategories {
    Table,
    Id,
    Name,
    Color,
    Icon,
}

/// `(id, name, color, icon)`
const CATEGORIES: [(&str, &str, &str, &str); 6] = [
    ("transport", "Transport", "#3B82F6", "🚗"),
    ("accommodation", "Accommodation", "#10B981", "🏨"),
    ("food", "Food", "#F59E0B", "🍽️"),
    ("entertainment", "Sightseeing & entertainment", "#EF4444", "🎡"),
    ("shopping", "Shopping", "#8B5CF6", "🛍️"),
    ("other", "Other", "#6B7280", "📝"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        for (id, name, color, icon) in CATEGORIES {
            let stmt = Query::insert()
                .into_table(ExpenseCategories::Table)
                .columns([
                    ExpenseCategories::Id,
                    ExpenseCategories::Name,
                    ExpenseCategories::Color,
                    ExpenseCategories::Icon,
                ])
                .values_panic([id.into(), name.into(), color.into(), icon.into()])
                .on_conflict(
                    OnConflict::column(ExpenseCategories::Id)
                        .do_nothing()
                        .to_owned(),
                )
                .to_owned();
            db.execute(backend.build(&stmt)).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();
        let ids = CATEGORIES
            .iter()
            .map(|(id, ..)| format!("'{id}'"))
            .collect::<Vec<_>>()
            .join(", ");
        db.execute(Statement::from_string(
            backend,
            format!("DELETE FROM expense_categories WHERE id IN ({ids});"),
        ))
        .await?;
        Ok(())
    }
}
