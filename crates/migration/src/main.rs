use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

#[derive(Parser, Debug)]
#[command(name = "tripsplit_migration")]
#[command(about = "Applies or rolls back the tripsplit schema")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./tripsplit.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default)]
enum Command {
    /// Apply every pending migration.
    #[default]
    Up,
    /// Roll back the last `steps` migrations.
    Down {
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// Roll back everything.
    Reset,
    /// Drop all tables, then apply every migration.
    Fresh,
    /// List applied and pending migrations.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url).await?;

    match cli.command.unwrap_or_default() {
        Command::Up => Migrator::up(&db, None).await?,
        Command::Down { steps } => Migrator::down(&db, Some(steps)).await?,
        Command::Reset => Migrator::reset(&db).await?,
        Command::Fresh => Migrator::fresh(&db).await?,
        Command::Status => Migrator::status(&db).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_applies_pending_migrations() {
        let cli = Cli::try_parse_from(["migration", "--database-url", "sqlite::memory:"]).unwrap();
        assert!(matches!(cli.command.unwrap_or_default(), Command::Up));
    }

    #[test]
    fn down_takes_a_step_count() {
        let cli = Cli::try_parse_from(["migration", "down", "--steps", "2"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Down { steps: 2 })));

        let cli = Cli::try_parse_from(["migration", "down"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Down { steps: 1 })));
    }
}
