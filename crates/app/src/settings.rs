//! Application settings.
//!
//! Values are read from `settings.toml` (see the sample at the repository
//! root) and can be overridden with `TRIPSPLIT__SECTION__KEY` environment
//! variables, e.g. `TRIPSPLIT__SERVER__PORT=8080`.
use config::{Config, ConfigError, Environment, File};
use engine::CategoryBudgetPolicy;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Default, Deserialize)]
pub struct Budget {
    /// Rejects category budgets whose sum exceeds the total budget.
    #[serde(default)]
    pub enforce_category_total: bool,
}

impl Budget {
    pub fn policy(&self) -> CategoryBudgetPolicy {
        if self.enforce_category_total {
            CategoryBudgetPolicy::WithinTotal
        } else {
            CategoryBudgetPolicy::Unchecked
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
    #[serde(default)]
    pub budget: Budget,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("TRIPSPLIT").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_apply_to_optional_sections() {
        let settings = parse(
            r#"
            [server]
            port = 3000
            database = "memory"
            "#,
        );
        assert_eq!(settings.app.level, "info");
        assert!(settings.server.bind.is_none());
        assert!(matches!(settings.server.database, Database::Memory));
        assert_eq!(settings.budget.policy(), CategoryBudgetPolicy::Unchecked);
    }

    #[test]
    fn sqlite_database_and_budget_policy() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 8080
            database = { sqlite = "./tripsplit.db" }

            [budget]
            enforce_category_total = true
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        assert!(matches!(settings.server.database, Database::Sqlite(ref path) if path == "./tripsplit.db"));
        assert_eq!(settings.budget.policy(), CategoryBudgetPolicy::WithinTotal);
    }
}
