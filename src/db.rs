use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

use crate::error::AppResult;

const FILE_PRAGMAS: &[&str] = &["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"];

pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    let in_memory = database_url.contains(":memory:");

    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);
    if in_memory {
        // every pooled connection would otherwise open its own empty database
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;

    if !in_memory {
        for pragma in FILE_PRAGMAS {
            db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string()))
                .await?;
        }
    }

    Migrator::up(&db, None).await?;
    tracing::debug!(in_memory, "database ready");
    Ok(db)
}

#[cfg(test)]
mod tests {
    use sea_orm::{EntityTrait, PaginatorTrait};

    use super::*;
    use crate::entities::{movie, user};

    #[tokio::test]
    async fn migrations_create_empty_tables() {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(movie::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());
    }
}
