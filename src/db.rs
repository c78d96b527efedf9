use std::path::Path;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use crate::{config::sqlite_file_path, error::AppResult};

const PRAGMAS: [&str; 3] =
    ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL", "PRAGMA foreign_keys=ON"];

pub async fn connect_and_migrate(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(database_url).and_then(|p| Path::new(p).parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::connect(database_url).await?;

    for pragma in PRAGMAS {
        db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string())).await?;
    }

    Migrator::up(&db, None).await?;
    tracing::debug!("schema up to date");
    Ok(db)
}

pub async fn ping(db: &DatabaseConnection) -> AppResult<()> {
    db.ping().await?;
    Ok(())
}
