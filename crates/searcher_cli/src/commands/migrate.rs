use searcher::db;
use searcher::migration::sea_orm::DatabaseConnection;
use searcher::migration::{DbErr, Migrator, MigratorTrait};

use crate::MigrateAction;

/// One-line description of what `migrate up` is about to apply.
fn pending_summary(names: &[&str]) -> String {
    match names {
        [] => "Searcher schema is up to date; nothing to apply.".to_string(),
        [only] => format!("Applying 1 pending migration: {only}"),
        _ => format!(
            "Applying {} pending migrations: {}",
            names.len(),
            names.join(", ")
        ),
    }
}

async fn pending_names(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
    Ok(Migrator::get_pending_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect())
}

async fn run_action(action: MigrateAction, db: &DatabaseConnection) -> Result<(), DbErr> {
    match action {
        MigrateAction::Up => {
            let pending = pending_names(db).await?;
            let names: Vec<&str> = pending.iter().map(String::as_str).collect();
            println!("{}", pending_summary(&names));
            if !pending.is_empty() {
                Migrator::up(db, None).await?;
                tracing::info!(applied = pending.len(), "Searcher migrations applied");
                println!("github_repositories is ready.");
            }
        }
        MigrateAction::Down => {
            println!("Rolling back the latest searcher migration...");
            Migrator::down(db, Some(1)).await?;
            println!("Rollback complete.");
        }
        MigrateAction::Status => {
            for migration in Migrator::get_migration_with_status(db).await? {
                println!("{:<8} {}", migration.status(), migration.name());
            }
        }
        MigrateAction::Fresh => {
            println!("Dropping github_repositories and rebuilding the searcher schema...");
            Migrator::fresh(db).await?;
            println!("Fresh searcher schema is ready; stored repositories were discarded.");
        }
    }
    Ok(())
}

pub(crate) async fn handle_migrate(
    action: MigrateAction,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;
    tracing::debug!(database_url, "Connected for migration");
    run_action(action, &db).await?;
    Ok(())
}
