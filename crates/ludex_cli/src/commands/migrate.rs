//! Database migration commands.

use anyhow::Context;
use ludex::migration::{Migrator, MigratorTrait};

use crate::MigrateAction;
use crate::config::Config;

pub async fn run(config: &Config, action: MigrateAction) -> anyhow::Result<()> {
    let url = config.database_url();
    let db = ludex::connect(&url)
        .await
        .with_context(|| format!("connecting to {url}"))?;

    match action {
        MigrateAction::Up => {
            Migrator::up(&db, None).await.context("applying migrations")?;
            println!("Migrations applied.");
        }
        MigrateAction::Down => {
            Migrator::down(&db, Some(1))
                .await
                .context("rolling back migration")?;
            println!("Rolled back one migration.");
        }
        MigrateAction::Status => {
            let applied = Migrator::get_applied_migrations(&db)
                .await
                .context("reading migration status")?;
            let pending = Migrator::get_pending_migrations(&db)
                .await
                .context("reading migration status")?;
            println!("Applied: {}", applied.len());
            for migration in &applied {
                println!("  [x] {}", migration.name());
            }
            println!("Pending: {}", pending.len());
            for migration in &pending {
                println!("  [ ] {}", migration.name());
            }
        }
        MigrateAction::Fresh => {
            Migrator::fresh(&db).await.context("refreshing schema")?;
            println!("Schema dropped and recreated.");
        }
    }

    Ok(())
}
