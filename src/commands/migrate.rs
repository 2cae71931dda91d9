use crate::Config;
use crate::database::DatabaseManagerImpl;
use crate::database::migration::Migrator;
use clap::Subcommand;
use sea_orm_migration::MigratorTrait;
use tracing::info;

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum MigrateAction {
    /// Run all pending migrations
    Up,
    /// Rollback the last migration
    Down {
        #[arg(
            short,
            long,
            help = "Number of migrations to rollback",
            default_value = "1"
        )]
        steps: u32,
    },
    /// Show applied and pending migrations
    Status,
}

pub async fn handle_migrate_command(
    action: MigrateAction,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let db_manager = DatabaseManagerImpl::new_from_config(config).await?;
    let connection = &db_manager.connection;

    match action {
        MigrateAction::Up => {
            info!("Running pending migrations...");
            Migrator::up(connection, None).await?;
            info!("All migrations completed successfully");
        }
        MigrateAction::Down { steps } => {
            info!("Rolling back {} migration(s)...", steps);
            Migrator::down(connection, Some(steps)).await?;
            info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            let applied = Migrator::get_applied_migrations(connection).await?;
            let pending = Migrator::get_pending_migrations(connection).await?;

            for migration in &applied {
                println!("applied  {}", migration.name());
            }
            for migration in &pending {
                println!("pending  {}", migration.name());
            }
            info!(
                applied = applied.len(),
                pending = pending.len(),
                "Migration status checked"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.database.url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("weather.db").display()
        );
        config
    }

    async fn pending_count(config: &Config) -> usize {
        let manager = DatabaseManagerImpl::new_from_config(config).await.unwrap();
        Migrator::get_pending_migrations(&manager.connection)
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn test_up_status_down() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir);

        assert_eq!(pending_count(&config).await, 1);

        handle_migrate_command(MigrateAction::Up, &config)
            .await
            .unwrap();
        assert_eq!(pending_count(&config).await, 0);

        handle_migrate_command(MigrateAction::Status, &config)
            .await
            .unwrap();

        handle_migrate_command(MigrateAction::Down { steps: 1 }, &config)
            .await
            .unwrap();
        assert_eq!(pending_count(&config).await, 1);
    }
}
