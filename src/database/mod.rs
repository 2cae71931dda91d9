//! Database access layer
//!
//! Reports are stored in a single `weather_report` table behind
//! [`WeatherReportsDao`]. [`DatabaseManager`] is the seam the rest of the
//! service depends on, so tests can run against in-memory SQLite.

use crate::config::Config;
use crate::health::HealthChecker;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection};
use thiserror::Error;

pub mod config;
pub mod dao;
pub mod entities;
pub mod migration;

pub use dao::WeatherReportsDao;

/// Database error types
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Database manager trait for dependency injection and testing
#[async_trait]
pub trait DatabaseManager: Send + Sync {
    /// Run database migrations
    async fn migrate(&self) -> DatabaseResult<()>;

    /// Health check for database connection
    async fn health_check(&self) -> DatabaseResult<()>;

    /// Get weather reports DAO
    fn weather_reports(&self) -> WeatherReportsDao;

    /// Get direct database connection (for migrations and admin operations)
    fn connection(&self) -> &DatabaseConnection;
}

/// Database connection manager implementation
pub struct DatabaseManagerImpl {
    pub connection: DatabaseConnection,
}

impl DatabaseManagerImpl {
    /// Create database manager from configuration
    pub async fn new_from_config(config: &Config) -> Result<Self, DatabaseError> {
        let mut options = ConnectOptions::new(config.database.url.clone());
        options.sqlx_logging(false);

        // An in-memory SQLite database lives and dies with its connection
        if config.database.url.contains(":memory:") {
            options.max_connections(1).min_connections(1);
        } else {
            options.max_connections(config.database.max_connections);
        }

        let connection = sea_orm::Database::connect(options)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl DatabaseManager for DatabaseManagerImpl {
    async fn migrate(&self) -> DatabaseResult<()> {
        use crate::database::migration::Migrator;
        use sea_orm_migration::MigratorTrait;

        tracing::info!("Running database migrations");

        Migrator::up(&self.connection, None)
            .await
            .map_err(|e| DatabaseError::Migration(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Successfully completed all migrations");
        Ok(())
    }

    async fn health_check(&self) -> DatabaseResult<()> {
        self.connection
            .ping()
            .await
            .map_err(|e| DatabaseError::Database(format!("db error: {}", e)))
    }

    fn weather_reports(&self) -> WeatherReportsDao {
        WeatherReportsDao::new(self.connection.clone())
    }

    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

#[async_trait]
impl HealthChecker for DatabaseManagerImpl {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> crate::health::HealthCheckResult {
        match self.health_check().await {
            Ok(_) => crate::health::HealthCheckResult::healthy_with_details(serde_json::json!({
                "status": "healthy",
                "connection": "ok"
            })),
            Err(err) => crate::health::HealthCheckResult::unhealthy_with_details(
                "DB health check failed".to_string(),
                serde_json::json!({
                    "status": "unhealthy",
                    "error": err.to_string()
                }),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthStatus;

    async fn memory_manager() -> DatabaseManagerImpl {
        let mut config = Config::default();
        config.database.url = "sqlite::memory:".to_string();
        DatabaseManagerImpl::new_from_config(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_migrate_and_health_check() {
        let manager = memory_manager().await;
        manager.migrate().await.unwrap();
        manager.health_check().await.unwrap();

        let result = manager.check().await;
        assert!(matches!(result.status, HealthStatus::Healthy));
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let manager = memory_manager().await;
        manager.migrate().await.unwrap();
        manager.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_url_fails() {
        let mut config = Config::default();
        config.database.url = "notadb://nowhere".to_string();
        assert!(DatabaseManagerImpl::new_from_config(&config).await.is_err());
    }
}
