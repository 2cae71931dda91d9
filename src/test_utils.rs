use crate::{
    config::Config,
    database::{DatabaseManager, DatabaseManagerImpl},
    health::HealthService,
    observations::MockObservationSource,
    server::Server,
};
use std::sync::Arc;

/// Test server builder wiring in-memory SQLite and a mock observation source
pub struct TestServerBuilder {
    config: Config,
    use_memory_db: bool,
    observations: MockObservationSource,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            use_memory_db: true,
            observations: MockObservationSource::new(),
        }
    }

    /// Keep the configured database URL instead of in-memory SQLite
    pub fn with_real_database(mut self) -> Self {
        self.use_memory_db = false;
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Serve observations from the given mock
    pub fn with_observations(mut self, observations: MockObservationSource) -> Self {
        self.observations = observations;
        self
    }

    /// Build a migrated server; panics on setup failure
    pub async fn build(self) -> Server {
        let mut config = self.config;
        if self.use_memory_db {
            config.database.url = "sqlite::memory:".to_string();
        }
        config.logging.log_request = false;

        let database_impl = Arc::new(
            DatabaseManagerImpl::new_from_config(&config)
                .await
                .unwrap(),
        );
        database_impl.migrate().await.unwrap();

        let health_service = Arc::new(HealthService::new());
        health_service.register(database_impl.clone()).await;

        Server::from_parts(
            config,
            Arc::new(self.observations),
            database_impl,
            health_service,
        )
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
