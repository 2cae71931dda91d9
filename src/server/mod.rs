pub mod config;
pub mod route_builder;

use crate::{
    aggregator::{WeatherReportAggregator, WeatherReportAggregatorImpl},
    config::Config,
    database::{DatabaseManager, DatabaseManagerImpl},
    error::AppError,
    health::HealthService,
    observations::{HttpObservationClient, ObservationSource},
    routes::{create_docs_routes, create_health_routes, create_weather_report_routes},
    server::route_builder::middleware_factories::request_response_logger,
    shutdown::{DatabaseShutdown, ShutdownCoordinator, ShutdownManager},
    utils::request_id_middleware,
};
use axum::{Router, middleware};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{error, info};

/// Upper bound on each component's shutdown hook
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub aggregator: Arc<dyn WeatherReportAggregator>,
    pub database: Arc<dyn DatabaseManager>,
    pub health_service: Arc<HealthService>,
    pub shutdown_coordinator: Arc<ShutdownCoordinator>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let database_impl = Arc::new(DatabaseManagerImpl::new_from_config(&config).await?);

        let observation_client =
            HttpObservationClient::new(config.upstream.clone()).map_err(|e| {
                AppError::Internal(format!("Failed to build upstream HTTP client: {}", e))
            })?;

        let health_service = Arc::new(HealthService::new());
        health_service.register(database_impl.clone()).await;
        health_service
            .register(observation_client.health_checker())
            .await;

        Ok(Self::from_parts(
            config,
            Arc::new(observation_client),
            database_impl,
            health_service,
        ))
    }

    /// Assemble a server around already-built components
    pub fn from_parts(
        config: Config,
        observations: Arc<dyn ObservationSource>,
        database: Arc<dyn DatabaseManager>,
        health_service: Arc<HealthService>,
    ) -> Self {
        let aggregator: Arc<dyn WeatherReportAggregator> = Arc::new(
            WeatherReportAggregatorImpl::new(observations, database.clone()),
        );

        Self {
            config: Arc::new(config),
            aggregator,
            database,
            health_service,
            shutdown_coordinator: Arc::new(ShutdownCoordinator::new()),
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        if self.config.database.migration_on_startup {
            info!("Running database migrations");
            self.database.migrate().await?;
            info!("Database migrations completed successfully");
        }

        let mut shutdown_manager = ShutdownManager::new(SHUTDOWN_TIMEOUT);
        shutdown_manager.register(DatabaseShutdown::new(self.database.clone()));

        let app = self.create_app();

        let bind_address = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&bind_address).await.map_err(|e| {
            AppError::Internal(format!("Failed to bind to {}: {}", bind_address, e))
        })?;

        info!("Server listening on http://{}", bind_address);

        let shutdown_coordinator = self.shutdown_coordinator.clone();
        tokio::spawn(async move {
            shutdown_coordinator.wait_for_shutdown_signal().await;
        });

        let mut shutdown_rx = self.shutdown_coordinator.subscribe();
        let result = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
            info!("Graceful shutdown initiated");
        })
        .await;

        if let Err(e) = result {
            error!("Server error: {}", e);
        }

        shutdown_manager.shutdown_all().await;
        info!("Server shutdown complete");

        Ok(())
    }

    /// Build the application router with all routes and middleware
    pub fn create_app(&self) -> Router {
        let mut app = Router::new()
            .nest("/health", create_health_routes())
            .merge(create_weather_report_routes())
            .merge(create_docs_routes())
            .with_state(self.clone());

        if self.config.logging.log_request {
            app = app.layer(middleware::from_fn(request_response_logger));
        }

        // Outermost so the logger and handlers see the id
        app.layer(middleware::from_fn(request_id_middleware))
    }
}
