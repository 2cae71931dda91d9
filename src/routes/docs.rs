use crate::server::Server;
use axum::{Router, response::Json, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Report Service API",
        version = "1.0.0",
        description = "Aggregates precipitation and temperature observations into persisted per-zip weather reports"
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::weather_report::get_weather_report,
    ),
    components(
        schemas(
            crate::routes::ApiErrorResponse,
            crate::database::entities::WeatherReport,
            crate::health::HealthResponse,
            crate::health::HealthStatus,
            crate::health::HealthCheckResult,
            crate::health::HealthSummary,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Weather Reports", description = "Weather report aggregation endpoints"),
    )
)]
pub struct ApiDoc;

/// Create documentation routes
pub fn create_docs_routes() -> Router<Server> {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
