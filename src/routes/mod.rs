pub mod docs;
pub mod health;
pub mod weather_report;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use docs::create_docs_routes;
pub use health::create_health_routes;
pub use weather_report::create_weather_report_routes;

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error category
    #[schema(example = "Invalid request")]
    pub error: String,
    /// Human-readable detail
    #[schema(example = "Please provide a 'days' query parameter with a value between 1 and 30")]
    pub message: String,
}
