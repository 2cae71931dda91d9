use crate::{
    aggregator::{DAYS_GUIDANCE, MAX_DAYS, MIN_DAYS},
    database::entities::WeatherReport,
    error::AppError,
    routes::ApiErrorResponse,
    server::Server,
};
use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json,
    routing::get,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Query string of the report endpoint.
///
/// `days` is taken as raw text so a missing or non-numeric value gets the
/// same guidance message as an out-of-range one.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeatherReportQuery {
    /// Number of days to cover, 1 to 30
    #[param(value_type = Option<u32>, minimum = 1, maximum = 30, example = 7)]
    pub days: Option<String>,
}

pub fn create_weather_report_routes() -> Router<Server> {
    Router::new().route("/weather-report/{zip}", get(get_weather_report))
}

/// Parse and range-check the `days` query value
pub fn parse_days(raw: Option<&str>) -> Result<u32, AppError> {
    let invalid = || AppError::Validation(DAYS_GUIDANCE.to_string());

    let days: i64 = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(invalid)?
        .parse()
        .map_err(|_| invalid())?;

    if days < i64::from(MIN_DAYS) || days > i64::from(MAX_DAYS) {
        return Err(invalid());
    }

    u32::try_from(days).map_err(|_| invalid())
}

#[utoipa::path(
    get,
    path = "/weather-report/{zip}",
    summary = "Build Weather Report",
    description = "Fetch precipitation and temperature observations for a zip code, reduce them to totals and averages, persist the report and return it",
    tags = ["Weather Reports"],
    params(
        ("zip" = String, Path, description = "Zip code to report on"),
        WeatherReportQuery
    ),
    responses(
        (status = 200, description = "Persisted weather report", body = WeatherReport),
        (status = 400, description = "Missing or out-of-range days parameter", body = ApiErrorResponse),
        (status = 502, description = "An upstream observation service failed", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    )
)]
pub async fn get_weather_report(
    State(server): State<Server>,
    Path(zip): Path<String>,
    Query(query): Query<WeatherReportQuery>,
) -> Result<Json<WeatherReport>, AppError> {
    let days = parse_days(query.days.as_deref())?;
    let report = server.aggregator.build_report(&zip, days).await?;
    Ok(Json(report))
}
