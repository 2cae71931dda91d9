//! Weather report aggregation
//!
//! Fetches both observation series for a zip code, reduces them with
//! [`reduce`] and persists the resulting report.

pub mod reduce;

use crate::database::{DatabaseManager, entities::WeatherReport};
use crate::error::AppError;
use crate::observations::ObservationSource;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

pub use reduce::{PrecipitationTotals, TemperatureAverages};

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 30;

pub const DAYS_GUIDANCE: &str =
    "Please provide a 'days' query parameter with a value between 1 and 30";

/// Report building trait for dependency injection and testing
#[async_trait]
pub trait WeatherReportAggregator: Send + Sync {
    /// Build and persist a report for `zip` covering the last `days` days
    async fn build_report(&self, zip: &str, days: u32) -> Result<WeatherReport, AppError>;
}

pub struct WeatherReportAggregatorImpl {
    observations: Arc<dyn ObservationSource>,
    database: Arc<dyn DatabaseManager>,
}

impl WeatherReportAggregatorImpl {
    pub fn new(
        observations: Arc<dyn ObservationSource>,
        database: Arc<dyn DatabaseManager>,
    ) -> Self {
        Self {
            observations,
            database,
        }
    }
}

#[async_trait]
impl WeatherReportAggregator for WeatherReportAggregatorImpl {
    async fn build_report(&self, zip: &str, days: u32) -> Result<WeatherReport, AppError> {
        let zip = zip.trim();
        if zip.is_empty() {
            return Err(AppError::Validation("Zip code must not be empty".to_string()));
        }
        if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
            return Err(AppError::Validation(DAYS_GUIDANCE.to_string()));
        }

        let (precipitation, temperature) = tokio::try_join!(
            self.observations.precipitation(zip, days),
            self.observations.temperature(zip, days)
        )?;

        let totals = reduce::precipitation_totals(&precipitation)?;
        let averages = reduce::temperature_averages(&temperature)?;

        if averages.samples == 0 {
            warn!(
                zip = %zip,
                days = days,
                "No temperature observations returned, reporting zero averages"
            );
        }

        info!(
            zip = %zip,
            days = days,
            rainfall_total_inches = %totals.rain_inches,
            snow_total_inches = %totals.snow_inches,
            "Built weather report"
        );

        let report = WeatherReport {
            id: 0,
            zip_code: zip.to_string(),
            created_on: Utc::now(),
            average_high: averages.high_f,
            average_low: averages.low_f,
            rainfall_total_inches: totals.rain_inches,
            snow_total_inches: totals.snow_inches,
        };

        let saved = self.database.weather_reports().save(&report).await?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::database::DatabaseManagerImpl;
    use crate::observations::{
        Dataset, MockObservationSource, ObservationError, PrecipObservation,
        TemperatureObservation, WeatherType,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    async fn memory_database() -> Arc<dyn DatabaseManager> {
        let mut config = Config::default();
        config.database.url = "sqlite::memory:".to_string();
        let database = DatabaseManagerImpl::new_from_config(&config).await.unwrap();
        database.migrate().await.unwrap();
        Arc::new(database)
    }

    fn aggregator(
        source: MockObservationSource,
        database: Arc<dyn DatabaseManager>,
    ) -> WeatherReportAggregatorImpl {
        WeatherReportAggregatorImpl::new(Arc::new(source), database)
    }

    #[tokio::test]
    async fn test_build_report_reduces_and_persists() {
        let database = memory_database().await;
        let source = MockObservationSource::new()
            .with_precipitation(vec![
                PrecipObservation::new(WeatherType::Rain, dec!(1.25)),
                PrecipObservation::new(WeatherType::Snow, dec!(0.75)),
            ])
            .with_temperature(vec![
                TemperatureObservation::new(dec!(70), dec!(50)),
                TemperatureObservation::new(dec!(80), dec!(40)),
            ]);

        let report = aggregator(source, database.clone())
            .build_report("98101", 7)
            .await
            .unwrap();

        assert!(report.id > 0);
        assert_eq!(report.zip_code, "98101");
        assert_eq!(report.rainfall_total_inches, dec!(1.3));
        assert_eq!(report.snow_total_inches, dec!(0.8));
        assert_eq!(report.average_high, dec!(75));
        assert_eq!(report.average_low, dec!(45));

        let stored = database
            .weather_reports()
            .find_by_id(report.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.rainfall_total_inches, dec!(1.3));
        assert_eq!(stored.snow_total_inches, dec!(0.8));
    }

    #[tokio::test]
    async fn test_both_datasets_are_fetched() {
        let database = memory_database().await;
        let source = MockObservationSource::new();
        let agg = aggregator(source.clone(), database);

        agg.build_report("98101", 1).await.unwrap();
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_series_gives_zero_report() {
        let database = memory_database().await;
        let report = aggregator(MockObservationSource::new(), database)
            .build_report("98101", 30)
            .await
            .unwrap();

        assert_eq!(report.rainfall_total_inches, Decimal::ZERO);
        assert_eq!(report.snow_total_inches, Decimal::ZERO);
        assert_eq!(report.average_high, Decimal::ZERO);
        assert_eq!(report.average_low, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_upstream_failure_persists_nothing() {
        let database = memory_database().await;
        let source = MockObservationSource::new()
            .with_temperature(vec![TemperatureObservation::new(dec!(70), dec!(50))])
            .failing(Dataset::Precipitation, 500);

        let err = aggregator(source, database.clone())
            .build_report("98101", 7)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));

        let stored = database
            .weather_reports()
            .find_recent_by_zip("98101", 10)
            .await
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_unrounded_means_are_stored_exactly() {
        let database = memory_database().await;
        let source = MockObservationSource::new().with_temperature(vec![
            TemperatureObservation::new(dec!(70), dec!(50)),
            TemperatureObservation::new(dec!(71), dec!(50)),
            TemperatureObservation::new(dec!(71), dec!(51)),
        ]);

        let report = aggregator(source, database.clone())
            .build_report("98101", 3)
            .await
            .unwrap();
        assert_eq!(report.average_high, dec!(212) / dec!(3));
        assert_eq!(report.average_low, dec!(151) / dec!(3));

        let stored = database
            .weather_reports()
            .find_by_id(report.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.average_high, report.average_high);
        assert_eq!(stored.average_low, report.average_low);
    }

    #[tokio::test]
    async fn test_oversized_values_are_upstream_error() {
        let database = memory_database().await;
        let source = MockObservationSource::new().with_precipitation(vec![
            PrecipObservation::new(WeatherType::Rain, Decimal::MAX),
            PrecipObservation::new(WeatherType::Rain, Decimal::MAX),
        ]);

        let err = aggregator(source, database.clone())
            .build_report("98101", 2)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Upstream(ObservationError::OutOfRange {
                dataset: Dataset::Precipitation
            })
        ));

        let stored = database
            .weather_reports()
            .find_recent_by_zip("98101", 10)
            .await
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_timeout_is_upstream_error() {
        let database = memory_database().await;
        let source = MockObservationSource::new().timing_out(Dataset::Temperature);

        let err = aggregator(source, database)
            .build_report("98101", 7)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_days_out_of_range_is_rejected() {
        let database = memory_database().await;
        let source = MockObservationSource::new();
        let agg = aggregator(source.clone(), database);

        for days in [0, 31] {
            let err = agg.build_report("98101", days).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(ref msg) if msg == DAYS_GUIDANCE));
        }
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_zip_is_rejected() {
        let database = memory_database().await;
        let err = aggregator(MockObservationSource::new(), database)
            .build_report("  ", 7)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
