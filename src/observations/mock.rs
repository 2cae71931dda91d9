use super::{
    Dataset, ObservationError, ObservationResult, ObservationSource, PrecipObservation,
    TemperatureObservation,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Controls how the mock answers
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockResponseMode {
    /// Return the canned series for every request
    AlwaysSuccess,
    /// Fail the given dataset with an upstream status error
    FailDataset(Dataset, u16),
    /// Time out the given dataset
    TimeoutDataset(Dataset),
}

/// In-memory observation source serving canned series
#[derive(Clone)]
pub struct MockObservationSource {
    pub response_mode: MockResponseMode,
    precipitation: Vec<PrecipObservation>,
    temperature: Vec<TemperatureObservation>,
    calls: Arc<AtomicUsize>,
}

impl MockObservationSource {
    /// Mock that returns empty series
    pub fn new() -> Self {
        Self {
            response_mode: MockResponseMode::AlwaysSuccess,
            precipitation: Vec::new(),
            temperature: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_precipitation(mut self, records: Vec<PrecipObservation>) -> Self {
        self.precipitation = records;
        self
    }

    pub fn with_temperature(mut self, records: Vec<TemperatureObservation>) -> Self {
        self.temperature = records;
        self
    }

    pub fn failing(mut self, dataset: Dataset, status: u16) -> Self {
        self.response_mode = MockResponseMode::FailDataset(dataset, status);
        self
    }

    pub fn timing_out(mut self, dataset: Dataset) -> Self {
        self.response_mode = MockResponseMode::TimeoutDataset(dataset);
        self
    }

    /// Total number of fetches served, successful or not
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond<T: Clone>(&self, dataset: Dataset, records: &[T]) -> ObservationResult<Vec<T>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response_mode {
            MockResponseMode::FailDataset(failed, status) if *failed == dataset => {
                Err(ObservationError::Status {
                    dataset,
                    status: *status,
                })
            }
            MockResponseMode::TimeoutDataset(failed) if *failed == dataset => {
                Err(ObservationError::Timeout { dataset })
            }
            _ => Ok(records.to_vec()),
        }
    }
}

impl Default for MockObservationSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObservationSource for MockObservationSource {
    async fn precipitation(
        &self,
        _zip: &str,
        _days: u32,
    ) -> ObservationResult<Vec<PrecipObservation>> {
        self.respond(Dataset::Precipitation, &self.precipitation)
    }

    async fn temperature(
        &self,
        _zip: &str,
        _days: u32,
    ) -> ObservationResult<Vec<TemperatureObservation>> {
        self.respond(Dataset::Temperature, &self.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::WeatherType;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mock_serves_canned_series() {
        let mock = MockObservationSource::new()
            .with_precipitation(vec![PrecipObservation::new(WeatherType::Rain, dec!(0.5))]);

        let precip = mock.precipitation("98101", 1).await.unwrap();
        let temp = mock.temperature("98101", 1).await.unwrap();

        assert_eq!(precip.len(), 1);
        assert!(temp.is_empty());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_fails_only_selected_dataset() {
        let mock = MockObservationSource::new().failing(Dataset::Temperature, 500);

        assert!(mock.precipitation("98101", 1).await.is_ok());
        let err = mock.temperature("98101", 1).await.unwrap_err();
        assert_eq!(err.dataset(), Dataset::Temperature);
    }
}
