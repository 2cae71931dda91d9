//! Upstream observation services
//!
//! The precipitation and temperature services are opaque HTTP endpoints
//! returning JSON arrays. [`ObservationSource`] is the seam the aggregator
//! depends on; [`client::HttpObservationClient`] talks to the real services
//! and [`mock::MockObservationSource`] serves canned data in tests.

pub mod client;
pub mod config;
pub mod mock;
pub mod models;

use async_trait::async_trait;
use thiserror::Error;

pub use client::HttpObservationClient;
pub use config::{EndpointConfig, UpstreamConfig};
pub use mock::MockObservationSource;
pub use models::{Dataset, PrecipObservation, TemperatureObservation, WeatherType};

#[derive(Error, Debug)]
pub enum ObservationError {
    #[error("Invalid {dataset} endpoint: {message}")]
    InvalidEndpoint { dataset: Dataset, message: String },
    #[error("{dataset} service timed out")]
    Timeout { dataset: Dataset },
    #[error("{dataset} service request failed: {message}")]
    Request { dataset: Dataset, message: String },
    #[error("{dataset} service returned HTTP {status}")]
    Status { dataset: Dataset, status: u16 },
    #[error("{dataset} service returned malformed data: {message}")]
    Decode { dataset: Dataset, message: String },
    #[error("{dataset} service returned values too large to aggregate")]
    OutOfRange { dataset: Dataset },
}

impl ObservationError {
    pub fn dataset(&self) -> Dataset {
        match self {
            ObservationError::InvalidEndpoint { dataset, .. }
            | ObservationError::Timeout { dataset }
            | ObservationError::Request { dataset, .. }
            | ObservationError::Status { dataset, .. }
            | ObservationError::Decode { dataset, .. }
            | ObservationError::OutOfRange { dataset } => *dataset,
        }
    }
}

pub type ObservationResult<T> = Result<T, ObservationError>;

/// Fetch capability for the two upstream observation datasets
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Precipitation records for `zip` over the last `days` days
    async fn precipitation(&self, zip: &str, days: u32)
    -> ObservationResult<Vec<PrecipObservation>>;

    /// Temperature records for `zip` over the last `days` days
    async fn temperature(
        &self,
        zip: &str,
        days: u32,
    ) -> ObservationResult<Vec<TemperatureObservation>>;
}
