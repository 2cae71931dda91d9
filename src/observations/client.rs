use super::{
    Dataset, EndpointConfig, ObservationError, ObservationResult, ObservationSource,
    PrecipObservation, TemperatureObservation, UpstreamConfig,
};
use crate::health::{HealthCheckResult, HealthChecker};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// reqwest-backed client for the precipitation and temperature services
#[derive(Clone)]
pub struct HttpObservationClient {
    client: Client,
    config: UpstreamConfig,
}

impl HttpObservationClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, dataset: Dataset) -> &EndpointConfig {
        match dataset {
            Dataset::Precipitation => &self.config.precipitation,
            Dataset::Temperature => &self.config.temperature,
        }
    }

    /// GET the observation array for one dataset.
    ///
    /// A JSON `null` body is an empty series; anything else that is not a
    /// JSON array of records is an error.
    async fn fetch<T: DeserializeOwned>(
        &self,
        dataset: Dataset,
        zip: &str,
        days: u32,
    ) -> ObservationResult<Vec<T>> {
        let url = self
            .endpoint(dataset)
            .observation_url(zip, days)
            .map_err(|message| ObservationError::InvalidEndpoint { dataset, message })?;

        debug!(dataset = %dataset, url = %url, "Fetching observations");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(dataset, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(dataset = %dataset, status = %status.as_u16(), "Upstream returned error status");
            return Err(ObservationError::Status {
                dataset,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| request_error(dataset, e))?;

        let records: Option<Vec<T>> =
            serde_json::from_slice(&body).map_err(|e| ObservationError::Decode {
                dataset,
                message: e.to_string(),
            })?;

        let records = records.unwrap_or_default();
        debug!(dataset = %dataset, count = records.len(), "Fetched observations");
        Ok(records)
    }

    pub fn health_checker(&self) -> Arc<dyn HealthChecker> {
        Arc::new(self.clone())
    }
}

fn request_error(dataset: Dataset, err: reqwest::Error) -> ObservationError {
    if err.is_timeout() {
        ObservationError::Timeout { dataset }
    } else {
        ObservationError::Request {
            dataset,
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl ObservationSource for HttpObservationClient {
    async fn precipitation(
        &self,
        zip: &str,
        days: u32,
    ) -> ObservationResult<Vec<PrecipObservation>> {
        self.fetch(Dataset::Precipitation, zip, days).await
    }

    async fn temperature(
        &self,
        zip: &str,
        days: u32,
    ) -> ObservationResult<Vec<TemperatureObservation>> {
        self.fetch(Dataset::Temperature, zip, days).await
    }
}

/// Outcome of one reachability request against an upstream base URL
struct Reachability {
    reachable: bool,
    details: serde_json::Value,
}

impl HttpObservationClient {
    /// Any HTTP response counts as reachable; only transport failures and
    /// timeouts do not.
    async fn reachability(&self, dataset: Dataset) -> Reachability {
        let url = self.endpoint(dataset).base_url();
        match self.client.get(&url).send().await {
            Ok(response) => Reachability {
                reachable: true,
                details: serde_json::json!({
                    "url": url,
                    "reachable": true,
                    "status": response.status().as_u16(),
                }),
            },
            Err(err) => {
                let err = request_error(dataset, err);
                warn!(dataset = %dataset, error = %err, "Upstream unreachable");
                Reachability {
                    reachable: false,
                    details: serde_json::json!({
                        "url": url,
                        "reachable": false,
                        "error": err.to_string(),
                    }),
                }
            }
        }
    }
}

#[async_trait]
impl HealthChecker for HttpObservationClient {
    fn name(&self) -> &str {
        "upstream"
    }

    async fn check(&self) -> HealthCheckResult {
        let (precipitation, temperature) = tokio::join!(
            self.reachability(Dataset::Precipitation),
            self.reachability(Dataset::Temperature)
        );

        let details = serde_json::json!({
            "precipitation": precipitation.details,
            "temperature": temperature.details,
            "timeout_secs": self.config.timeout_secs,
        });

        match (precipitation.reachable, temperature.reachable) {
            (true, true) => HealthCheckResult::healthy_with_details(details),
            (false, false) => HealthCheckResult::unhealthy_with_details(
                "No upstream observation service is reachable".to_string(),
                details,
            ),
            (precipitation_up, _) => {
                let down = if precipitation_up {
                    Dataset::Temperature
                } else {
                    Dataset::Precipitation
                };
                HealthCheckResult::degraded(format!("{} service is unreachable", down))
                    .with_details(details)
            }
        }
    }
}
