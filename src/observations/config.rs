use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Location of a single upstream observation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl EndpointConfig {
    pub fn new(protocol: &str, host: &str, port: u16) -> Self {
        Self {
            protocol: protocol.to_string(),
            host: host.to_string(),
            port,
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    /// `{protocol}://{host}:{port}/observation/{zip}?days={days}`
    ///
    /// The zip is pushed as a path segment so it is percent-encoded.
    pub fn observation_url(&self, zip: &str, days: u32) -> Result<Url, String> {
        let mut url = Url::parse(&self.base_url()).map_err(|e| e.to_string())?;
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be a base URL", self.base_url()))?
            .clear()
            .push("observation")
            .push(zip);
        url.query_pairs_mut()
            .append_pair("days", &days.to_string());
        Ok(url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Per-request timeout applied to every outbound call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_precipitation")]
    pub precipitation: EndpointConfig,
    #[serde(default = "default_temperature")]
    pub temperature: EndpointConfig,
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_precipitation() -> EndpointConfig {
    EndpointConfig::new("http", "localhost", 5000)
}

fn default_temperature() -> EndpointConfig {
    EndpointConfig::new("http", "localhost", 5001)
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            precipitation: default_precipitation(),
            temperature: default_temperature(),
        }
    }
}
