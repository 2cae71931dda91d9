use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;
use weather_report_service::{
    Config, Server,
    observations::EndpointConfig,
};
use wiremock::MockServer;

/// Full application wired to two wiremock upstreams and in-memory SQLite
pub struct TestHarness {
    pub server: Server,
    pub app: Router,
    pub precipitation: MockServer,
    pub temperature: MockServer,
}

fn endpoint_for(mock: &MockServer) -> EndpointConfig {
    let address = mock.address();
    EndpointConfig::new("http", &address.ip().to_string(), address.port())
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(mut config: Config) -> Self {
        let precipitation = MockServer::start().await;
        let temperature = MockServer::start().await;

        config.database.url = "sqlite::memory:".to_string();
        config.upstream.precipitation = endpoint_for(&precipitation);
        config.upstream.temperature = endpoint_for(&temperature);

        let server = Server::new(config).await.unwrap();
        server.database.migrate().await.unwrap();
        let app = server.create_app();

        Self {
            server,
            app,
            precipitation,
            temperature,
        }
    }

    /// GET `uri`, returning status, `x-request-id` and JSON body
    pub async fn get(&self, uri: &str) -> (StatusCode, Option<String>, serde_json::Value) {
        let response = self
            .app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };

        (status, request_id, json)
    }
}
