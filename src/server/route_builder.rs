/// Middleware factory functions for common patterns
pub mod middleware_factories {
    use crate::utils::RequestIdExt;
    use axum::{
        body::Body,
        extract::{ConnectInfo, Request},
        middleware::Next,
        response::Response,
    };
    use std::net::SocketAddr;
    use tracing::{info, warn};

    /// Request/response logging middleware
    pub async fn request_response_logger(req: Request<Body>, next: Next) -> Response {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query = req.uri().query().unwrap_or_default().to_string();
        let request_id = req.extensions().request_id().as_str();

        let ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|connect_info| connect_info.0.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        info!(
            method = %method,
            path = %path,
            query = %query,
            ip = %ip,
            request_id = %request_id,
            "API request"
        );

        let start = std::time::Instant::now();
        let response = next.run(req).await;
        let latency_ms = start.elapsed().as_millis();
        let status = response.status();

        if status.is_server_error() {
            warn!(
                method = %method,
                path = %path,
                status = %status.as_u16(),
                latency_ms = %latency_ms,
                request_id = %request_id,
                "API response"
            );
        } else {
            info!(
                method = %method,
                path = %path,
                status = %status.as_u16(),
                latency_ms = %latency_ms,
                request_id = %request_id,
                "API response"
            );
        }

        response
    }
}
