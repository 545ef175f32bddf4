use std::time::Instant;

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Level for a finished request: preflights are noise, client errors warn,
/// server errors are errors.
pub fn summary_level(method: &Method, status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else if method == Method::OPTIONS {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let duration_ms = started_at.elapsed().as_millis();

    let level = summary_level(&method, response.status());
    if level == Level::ERROR {
        error!(%method, %path, status, duration_ms, "request summary");
    } else if level == Level::WARN {
        warn!(%method, %path, status, duration_ms, "request summary");
    } else if level == Level::DEBUG {
        debug!(%method, %path, status, duration_ms, "request summary");
    } else {
        info!(%method, %path, status, duration_ms, "request summary");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_level_follows_status_class() {
        assert_eq!(summary_level(&Method::POST, StatusCode::OK), Level::INFO);
        assert_eq!(
            summary_level(&Method::OPTIONS, StatusCode::NO_CONTENT),
            Level::DEBUG
        );
        assert_eq!(
            summary_level(&Method::POST, StatusCode::NOT_FOUND),
            Level::WARN
        );
        assert_eq!(
            summary_level(&Method::POST, StatusCode::INTERNAL_SERVER_ERROR),
            Level::ERROR
        );
    }
}
