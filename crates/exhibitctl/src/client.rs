//! HTTP client for the exhibitd daemon.

use exhibit_core::voice::{SkillRequest, SkillResponse};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running at {addr}\n  → start with: exhibitd\n  → or set EXHIBITD_ADDR if using a different address")]
    ConnectionFailed { addr: String },

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request rejected: {0}\n  → check --app-id against the daemon's configured application IDs")]
    Forbidden(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            let addr = e
                .url()
                .map_or_else(|| "unknown".to_string(), ToString::to_string);
            ClientError::ConnectionFailed { addr }
        } else {
            ClientError::HttpError {
                status: e.status().map_or(0, |s| s.as_u16()),
                message: e.to_string(),
            }
        }
    }
}

/// Error response from the daemon.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// HTTP client for exhibitd.
#[derive(Debug)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Returns the daemon address (for error messages).
    pub fn addr(&self) -> &str {
        &self.base_url
    }

    /// Probe /health. Ok(false) means the daemon answered but is unhealthy.
    pub async fn check_health(&self) -> Result<bool, ClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self.http.get(&url).send().await?;
        Ok(response.status().is_success())
    }

    /// Send a voice request to a skill endpoint.
    /// POST /skills/{skill}
    pub async fn ask(&self, skill: &str, request: &SkillRequest) -> Result<SkillResponse, ClientError> {
        let url = format!("{}/skills/{}", self.base_url, skill);
        let response = self.http.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(Self::handle_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn handle_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorResponse>()
            .await
            .map_or_else(|_| "unknown error".to_string(), |e| e.error);

        if status == 403 {
            return ClientError::Forbidden(message);
        }

        ClientError::HttpError { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use exhibit_core::voice::NEXT_EXHIBITS_INTENT;
    use serde_json::json;

    const APP_ID: &str = "amzn1.ask.skill.test";

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn request() -> SkillRequest {
        SkillRequest::intent(APP_ID, NEXT_EXHIBITS_INTENT, Some("2016-03-01"))
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = Client::new("http://127.0.0.1:7710/");
        assert_eq!(client.addr(), "http://127.0.0.1:7710");
    }

    #[tokio::test]
    async fn ask_returns_skill_response() {
        let router = Router::new().route(
            "/skills/exhibits",
            post(|Json(request): Json<SkillRequest>| async move {
                assert_eq!(request.application_id(), APP_ID);
                Json(SkillResponse::simple(
                    "Met Exhibits",
                    "The next ending exhibits are pergola ending on March 1",
                ))
            }),
        );
        let client = Client::new(&spawn(router).await);

        let response = client.ask("exhibits", &request()).await.unwrap();
        assert_eq!(
            response.speech(),
            Some("The next ending exhibits are pergola ending on March 1")
        );
    }

    #[tokio::test]
    async fn forbidden_carries_daemon_error_message() {
        let router = Router::new().route(
            "/skills/exhibits",
            post(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "Invalid Application ID: amzn1.ask.skill.other" })),
                )
            }),
        );
        let client = Client::new(&spawn(router).await);

        match client.ask("exhibits", &request()).await {
            Err(ClientError::Forbidden(message)) => {
                assert_eq!(message, "Invalid Application ID: amzn1.ask.skill.other");
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_failures_map_to_http_error() {
        let router = Router::new()
            .route(
                "/skills/exhibits",
                post(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": "malformed request" })),
                    )
                }),
            )
            .route(
                "/skills/color",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            );
        let client = Client::new(&spawn(router).await);

        match client.ask("exhibits", &request()).await {
            Err(ClientError::HttpError { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "malformed request");
            }
            other => panic!("expected HttpError, got {other:?}"),
        }

        // A body that is not the daemon's error shape still maps by status.
        match client.ask("color", &request()).await {
            Err(ClientError::HttpError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "unknown error");
            }
            other => panic!("expected HttpError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_success_body_is_invalid_response() {
        let router = Router::new().route("/skills/exhibits", post(|| async { "not json" }));
        let client = Client::new(&spawn(router).await);

        let err = client.ask("exhibits", &request()).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn closed_port_maps_to_connection_failed() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = Client::new(&format!("http://{addr}"));

        match client.ask("exhibits", &request()).await {
            Err(ClientError::ConnectionFailed { addr: failed }) => {
                assert!(failed.contains(&addr.to_string()));
            }
            other => panic!("expected ConnectionFailed, got {other:?}"),
        }
        assert!(matches!(
            client.check_health().await,
            Err(ClientError::ConnectionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn health_reflects_status_code() {
        let router = Router::new().route(
            "/health",
            get(|| async { Json(json!({ "status": "ok" })) }),
        );
        let client = Client::new(&spawn(router).await);
        assert!(client.check_health().await.unwrap());

        let router = Router::new().route(
            "/health",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let client = Client::new(&spawn(router).await);
        assert!(!client.check_health().await.unwrap());
    }
}
