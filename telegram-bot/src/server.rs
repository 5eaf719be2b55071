//! Webhook server for the image-generation engine.
//!
//! Endpoints:
//! - POST /webhooks/generated-images/generation-completed - engine status callback
//! - GET  /alive                                          - liveness probe

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use generation::{GenerationOrchestrator, Transition};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument, warn};

pub const GENERATION_COMPLETED_PATH: &str = "/webhooks/generated-images/generation-completed";
pub const ALIVE_PATH: &str = "/alive";

/// Task status reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Initial,
    Processing,
    Succeeded,
    Failed,
}

impl TryFrom<u16> for EngineStatus {
    type Error = String;

    fn try_from(status_id: u16) -> std::result::Result<Self, Self::Error> {
        match status_id {
            10 => Ok(Self::Initial),
            20 => Ok(Self::Processing),
            100 => Ok(Self::Succeeded),
            200 => Ok(Self::Failed),
            other => Err(format!("unknown statusId {}", other)),
        }
    }
}

/// The engine sends numeric task ids; strings are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TaskId {
    Number(u64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{}", n),
            TaskId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct GenerationCompletedBody {
    task_id: TaskId,
    status_id: u16,
}

fn validation_error(message: String) -> Response {
    warn!(error = %message, "Rejected webhook body");
    (StatusCode::BAD_REQUEST, format!("ValidationError: {}", message)).into_response()
}

/// POST /webhooks/generated-images/generation-completed
#[instrument(skip_all)]
async fn handle_generation_completed(
    State(orchestrator): State<Arc<GenerationOrchestrator>>,
    body: Bytes,
) -> Response {
    let body: GenerationCompletedBody = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => return validation_error(e.to_string()),
    };
    let status = match EngineStatus::try_from(body.status_id) {
        Ok(status) => status,
        Err(e) => return validation_error(e),
    };
    let task_id = body.task_id.to_string();
    if task_id.trim().is_empty() {
        return validation_error("taskId must not be empty".to_string());
    }

    info!(task_id = %task_id, status = ?status, "Engine callback");
    let outcome = match status {
        EngineStatus::Initial | EngineStatus::Processing => Ok(Transition::Skipped),
        EngineStatus::Succeeded => orchestrator.complete(&task_id).await,
        EngineStatus::Failed => orchestrator.fail(&task_id).await,
    };

    match outcome {
        Ok(_) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            error!(error = %e, task_id = %task_id, "Engine callback failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// GET /alive
async fn handle_alive() -> impl IntoResponse {
    format!(
        "It is alive 🔥🔥🔥 Now: {} UTC",
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    )
}

pub fn router(orchestrator: Arc<GenerationOrchestrator>) -> Router {
    Router::new()
        .route(ALIVE_PATH, get(handle_alive))
        .route(GENERATION_COMPLETED_PATH, post(handle_generation_completed))
        .with_state(orchestrator)
}

/// Serves the webhook router on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, orchestrator: Arc<GenerationOrchestrator>) -> Result<()> {
    axum::serve(listener, router(orchestrator)).await?;
    Ok(())
}

/// Binds `addr` and serves the webhook router.
#[instrument(skip(orchestrator))]
pub async fn run_server(addr: &str, orchestrator: Arc<GenerationOrchestrator>) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind webhook server on {}: {}", addr, e))?;
    info!(addr = %addr, "Webhook server listening");
    serve(listener, orchestrator).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ids() {
        assert_eq!(EngineStatus::try_from(10), Ok(EngineStatus::Initial));
        assert_eq!(EngineStatus::try_from(20), Ok(EngineStatus::Processing));
        assert_eq!(EngineStatus::try_from(100), Ok(EngineStatus::Succeeded));
        assert_eq!(EngineStatus::try_from(200), Ok(EngineStatus::Failed));
        assert!(EngineStatus::try_from(300).is_err());
    }

    #[test]
    fn test_body_accepts_numeric_and_string_task_ids() {
        let body: GenerationCompletedBody =
            serde_json::from_str(r#"{"taskId": 1001, "statusId": 100}"#).unwrap();
        assert_eq!(body.task_id.to_string(), "1001");

        let body: GenerationCompletedBody =
            serde_json::from_str(r#"{"taskId": "T1", "statusId": 200}"#).unwrap();
        assert_eq!(body.task_id.to_string(), "T1");
    }

    #[test]
    fn test_body_rejects_unknown_fields() {
        let result = serde_json::from_str::<GenerationCompletedBody>(
            r#"{"taskId": 1, "statusId": 100, "extra": true}"#,
        );
        assert!(result.is_err());
    }
}
