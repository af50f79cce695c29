//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, SecondsFormat};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::planner::{plan, CancelToken, PlanError, PlanRequest};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(stations))
        .route("/path", post(find_path))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// ISO-8601 timestamp with the local offset.
fn timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Health check: reports which data structures are usable.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let flags = state.snapshot.data_loaded();
    Json(HealthResponse {
        status: if flags.all() { "healthy" } else { "unhealthy" },
        data_loaded: DataLoadedDto::from_flags(flags),
        timestamp: timestamp(),
    })
}

/// The sorted station directory.
async fn stations(State(state): State<AppState>) -> Result<Json<StationsResponse>, AppError> {
    ensure_loaded(&state)?;

    let stations = state.snapshot.schedule().stations().to_vec();
    Ok(Json(StationsResponse {
        count: stations.len(),
        stations,
        timestamp: timestamp(),
    }))
}

/// Plan itineraries between two stations.
async fn find_path(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PathResponse>, AppError> {
    ensure_loaded(&state)?;

    // Parse JSON by hand so a malformed body gets the error envelope.
    let req: PathRequest = serde_json::from_slice(&body).map_err(|e| AppError::BadRequest {
        message: format!("invalid request body: {e}"),
    })?;

    let plan_req = PlanRequest {
        start_station: req.start_station,
        end_station: req.end_station,
        max_transfers: req.max_transfers,
        window_minutes: req.window_minutes,
        allow_same_station_consecutive_transfers: req.allow_same_station_consecutive_transfers,
    };

    // Enumeration is CPU-bound: run it on the blocking pool under the
    // request budget, and flag the token so an expired search stops at
    // its next DFS step.
    let snapshot = state.snapshot.clone();
    let config = state.config.clone();
    let cancel = Arc::new(CancelToken::default());
    let worker_cancel = cancel.clone();
    let worker_req = plan_req.clone();

    let work = tokio::task::spawn_blocking(move || {
        plan(&snapshot, &config, &worker_req, &worker_cancel)
    });

    let outcome = match tokio::time::timeout(state.config.request_timeout(), work).await {
        Err(_elapsed) => {
            cancel.cancel();
            return Err(AppError::Timeout);
        }
        Ok(Err(join_error)) => {
            return Err(AppError::Internal {
                message: format!("planner task failed: {join_error}"),
            });
        }
        Ok(Ok(result)) => result.map_err(AppError::from)?,
    };

    let message = outcome
        .paths
        .is_empty()
        .then(|| "no feasible paths found".to_string());

    Ok(Json(PathResponse {
        start_station: plan_req.start_station,
        end_station: plan_req.end_station,
        paths: outcome.paths.iter().map(PathEntry::from_merged).collect(),
        summary: SummaryDto::from_summary(&outcome.summary),
        metadata: MetadataDto {
            max_transfers: plan_req.max_transfers,
            generated_at: timestamp(),
        },
        message,
    }))
}

/// Reject requests while any required structure is unusable.
fn ensure_loaded(state: &AppState) -> Result<(), AppError> {
    if state.snapshot.data_loaded().all() {
        Ok(())
    } else {
        Err(AppError::DataNotLoaded)
    }
}

/// Application error type, mapped onto the HTTP error envelope.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    UnknownStation { message: String },
    DataNotLoaded,
    Timeout,
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::UnknownStation(_) => AppError::UnknownStation {
                message: e.to_string(),
            },
            PlanError::Timeout => AppError::Timeout,
            PlanError::MissingEndpoint
            | PlanError::IdenticalEndpoints
            | PlanError::TransfersOutOfRange { .. }
            | PlanError::WindowOutOfRange { .. } => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::UnknownStation { .. } => StatusCode::NOT_FOUND,
            AppError::DataNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::BadRequest { message } | AppError::UnknownStation { message } => {
                message.clone()
            }
            AppError::DataNotLoaded => "data not loaded".to_string(),
            AppError::Timeout => "request timed out".to_string(),
            // Details stay in the logs; the envelope carries a flat line.
            AppError::Internal { .. } => "internal error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        // Internal context goes to the logs, never over the wire.
        match &self {
            AppError::Internal { message } => error!(%status, detail = %message, "request failed"),
            other => warn!(%status, reason = %other.message(), "request rejected"),
        }

        let body = Json(ErrorResponse {
            error: self.message(),
            detail: None,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_errors_map_to_statuses() {
        let cases = [
            (
                AppError::from(PlanError::MissingEndpoint),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(PlanError::IdenticalEndpoints),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(PlanError::TransfersOutOfRange { cap: 2 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(PlanError::UnknownStation("Nowhere".into())),
                StatusCode::NOT_FOUND,
            ),
            (AppError::from(PlanError::Timeout), StatusCode::REQUEST_TIMEOUT),
            (AppError::DataNotLoaded, StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status(), expected);
        }
    }

    #[test]
    fn internal_message_is_not_leaked() {
        let error = AppError::Internal {
            message: "index out of bounds at node 17".into(),
        };
        assert_eq!(error.message(), "internal error");
    }
}
