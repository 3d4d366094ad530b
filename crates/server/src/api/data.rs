//! Webhook endpoint: accepts a build payload and hands it to the pipeline.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use buildhook_core::{BuildRecord, DeployStatus, PipelineError};

use super::middleware::AuthUser;
use crate::metrics::{DEPLOY_LAUNCHES_TOTAL, PIPELINE_OUTCOMES_TOTAL};
use crate::state::AppState;

/// Successful response: the stored build record
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub success: BuildRecord,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct DataErrorResponse {
    pub error: String,
}

/// `POST /api/v1/data`
///
/// The body is read as raw bytes so malformed JSON reaches the pipeline
/// and is answered with its own status code instead of axum's rejection.
pub async fn post_data(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    body: Bytes,
) -> Response {
    match state.pipeline().run(&body).await {
        Ok(outcome) => {
            PIPELINE_OUTCOMES_TOTAL.with_label_values(&["accepted"]).inc();
            let deploy_result = match outcome.deploy {
                DeployStatus::Launched { .. } => "launched",
                DeployStatus::Failed { .. } => "failed",
            };
            DEPLOY_LAUNCHES_TOTAL
                .with_label_values(&[deploy_result])
                .inc();

            info!(
                user_id = %user_id,
                record_id = outcome.record.id,
                deploy = deploy_result,
                "Webhook handled"
            );

            (
                StatusCode::CREATED,
                Json(DataResponse {
                    success: outcome.record,
                }),
            )
                .into_response()
        }
        Err(e) => {
            PIPELINE_OUTCOMES_TOTAL.with_label_values(&[e.kind()]).inc();

            if let PipelineError::DeployFailed(_) = e {
                DEPLOY_LAUNCHES_TOTAL.with_label_values(&["failed"]).inc();
                error!("Deploy could not be started, shutting down");
                state.fatal().trip();
            }

            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(DataErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
