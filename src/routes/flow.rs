//! Approval flow routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::actor::ReviewerActor;
use crate::routes::extract::ApiJson;
use crate::services::flow::{self as flow_svc, FlowServiceError};
use crate::state::AppState;
use crate::workflow::flow::{ApprovalFlow, FlowStep};

#[derive(Deserialize)]
pub struct ReplaceFlowBody {
    pub steps: Vec<FlowStep>,
}

/// `GET /api/approval-flow` — current reviewer order.
pub async fn get_flow(State(state): State<AppState>, _actor: ReviewerActor) -> Json<ApprovalFlow> {
    Json(flow_svc::current_flow(&state).await)
}

/// `PUT /api/approval-flow` — replace the reviewer order (admin only).
pub async fn replace_flow(
    State(state): State<AppState>,
    ReviewerActor(actor): ReviewerActor,
    ApiJson(body): ApiJson<ReplaceFlowBody>,
) -> Result<Json<ApprovalFlow>, ApiError> {
    flow_svc::replace_flow(&state, &actor, body.steps)
        .await
        .map(Json)
        .map_err(|e| {
            let status = match e {
                FlowServiceError::AdminOnly => StatusCode::FORBIDDEN,
                FlowServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            };
            ApiError::from_code(status, &e)
        })
}
